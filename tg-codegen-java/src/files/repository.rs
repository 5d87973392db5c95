//! repository/<Table>Repository.java generator.
//!
//! Every read excludes soft-deleted rows. Updates and deletes match the
//! id and the previous updated-at; no matching row means the row changed
//! and raises `OptimisticLockingFailureException`.

use tablegen_codegen::{builder::CodeBuilder, language::GenerationContext};
use tablegen_core::{GeneratedFile, to_camel_case};
use tablegen_schema::{Column, Table};

use super::{NAMING, getter, java_import, java_type, logical_name, lookup_columns, setter};
use crate::java_file::JavaFile;

/// Ebean repository of one table.
pub struct RepositoryJava<'a> {
    table: &'a Table,
    ctx: &'a GenerationContext,
}

impl<'a> RepositoryJava<'a> {
    pub fn new(table: &'a Table, ctx: &'a GenerationContext) -> Self {
        Self { table, ctx }
    }

    fn model(&self) -> String {
        NAMING.type_name(&self.table.table_name)
    }

    fn class_name(&self) -> String {
        format!("{}Repository", self.model())
    }

    /// Start of every read query.
    fn query_root(&self) -> String {
        if self.ctx.rls.enabled {
            "rlsFilter()".to_string()
        } else {
            format!("DB.find({}.class).where()", self.model())
        }
    }

    /// `.eq("isDeleted", false)`
    fn not_deleted(&self) -> String {
        let flag = &self.ctx.common.is_deleted;
        format!(
            ".eq(\"{}\", {})",
            NAMING.field_name(&flag.name),
            flag.java_literal(false)
        )
    }
}

/// `return supplyAsync(() -> { ... }, executionContext);`
fn push_async(b: &mut CodeBuilder, f: impl FnOnce(&mut CodeBuilder)) {
    b.push_block("return supplyAsync(() -> {", "}, executionContext);", f);
}

fn push_method(
    b: &mut CodeBuilder,
    doc: &[&str],
    signature: &str,
    f: impl FnOnce(&mut CodeBuilder),
) {
    b.push_doc_block(doc.iter().copied());
    b.push_block(&format!("{signature} {{"), "}", f);
}

impl GeneratedFile for RepositoryJava<'_> {
    fn path(&self) -> String {
        format!("repository/{}.java", self.class_name())
    }

    fn render(&self) -> String {
        let model = self.model();
        let class_name = self.class_name();
        let rls = self.ctx.rls.enabled;
        let lookups = lookup_columns(self.table);

        let mut file = JavaFile::new("repository")
            .imports([
                "io.ebean.DB",
                "io.ebean.ExpressionList",
                "java.time.Instant",
                "java.util.List",
                "java.util.Optional",
                "java.util.concurrent.CompletionStage",
                "javax.inject.Inject",
            ])
            .import(format!("models.{model}"))
            .import_if(rls, "models.SessionInfo")
            .static_import("java.util.concurrent.CompletableFuture.supplyAsync");
        for col in &lookups {
            if let Some(import) = java_import(col) {
                file.add_import(import);
            }
        }

        let extends = if rls {
            format!(" extends BaseRepository<{model}>")
        } else {
            String::new()
        };

        file.render(|b| {
            b.push_doc_block([format!("{} repository", logical_name(self.table)).as_str()]);
            b.push_block(&format!("public class {class_name}{extends} {{"), "}", |b| {
                self.push_constructor(b);
                b.push_blank();
                self.push_find_by_id(b);
                for col in &lookups {
                    b.push_blank();
                    self.push_find_by(b, col);
                }
                b.push_blank();
                self.push_find_all(b);
                b.push_blank();
                self.push_find(b);
                b.push_blank();
                self.push_filter_query(b);
                b.push_blank();
                self.push_insert(b);
                b.push_blank();
                self.push_update(b);
                b.push_blank();
                self.push_delete(b);
            });
        })
    }
}

impl RepositoryJava<'_> {
    fn push_constructor(&self, b: &mut CodeBuilder) {
        let class_name = self.class_name();
        if self.ctx.rls.enabled {
            b.push_line("@Inject");
            b.push_block(
                &format!(
                    "public {class_name}(DatabaseExecutionContext executionContext, SessionInfo sessionInfo) {{"
                ),
                "}",
                |b| {
                    b.push_line(&format!(
                        "super(executionContext, sessionInfo, {}.class);",
                        self.model()
                    ));
                },
            );
        } else {
            b.push_line("private final DatabaseExecutionContext executionContext;");
            b.push_blank();
            b.push_line("@Inject");
            b.push_block(
                &format!("public {class_name}(DatabaseExecutionContext executionContext) {{"),
                "}",
                |b| {
                    b.push_line("this.executionContext = executionContext;");
                },
            );
        }
    }

    fn push_lookup(&self, b: &mut CodeBuilder, column: &str, value: &str) {
        let model = self.model();
        let root = self.query_root();
        let not_deleted = self.not_deleted();
        push_async(b, |b| {
            b.push_line(&format!("ExpressionList<{model}> query = {root};"));
            b.push_line(&format!("return query.eq(\"{column}\", {value})"));
            b.push_indent();
            b.push_line(&not_deleted);
            b.push_line(".findOneOrEmpty();");
            b.push_dedent();
        });
    }

    fn push_find_by_id(&self, b: &mut CodeBuilder) {
        let id = NAMING.field_name(&self.ctx.common.id);
        push_method(
            b,
            &[
                &format!("Find {} by id, excluding deleted rows.", logical_name(self.table)),
                "@param id primary key",
                "@return the row, if any",
            ],
            &format!(
                "public CompletionStage<Optional<{}>> findById(Long id)",
                self.model()
            ),
            |b| self.push_lookup(b, &id, "id"),
        );
    }

    fn push_find_by(&self, b: &mut CodeBuilder, col: &Column) {
        let field = NAMING.field_name(&col.col_name);
        let label = if col.col_name_jp.is_empty() {
            &col.col_name
        } else {
            &col.col_name_jp
        };
        push_method(
            b,
            &[
                &format!(
                    "Find {} by {label}, excluding deleted rows.",
                    logical_name(self.table)
                ),
                &format!("@param {field} {label}"),
                "@return the row, if any",
            ],
            &format!(
                "public CompletionStage<Optional<{}>> findBy{}({} {field})",
                self.model(),
                NAMING.accessor_suffix(&col.col_name),
                java_type(col)
            ),
            |b| self.push_lookup(b, &field, &field),
        );
    }

    fn push_find_all(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let root = self.query_root();
        let not_deleted = self.not_deleted();
        let name = logical_name(self.table);

        push_method(
            b,
            &[&format!("All {name} rows, excluding deleted rows."), "@return every row"],
            &format!("public CompletionStage<List<{model}>> findAll()"),
            |b| {
                b.push_line("return findAll(0, Integer.MAX_VALUE);");
            },
        );
        b.push_blank();
        push_method(
            b,
            &[
                &format!("A page of {name} rows, excluding deleted rows."),
                "@param offset first row",
                "@param limit maximum number of rows",
                "@return the page",
            ],
            &format!("public CompletionStage<List<{model}>> findAll(int offset, int limit)"),
            |b| {
                push_async(b, |b| {
                    b.push_line(&format!("return {root}"));
                    b.push_indent();
                    b.push_lines([
                        not_deleted.as_str(),
                        ".setFirstRow(offset)",
                        ".setMaxRows(limit)",
                        ".findList();",
                    ]);
                    b.push_dedent();
                });
            },
        );

        if self.ctx.include_count_method {
            b.push_blank();
            push_method(
                b,
                &[
                    &format!("Number of {name} rows, excluding deleted rows."),
                    "@return row count",
                ],
                "public CompletionStage<Integer> countAll()",
                |b| {
                    push_async(b, |b| {
                        b.push_line(&format!("return {root}"));
                        b.push_indent();
                        b.push_lines([not_deleted.as_str(), ".findCount();"]);
                        b.push_dedent();
                    });
                },
            );
        }
    }

    fn push_find(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let name = logical_name(self.table);

        push_method(
            b,
            &[
                &format!("Search {name}, excluding deleted rows."),
                "@param filter search conditions",
                "@return matching rows",
            ],
            &format!("public CompletionStage<List<{model}>> find({model} filter)"),
            |b| {
                b.push_line("return find(filter, 0, Integer.MAX_VALUE);");
            },
        );
        b.push_blank();
        push_method(
            b,
            &[
                &format!("Search a page of {name}, excluding deleted rows."),
                "@param filter search conditions",
                "@param offset first row",
                "@param limit maximum number of rows",
                "@return matching rows",
            ],
            &format!(
                "public CompletionStage<List<{model}>> find({model} filter, int offset, int limit)"
            ),
            |b| {
                push_async(b, |b| {
                    b.push_line("return createQueryWithFilter(filter)");
                    b.push_indent();
                    b.push_lines([".setFirstRow(offset)", ".setMaxRows(limit)", ".findList();"]);
                    b.push_dedent();
                });
            },
        );

        if self.ctx.include_count_method {
            b.push_blank();
            push_method(
                b,
                &[
                    &format!("Number of {name} rows matching a filter, excluding deleted rows."),
                    "@param filter search conditions",
                    "@return row count",
                ],
                &format!("public CompletionStage<Integer> count({model} filter)"),
                |b| {
                    push_async(b, |b| {
                        b.push_line("return createQueryWithFilter(filter).findCount();");
                    });
                },
            );
        }
    }

    /// Text columns match by substring, everything else by equality.
    fn push_filter_query(&self, b: &mut CodeBuilder) {
        let model = self.model();
        push_method(
            b,
            &[
                "Query for the non-null fields of a filter.",
                "@param filter search conditions",
                "@return the query",
            ],
            &format!("private ExpressionList<{model}> createQueryWithFilter({model} filter)"),
            |b| {
                b.push_line(&format!(
                    "ExpressionList<{model}> query = {}{};",
                    self.query_root(),
                    self.not_deleted()
                ));
                b.push_blank();
                for col in self.ctx.own_columns(self.table) {
                    let field = NAMING.field_name(&col.col_name);
                    let get = getter(&col.col_name);
                    let op = if java_type(col) == "String" {
                        "contains"
                    } else {
                        "eq"
                    };
                    b.push_block(&format!("if (filter.{get}() != null) {{"), "}", |b| {
                        b.push_line(&format!("query.{op}(\"{field}\", filter.{get}());"));
                    });
                }
                b.push_line("return query;");
            },
        );
    }

    fn push_insert(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let var = to_camel_case(&model);
        let name = logical_name(self.table);

        push_method(
            b,
            &[
                &format!("Insert one {name} row."),
                &format!("@param {var} row to insert"),
                "@return the inserted row",
            ],
            &format!("public CompletionStage<{model}> insert({model} {var})"),
            |b| {
                push_async(b, |b| {
                    b.push_line(&format!("DB.insert({var});"));
                    b.push_line(&format!("return {var};"));
                });
            },
        );
        b.push_blank();
        push_method(
            b,
            &[
                &format!("Insert several {name} rows."),
                "@param records rows to insert",
                "@return number of inserted rows",
            ],
            &format!("public CompletionStage<Integer> batchInsert(List<{model}> records)"),
            |b| {
                push_async(b, |b| {
                    b.push_line("DB.saveAll(records);");
                    b.push_line("return records.size();");
                });
            },
        );
    }

    /// `.where().eq("id", id).eq("updatedAt", updatedAt)` and the row check.
    fn push_guarded_update(&self, b: &mut CodeBuilder, result: &str) {
        let id = NAMING.field_name(&self.ctx.common.id);
        let updated_at = NAMING.field_name(&self.ctx.common.updated_at);
        b.push_line(&format!(
            ".where().eq(\"{id}\", id).eq(\"{updated_at}\", updatedAt)"
        ));
        b.push_line(".update();");
        b.push_dedent();
        b.push_blank();
        b.push_block("if (updatedRows == 0) {", "}", |b| {
            b.push_line(&format!(
                "throw new OptimisticLockingFailureException(\"{} not found with id: \" + id + \" and updatedAt: \" + updatedAt);",
                self.model()
            ));
        });
        b.push_line(&format!("return {result};"));
    }

    fn push_update(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let updated_at = NAMING.field_name(&self.ctx.common.updated_at);

        push_method(
            b,
            &[
                &format!("Update a {} row.", logical_name(self.table)),
                "@param id primary key",
                "@param newData new values",
                "@param updatedAt updated-at the caller read",
                "@return the updated row",
            ],
            &format!(
                "public CompletionStage<{model}> update(Long id, {model} newData, Instant updatedAt)"
            ),
            |b| {
                push_async(b, |b| {
                    b.push_line(&format!("newData.{}(id);", setter(&self.ctx.common.id)));
                    b.push_line(&format!("int updatedRows = DB.update({model}.class)"));
                    b.push_indent();
                    b.push_line(&format!(".set(\"{updated_at}\", Instant.now())"));
                    for col in self.ctx.own_columns(self.table) {
                        b.push_line(&format!(
                            ".set(\"{}\", newData.{}())",
                            NAMING.field_name(&col.col_name),
                            getter(&col.col_name)
                        ));
                    }
                    self.push_guarded_update(b, "newData");
                });
            },
        );
    }

    fn push_delete(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let flag = &self.ctx.common.is_deleted;
        let updated_at = NAMING.field_name(&self.ctx.common.updated_at);

        push_method(
            b,
            &[
                &format!("Soft-delete a {} row.", logical_name(self.table)),
                "@param id primary key",
                "@param updatedAt updated-at the caller read",
            ],
            "public CompletionStage<Void> delete(Long id, Instant updatedAt)",
            |b| {
                push_async(b, |b| {
                    b.push_line(&format!("int updatedRows = DB.update({model}.class)"));
                    b.push_indent();
                    b.push_line(&format!(
                        ".set(\"{}\", {})",
                        NAMING.field_name(&flag.name),
                        flag.java_literal(true)
                    ));
                    b.push_line(&format!(".set(\"{updated_at}\", Instant.now())"));
                    self.push_guarded_update(b, "null");
                });
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use tablegen_schema::Config;

    use super::*;

    fn table() -> Table {
        Table::new("users", "Users")
            .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
            .with_column(Column::new("user_name", "User name", "varchar").with_pkfk("AK"))
            .with_column(Column::new("age", "Age", "integer"))
            .with_column(Column::new("updated_at", "Updated", "timestamp"))
    }

    #[test]
    fn test_without_count_methods() {
        let mut config = Config::default();
        config.sql.include_count_method = false;
        let ctx = GenerationContext::from_config(&config);
        let code = RepositoryJava::new(&table(), &ctx).render();

        assert!(!code.contains("countAll()"));
        assert!(!code.contains("count(Users filter)"));
        assert!(code.contains("public CompletionStage<Optional<Users>> findByUserName(String userName) {\n"));
    }

    #[test]
    fn test_filter_operators() {
        let ctx = GenerationContext::default();
        let code = RepositoryJava::new(&table(), &ctx).render();

        assert!(code.contains("            query.contains(\"userName\", filter.getUserName());\n"));
        assert!(code.contains("            query.eq(\"age\", filter.getAge());\n"));
        assert!(!code.contains("filter.getUpdatedAt()"));
    }

    #[test]
    fn test_rls_uses_base_repository() {
        let mut config = Config::default();
        config.export.rls.enabled = true;
        let ctx = GenerationContext::from_config(&config);
        let code = RepositoryJava::new(&table(), &ctx).render();

        assert!(code.contains("public class UsersRepository extends BaseRepository<Users> {\n"));
        assert!(code.contains("        super(executionContext, sessionInfo, Users.class);\n"));
        assert!(code.contains("ExpressionList<Users> query = rlsFilter();"));
        assert!(!code.contains("DB.find(Users.class)"));
    }
}
