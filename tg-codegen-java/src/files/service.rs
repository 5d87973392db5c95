//! services/<Table>Service.java generator.
//!
//! Wraps the repository with validation (required fields, maximum
//! lengths, unique values looked up through `findBy<Column>`), paged JSON
//! results and CSV export/import. Imports reject files that repeat a
//! unique value before anything is inserted.

use tablegen_codegen::{builder::CodeBuilder, language::GenerationContext};
use tablegen_core::{GeneratedFile, SqlType, to_camel_case};
use tablegen_schema::{Column, Table};

use super::{NAMING, getter, java_import, logical_name, lookup_columns, push_doc, setter};
use crate::java_file::JavaFile;

/// Splits a CSV line on commas outside double quotes.
const CSV_SPLIT_PATTERN: &str = r#"",(?=(?:[^\"]*\"[^\"]*\")*[^\"]*$)""#;

pub struct ServiceJava<'a> {
    table: &'a Table,
    ctx: &'a GenerationContext,
}

impl<'a> ServiceJava<'a> {
    pub fn new(table: &'a Table, ctx: &'a GenerationContext) -> Self {
        Self { table, ctx }
    }

    fn model(&self) -> String {
        NAMING.type_name(&self.table.table_name)
    }

    fn repo(&self) -> String {
        format!("{}Repository", self.model())
    }

    fn repo_var(&self) -> String {
        to_camel_case(&self.repo())
    }

    /// Columns written to and read from CSV files: everything but the
    /// primary key and the id column.
    fn csv_columns(&self) -> Vec<&'a Column> {
        self.table
            .columns
            .iter()
            .filter(|c| !c.is_primary_key() && c.col_name != self.ctx.common.id)
            .collect()
    }
}

fn label(col: &Column) -> &str {
    if col.col_name_jp.is_empty() {
        &col.col_name
    } else {
        &col.col_name_jp
    }
}

/// Java expression converting CSV text to the column's field type.
fn parse_expr(ty: SqlType, value: &str) -> String {
    match ty {
        SqlType::BigInt => format!("Long.valueOf({value})"),
        SqlType::Int => format!("Integer.valueOf({value})"),
        SqlType::Decimal => format!("new BigDecimal({value})"),
        SqlType::Bool => format!("Boolean.valueOf({value})"),
        SqlType::Instant => format!("Instant.parse({value})"),
        SqlType::Time => format!("LocalTime.parse({value})"),
        SqlType::Bytes => format!("HexFormat.of().parseHex({value})"),
        SqlType::Text | SqlType::Other => value.to_string(),
    }
}

fn escape_java(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl GeneratedFile for ServiceJava<'_> {
    fn path(&self) -> String {
        format!("services/{}Service.java", self.model())
    }

    fn render(&self) -> String {
        let model = self.model();
        let repo = self.repo();
        let repo_var = self.repo_var();

        let mut file = JavaFile::new("services")
            .imports([
                "com.fasterxml.jackson.databind.node.ObjectNode",
                "java.io.File",
                "java.io.IOException",
                "java.io.PrintWriter",
                "java.io.UncheckedIOException",
                "java.nio.charset.StandardCharsets",
                "java.nio.file.Files",
                "java.nio.file.StandardOpenOption",
                "java.time.Instant",
                "java.util.Arrays",
                "java.util.List",
                "java.util.Map",
                "java.util.Optional",
                "java.util.concurrent.CompletionStage",
                "java.util.stream.Collectors",
                "java.util.stream.Stream",
                "javax.inject.Inject",
                "libraries.CsvHelper",
                "play.libs.Json",
            ])
            .import(format!("models.{model}"))
            .import(format!("repository.{repo}"))
            .static_import("java.util.concurrent.CompletableFuture.supplyAsync");
        for col in self.csv_columns() {
            if let Some(import) = java_import(col) {
                file.add_import(import);
            }
            if col.sql_type() == SqlType::Bytes {
                file.add_import("java.util.HexFormat");
            }
        }

        file.render(|b| {
            push_doc(b, &[format!("{} service", logical_name(self.table)).as_str()]);
            b.push_block(&format!("public class {model}Service {{"), "}", |b| {
                b.push_line(&format!("private final {repo} {repo_var};"));
                b.push_blank();
                b.push_line("@Inject");
                b.push_block(
                    &format!("public {model}Service({repo} {repo_var}) {{"),
                    "}",
                    |b| {
                        b.push_line(&format!("this.{repo_var} = {repo_var};"));
                    },
                );
                b.push_blank();
                self.push_validate(b);
                b.push_blank();
                self.push_find(b);
                b.push_blank();
                self.push_crud(b);
                b.push_blank();
                self.push_export(b);
                b.push_blank();
                self.push_import(b);
                b.push_blank();
                self.push_helpers(b);
            });
        })
    }
}

impl ServiceJava<'_> {
    fn push_validate(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let var = to_camel_case(&model);
        let repo_var = self.repo_var();

        push_doc(b, &[
            "Check required fields, maximum lengths and unique values.",
            &format!("@param {var} row to check"),
        ]);
        b.push_block(&format!("private void validate({model} {var}) {{"), "}", |b| {
            for col in self.ctx.own_columns(self.table) {
                let get = format!("{var}.{}()", getter(&col.col_name));
                let name = escape_java(label(col));
                if col.is_not_null() {
                    b.push_block(&format!("if ({get} == null) {{"), "}", |b| {
                        b.push_line(&format!(
                            "throw new RuntimeException(\"{name} is required.\");"
                        ));
                    });
                }
                let max = col.length().and_then(|l| l.parse::<u32>().ok());
                if let (SqlType::Text, Some(max)) = (col.sql_type(), max) {
                    b.push_block(
                        &format!("if ({get} != null && {get}.length() > {max}) {{"),
                        "}",
                        |b| {
                            b.push_line(&format!(
                                "throw new RuntimeException(\"{name} must be at most {max} characters.\");"
                            ));
                        },
                    );
                }
            }

            let id = getter(&self.ctx.common.id);
            for col in lookup_columns(self.table) {
                let get = format!("{var}.{}()", getter(&col.col_name));
                let name = escape_java(label(col));
                b.push_block(&format!("if ({get} != null) {{"), "}", |b| {
                    b.push_line(&format!(
                        "Optional<{model}> found = {repo_var}.findBy{}({get}).toCompletableFuture().join();",
                        NAMING.accessor_suffix(&col.col_name)
                    ));
                    b.push_block(
                        &format!(
                            "if (found.isPresent() && !found.get().{id}().equals({var}.{id}())) {{"
                        ),
                        "}",
                        |b| {
                            b.push_line(&format!(
                                "throw new RuntimeException(\"{name} is already in use.\");"
                            ));
                        },
                    );
                });
            }
        });
    }

    fn push_find(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let repo_var = self.repo_var();
        let name = logical_name(self.table);
        let counted = self.ctx.include_count_method;

        b.push_block("public CompletionStage<ObjectNode> find() {", "}", |b| {
            b.push_line("return find(0, Integer.MAX_VALUE);");
        });
        b.push_blank();
        push_doc(b, &[
            &format!("A page of {name} as JSON: total and data."),
            "@param offset first row",
            "@param limit maximum number of rows",
            "@return the page",
        ]);
        b.push_block(
            "public CompletionStage<ObjectNode> find(int offset, int limit) {",
            "}",
            |b| {
                if counted {
                    b.push_line(&format!(
                        "CompletionStage<Integer> totalFuture = {repo_var}.countAll();"
                    ));
                    b.push_line(&format!(
                        "CompletionStage<List<{model}>> dataFuture = {repo_var}.findAll(offset, limit);"
                    ));
                    b.push_line("return totalFuture.thenCombine(dataFuture, (total, data) -> toPage(total, data));");
                } else {
                    b.push_line(&format!(
                        "return {repo_var}.findAll(offset, limit).thenApply(data -> toPage(data.size(), data));"
                    ));
                }
            },
        );
        b.push_blank();
        b.push_block(
            &format!("public CompletionStage<ObjectNode> find({model} filter) {{"),
            "}",
            |b| {
                b.push_line("return find(filter, 0, Integer.MAX_VALUE);");
            },
        );
        b.push_blank();
        push_doc(b, &[
            &format!("Search {name} and return a page as JSON: total and data."),
            "@param filter search conditions",
            "@param offset first row",
            "@param limit maximum number of rows",
            "@return the page",
        ]);
        b.push_block(
            &format!("public CompletionStage<ObjectNode> find({model} filter, int offset, int limit) {{"),
            "}",
            |b| {
                if counted {
                    b.push_line(&format!(
                        "CompletionStage<Integer> totalFuture = {repo_var}.count(filter);"
                    ));
                    b.push_line(&format!(
                        "CompletionStage<List<{model}>> dataFuture = {repo_var}.find(filter, offset, limit);"
                    ));
                    b.push_line("return totalFuture.thenCombine(dataFuture, (total, data) -> toPage(total, data));");
                } else {
                    b.push_line(&format!(
                        "return {repo_var}.find(filter, offset, limit).thenApply(data -> toPage(data.size(), data));"
                    ));
                }
            },
        );
    }

    fn push_crud(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let var = to_camel_case(&model);
        let repo_var = self.repo_var();
        let name = logical_name(self.table);

        push_doc(b, &[
            &format!("Find {name} by id."),
            "@param id primary key",
            "@return the row, if any",
        ]);
        b.push_block(
            &format!("public CompletionStage<Optional<{model}>> findById(Long id) {{"),
            "}",
            |b| {
                b.push_line(&format!("return {repo_var}.findById(id);"));
            },
        );
        b.push_blank();
        push_doc(b, &[
            &format!("Validate and insert a {name} row."),
            &format!("@param {var} row to insert"),
            "@return the inserted row",
        ]);
        b.push_block(
            &format!("public CompletionStage<{model}> create({model} {var}) {{"),
            "}",
            |b| {
                b.push_line(&format!("validate({var});"));
                b.push_line(&format!("return {repo_var}.insert({var});"));
            },
        );
        b.push_blank();
        push_doc(b, &[
            &format!("Validate and update a {name} row."),
            "@param id primary key",
            &format!("@param {var} new values, carrying the updated-at that was read"),
            "@return the updated row",
        ]);
        b.push_block(
            &format!("public CompletionStage<{model}> update(Long id, {model} {var}) {{"),
            "}",
            |b| {
                b.push_line(&format!("{var}.{}(id);", setter(&self.ctx.common.id)));
                b.push_line(&format!("validate({var});"));
                b.push_line(&format!(
                    "return {repo_var}.update(id, {var}, {var}.{}());",
                    getter(&self.ctx.common.updated_at)
                ));
            },
        );
        b.push_blank();
        push_doc(b, &[
            &format!("Soft-delete a {name} row."),
            "@param id primary key",
            "@param updatedAt updated-at the caller read",
        ]);
        b.push_block(
            "public CompletionStage<Void> delete(Long id, Instant updatedAt) {",
            "}",
            |b| {
                b.push_line(&format!("return {repo_var}.delete(id, updatedAt);"));
            },
        );
    }

    fn push_export(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let repo_var = self.repo_var();
        let columns = self.csv_columns();

        let header: Vec<String> = columns
            .iter()
            .map(|c| format!("\"{}\"", escape_java(label(c))))
            .collect();
        let row: Vec<String> = columns
            .iter()
            .map(|c| {
                let get = format!("m.{}()", getter(&c.col_name));
                if c.sql_type() == SqlType::Bytes {
                    format!("{get} == null ? null : HexFormat.of().formatHex({get})")
                } else {
                    get
                }
            })
            .collect();

        push_doc(b, &[
            &format!("Export {} rows matching a filter as a UTF-8 CSV file.", logical_name(self.table)),
            "@param filter search conditions",
            "@return the CSV file",
        ]);
        b.push_block(
            &format!("public CompletionStage<File> exportCsv({model} filter) {{"),
            "}",
            |b| {
                b.push_block(
                    &format!("return {repo_var}.find(filter).thenApply(list -> {{"),
                    "});",
                    |b| {
                        push_try_io(b, "try {", |b| {
                            b.push_line(&format!(
                                "File file = Files.createTempFile(\"{}_\", \".csv\").toFile();",
                                self.table.table_name
                            ));
                            b.push_line("byte[] bom = new byte[]{(byte) 0xEF, (byte) 0xBB, (byte) 0xBF};");
                            b.push_line("Files.write(file.toPath(), bom, StandardOpenOption.CREATE, StandardOpenOption.TRUNCATE_EXISTING);");
                            b.push_block(
                                "try (PrintWriter writer = new PrintWriter(Files.newBufferedWriter(file.toPath(), StandardCharsets.UTF_8, StandardOpenOption.APPEND))) {",
                                "}",
                                |b| {
                                    b.push_line("writer.print(csvLine(");
                                    push_arguments(b, &header);
                                    b.push_line(") + \"\\n\");");
                                    b.push_block(&format!("for ({model} m : list) {{"), "}", |b| {
                                        b.push_line("writer.print(csvLine(");
                                        push_arguments(b, &row);
                                        b.push_line(") + \"\\n\");");
                                    });
                                },
                            );
                            b.push_line("return file;");
                        });
                    },
                );
            },
        );
    }

    fn push_import(&self, b: &mut CodeBuilder) {
        let model = self.model();
        let repo_var = self.repo_var();
        let columns = self.csv_columns();

        push_doc(b, &[
            &format!("Import {} rows from a CSV file with a header row.", logical_name(self.table)),
            "@param csvFile file in the exported layout",
            "@return number of imported rows",
        ]);
        b.push_block(
            "public CompletionStage<Integer> importCsv(File csvFile) {",
            "}",
            |b| {
                b.push_block("return supplyAsync(() -> {", "});", |b| {
                    b.push_line(&format!("List<{model}> records;"));
                    push_try_io(
                        b,
                        "try (Stream<String> lines = Files.lines(csvFile.toPath(), StandardCharsets.UTF_8)) {",
                        |b| {
                            b.push_line("records = lines");
                            b.push_indent();
                            b.push_lines([
                                ".skip(1)",
                                ".filter(line -> !line.isBlank())",
                            ]);
                            b.push_line(&format!(".map({model}Service::parseCsvLine)"));
                            b.push_block(".map(values -> {", "})", |b| {
                                b.push_line(&format!("{model} record = new {model}();"));
                                for (i, col) in columns.iter().enumerate() {
                                    let value = format!("values[{i}]");
                                    b.push_line(&format!(
                                        "if (values.length > {i} && !{value}.isEmpty()) record.{}({});",
                                        setter(&col.col_name),
                                        parse_expr(col.sql_type(), &value)
                                    ));
                                }
                                b.push_line("return record;");
                            });
                            b.push_line(".collect(Collectors.toList());");
                            b.push_dedent();
                        },
                    );
                    b.push_blank();

                    for col in lookup_columns(self.table) {
                        let counts = format!("{}Counts", NAMING.field_name(&col.col_name));
                        let get = getter(&col.col_name);
                        b.push_line(&format!("Map<Object, Long> {counts} = records.stream()"));
                        b.push_indent();
                        b.push_line(&format!(".filter(r -> r.{get}() != null)"));
                        b.push_line(&format!(
                            ".collect(Collectors.groupingBy({model}::{get}, Collectors.counting()));"
                        ));
                        b.push_dedent();
                        b.push_block(
                            &format!("if ({counts}.values().stream().anyMatch(count -> count > 1)) {{"),
                            "}",
                            |b| {
                                b.push_line(&format!(
                                    "throw new RuntimeException(\"The CSV file repeats a {} value.\");",
                                    escape_java(label(col))
                                ));
                            },
                        );
                    }
                    b.push_line("records.forEach(this::validate);");
                    b.push_blank();
                    b.push_line(&format!(
                        "return {repo_var}.batchInsert(records).toCompletableFuture().join();"
                    ));
                });
            },
        );
    }

    fn push_helpers(&self, b: &mut CodeBuilder) {
        let model = self.model();
        b.push_block(
            &format!("private static ObjectNode toPage(int total, List<{model}> data) {{"),
            "}",
            |b| {
                b.push_line("ObjectNode result = Json.newObject();");
                b.push_line("result.put(\"total\", total);");
                b.push_line("result.set(\"data\", Json.toJson(data));");
                b.push_line("return result;");
            },
        );
        b.push_blank();
        b.push_block("private static String csvLine(Object... values) {", "}", |b| {
            b.push_line("return Arrays.stream(values)");
            b.push_indent();
            b.push_line(".map(v -> \"\\\"\" + CsvHelper.processCsvField(v == null ? \"\" : String.valueOf(v)) + \"\\\"\")");
            b.push_line(".collect(Collectors.joining(\",\"));");
            b.push_dedent();
        });
        b.push_blank();
        b.push_block("private static String[] parseCsvLine(String line) {", "}", |b| {
            b.push_line(&format!("return Arrays.stream(line.split({CSV_SPLIT_PATTERN}, -1))"));
            b.push_indent();
            b.push_line(".map(v -> v.strip().replaceAll(\"^\\\"|\\\"$\", \"\").replace(\"\\\"\\\"\", \"\\\"\"))");
            b.push_line(".toArray(String[]::new);");
            b.push_dedent();
        });
    }
}

/// `try` block rethrowing `IOException` unchecked.
fn push_try_io(b: &mut CodeBuilder, header: &str, f: impl FnOnce(&mut CodeBuilder)) {
    b.push_line(header).push_indent();
    f(b);
    b.push_dedent().push_line("} catch (IOException e) {").push_indent();
    b.push_line("throw new UncheckedIOException(e);");
    b.push_dedent().push_line("}");
}

/// Comma-separated call arguments, one per line, one level deeper.
fn push_arguments(b: &mut CodeBuilder, args: &[String]) {
    b.push_indent();
    let last = args.len().saturating_sub(1);
    for (i, arg) in args.iter().enumerate() {
        if i == last {
            b.push_line(arg);
        } else {
            b.push_line(&format!("{arg},"));
        }
    }
    b.push_dedent();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expressions() {
        assert_eq!(parse_expr(SqlType::BigInt, "values[0]"), "Long.valueOf(values[0])");
        assert_eq!(parse_expr(SqlType::Decimal, "v"), "new BigDecimal(v)");
        assert_eq!(parse_expr(SqlType::Time, "v"), "LocalTime.parse(v)");
        assert_eq!(parse_expr(SqlType::Text, "v"), "v");
    }

    #[test]
    fn test_validation_checks() {
        let table = Table::new("users", "Users")
            .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
            .with_column(
                Column::new("email", "Mail \"address\"", "varchar")
                    .with_length("100")
                    .with_constraint("NN, U"),
            );
        let ctx = GenerationContext::default();
        let code = ServiceJava::new(&table, &ctx).render();

        assert!(code.contains("        if (users.getEmail() == null) {\n"));
        assert!(code.contains("throw new RuntimeException(\"Mail \\\"address\\\" is required.\");"));
        assert!(code.contains("if (users.getEmail() != null && users.getEmail().length() > 100) {"));
        assert!(code.contains(
            "Optional<Users> found = usersRepository.findByEmail(users.getEmail()).toCompletableFuture().join();"
        ));
        assert!(code.contains("Map<Object, Long> emailCounts = records.stream()"));
    }

    #[test]
    fn test_find_without_counts() {
        let mut config = tablegen_schema::Config::default();
        config.sql.include_count_method = false;
        let ctx = GenerationContext::from_config(&config);
        let table = Table::new("tags", "").with_column(Column::new("label", "", "text"));
        let code = ServiceJava::new(&table, &ctx).render();

        assert!(!code.contains("countAll()"));
        assert!(code.contains(
            "return tagsRepository.findAll(offset, limit).thenApply(data -> toPage(data.size(), data));"
        ));
    }
}
