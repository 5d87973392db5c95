//! Java artifacts of a composed query: result DTO, repository, service
//! and controller, all named after the plan's base name.

use tablegen_codegen::builder::CodeBuilder;
use tablegen_core::{GeneratedFile, TypeMapper};
use tablegen_query::{ParamType, Parameter, QueryPlan, ResultKind};

use super::{NAMING, push_doc};
use crate::{java_file::JavaFile, type_mapper::JavaTypeMapper};

/// Element type of the result list and the import it needs.
fn result_type(plan: &QueryPlan) -> (String, Option<String>) {
    match plan.kind {
        ResultKind::Native => (plan.base_name.clone(), Some(format!("models.{}", plan.base_name))),
        ResultKind::Record => (plan.dto_name(), Some(format!("models.dto.{}", plan.dto_name()))),
        ResultKind::Scalar => {
            let ty = plan.scalar().and_then(|c| c.sql_type());
            (
                ty.map_or("String", |ty| JavaTypeMapper.map_type(ty)).to_string(),
                ty.and_then(JavaTypeMapper::import).map(str::to_string),
            )
        }
    }
}

fn param_type(param: &Parameter) -> &'static str {
    match param.ty {
        ParamType::Text => "String",
        ParamType::TextList => "List<String>",
        ParamType::Integer => "Integer",
    }
}

/// `List<String> ids, String name`
fn signature(plan: &QueryPlan) -> String {
    plan.signature_parameters()
        .map(|p| format!("{} {}", param_type(p), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `ids, name`
fn call_arguments(plan: &QueryPlan) -> String {
    plan.signature_parameters()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text block content: backslashes and `"""` escaped.
fn escape_text_block(line: &str) -> String {
    line.replace('\\', "\\\\").replace("\"\"\"", "\\\"\"\"")
}

/// `@param` lines for the signature parameters.
fn param_docs(plan: &QueryPlan) -> Vec<String> {
    plan.signature_parameters()
        .map(|p| format!("@param {} bound to :{}", p.name, p.name))
        .collect()
}

fn push_search_doc(b: &mut CodeBuilder, plan: &QueryPlan, summary: &str) {
    let params = param_docs(plan);
    let mut lines: Vec<&str> = vec![summary];
    lines.extend(params.iter().map(String::as_str));
    lines.push("@return result rows");
    push_doc(b, &lines);
}

/// models/dto/<Base>Dto.java, for [`ResultKind::Record`] results.
pub struct QueryDtoJava<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryDtoJava<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }
}

impl GeneratedFile for QueryDtoJava<'_> {
    fn path(&self) -> String {
        format!("models/dto/{}.java", self.plan.dto_name())
    }

    fn render(&self) -> String {
        let mut file = JavaFile::new("models.dto").import("lombok.Data");
        for col in &self.plan.columns {
            if let Some(import) = col.sql_type().and_then(JavaTypeMapper::import) {
                file.add_import(import);
            }
        }

        file.render(|b| {
            push_doc(b, &["SQL query result DTO"]);
            b.push_line("@Data");
            b.push_block(
                &format!("public class {} {{", self.plan.dto_name()),
                "}",
                |b| {
                    for col in &self.plan.columns {
                        let ty = col
                            .sql_type()
                            .map_or("String", |ty| JavaTypeMapper.map_type(ty));
                        if !col.logical_name().is_empty() {
                            b.push_jsdoc(col.logical_name());
                        }
                        b.push_line(&format!("private {ty} {};", NAMING.field_name(&col.name)));
                    }
                },
            );
        })
    }
}

/// repository/<Base>SqlRepository.java: runs the statement.
pub struct QueryRepositoryJava<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryRepositoryJava<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }

    fn class_name(&self) -> String {
        format!("{}SqlRepository", self.plan.base_name)
    }

    /// `.setParameter(...)` line for one parameter.
    fn binding(param: &Parameter) -> String {
        let name = &param.name;
        let value = match (&param.derived_from, param.ty) {
            (Some(list), _) => format!("{list} != null ? {list}.size() : 0"),
            (None, ParamType::Text) => format!("{name} != null ? {name} : \"\""),
            (None, ParamType::TextList) => format!("{name} != null ? {name} : List.of()"),
            (None, ParamType::Integer) => name.clone(),
        };
        format!(".setParameter(\"{name}\", {value})")
    }
}

impl GeneratedFile for QueryRepositoryJava<'_> {
    fn path(&self) -> String {
        format!("repository/{}.java", self.class_name())
    }

    fn render(&self) -> String {
        let plan = self.plan;
        let class_name = self.class_name();
        let (element, import) = result_type(plan);

        let mut file = JavaFile::new("repository")
            .imports([
                "io.ebean.DB",
                "java.util.List",
                "java.util.concurrent.CompletionStage",
                "javax.inject.Inject",
            ])
            .static_import("java.util.concurrent.CompletableFuture.supplyAsync");
        if let Some(import) = import {
            file.add_import(import);
        }

        file.render(|b| {
            push_doc(b, &[format!("Runs the {} query", plan.base_name).as_str()]);
            b.push_block(&format!("public class {class_name} {{"), "}", |b| {
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
                b.push_blank();

                push_search_doc(b, plan, "Run the query.");
                b.push_block(
                    &format!(
                        "public CompletionStage<List<{element}>> search({}) {{",
                        signature(plan)
                    ),
                    "}",
                    |b| {
                        b.push_block("return supplyAsync(() -> {", "}, executionContext);", |b| {
                            b.push_line("String sql = \"\"\"");
                            b.push_indent();
                            for line in plan.repository_sql.lines() {
                                b.push_line(&escape_text_block(line));
                            }
                            b.push_line("\"\"\";");
                            b.push_dedent();
                            b.push_blank();

                            let scalar = plan.kind == ResultKind::Scalar;
                            match plan.kind {
                                ResultKind::Native => b.push_line(&format!(
                                    "return DB.findNative({element}.class, sql)"
                                )),
                                ResultKind::Record => b.push_line(&format!(
                                    "return DB.findDto({element}.class, sql)"
                                )),
                                ResultKind::Scalar => b.push_line("return DB.sqlQuery(sql)"),
                            };
                            b.push_indent();
                            for param in &plan.parameters {
                                b.push_line(&Self::binding(param));
                            }
                            if scalar {
                                b.push_line(&format!(".mapToScalar({element}.class)"));
                            }
                            b.push_line(".findList();");
                            b.push_dedent();
                        });
                    },
                );
            });
        })
    }
}

/// services/<Base>SqlService.java: delegates to the repository.
pub struct QueryServiceJava<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryServiceJava<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }
}

impl GeneratedFile for QueryServiceJava<'_> {
    fn path(&self) -> String {
        format!("services/{}SqlService.java", self.plan.base_name)
    }

    fn render(&self) -> String {
        let plan = self.plan;
        let class_name = format!("{}SqlService", plan.base_name);
        let repo = format!("{}SqlRepository", plan.base_name);
        let (element, import) = result_type(plan);

        let mut file = JavaFile::new("services")
            .imports([
                "java.util.List",
                "java.util.concurrent.CompletionStage",
                "javax.inject.Inject",
            ])
            .import(format!("repository.{repo}"));
        if let Some(import) = import {
            file.add_import(import);
        }

        file.render(|b| {
            push_doc(b, &[format!("Service for the {} query", plan.base_name).as_str()]);
            b.push_block(&format!("public class {class_name} {{"), "}", |b| {
                b.push_line(&format!("private final {repo} repository;"));
                b.push_blank();
                b.push_line("@Inject");
                b.push_block(&format!("public {class_name}({repo} repository) {{"), "}", |b| {
                    b.push_line("this.repository = repository;");
                });
                b.push_blank();
                push_search_doc(b, plan, "Run the query.");
                b.push_block(
                    &format!(
                        "public CompletionStage<List<{element}>> search({}) {{",
                        signature(plan)
                    ),
                    "}",
                    |b| {
                        b.push_line(&format!("return repository.search({});", call_arguments(plan)));
                    },
                );
            });
        })
    }
}

/// controllers/api/<Base>SqlController.java: reads the parameters from
/// the query string and returns the rows as JSON.
pub struct QueryControllerJava<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryControllerJava<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }

    fn class_name(&self) -> String {
        format!("{}SqlController", self.plan.base_name)
    }

    fn read_parameter(param: &Parameter) -> String {
        let name = &param.name;
        match param.ty {
            ParamType::Text => {
                format!("String {name} = request.queryString(\"{name}\").orElse(null);")
            }
            ParamType::TextList => format!(
                "List<String> {name} = request.queryString().containsKey(\"{name}\") ? Arrays.asList(request.queryString().get(\"{name}\")) : Collections.emptyList();"
            ),
            ParamType::Integer => format!(
                "Integer {name} = request.queryString(\"{name}\").map(Integer::valueOf).orElse(null);"
            ),
        }
    }
}

impl GeneratedFile for QueryControllerJava<'_> {
    fn path(&self) -> String {
        format!("controllers/api/{}.java", self.class_name())
    }

    fn render(&self) -> String {
        let plan = self.plan;
        let class_name = self.class_name();
        let service = format!("{}SqlService", plan.base_name);
        let has_list = plan.signature_parameters().any(Parameter::is_list);

        JavaFile::new("controllers.api")
            .imports([
                "controllers.actions.Authenticated",
                "java.util.concurrent.CompletionStage",
                "javax.inject.Inject",
                "play.libs.Json",
                "play.mvc.Controller",
                "play.mvc.Http",
                "play.mvc.Result",
            ])
            .import(format!("services.{service}"))
            .import_if(has_list, "java.util.Arrays")
            .import_if(has_list, "java.util.Collections")
            .import_if(has_list, "java.util.List")
            .render(|b| {
                push_doc(b, &[format!("Endpoint for the {} query", plan.base_name).as_str()]);
                b.push_line("@Authenticated");
                b.push_block(&format!("public class {class_name} extends Controller {{"), "}", |b| {
                    b.push_line(&format!("private final {service} service;"));
                    b.push_blank();
                    b.push_line("@Inject");
                    b.push_block(&format!("public {class_name}({service} service) {{"), "}", |b| {
                        b.push_line("this.service = service;");
                    });
                    b.push_blank();
                    push_doc(b, &["Run the query with query-string parameters.", "@return rows as JSON"]);
                    b.push_block("public CompletionStage<Result> search(Http.Request request) {", "}", |b| {
                        let mut any = false;
                        for param in plan.signature_parameters() {
                            b.push_line(&Self::read_parameter(param));
                            any = true;
                        }
                        if any {
                            b.push_blank();
                        }
                        b.push_line(&format!(
                            "return service.search({}).thenApply(list -> ok(Json.toJson(list)));",
                            call_arguments(plan)
                        ));
                    });
                });
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_query::QueryState;
    use tablegen_schema::{Column, Table};

    use super::*;

    fn tables() -> Vec<Table> {
        vec![
            Table::new("users", "Users")
                .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
                .with_column(Column::new("score", "Score", "numeric").with_length("8,2")),
        ]
    }

    fn build_plan(select: Option<&str>, filters: &[&str]) -> QueryPlan {
        let mut state = QueryState::new();
        state.add_table("users");
        for filter in filters {
            state.add_filter(*filter);
        }
        state.set_select(select.map(str::to_string));
        QueryPlan::build(&state, &tables()).unwrap()
    }

    #[test]
    fn test_scalar_result_type() {
        let plan = build_plan(Some("t0.score"), &[]);
        assert_eq!(
            result_type(&plan),
            ("BigDecimal".to_string(), Some("java.math.BigDecimal".to_string()))
        );

        let plan = build_plan(Some("count(*) AS total"), &[]);
        assert_eq!(result_type(&plan), ("String".to_string(), None));
    }

    #[test]
    fn test_bindings() {
        let plan = build_plan(None, &["t0.id IN (:ids)", "cardinality(:idsSize) > 0", "t0.score > :min"]);
        let bindings: Vec<String> = plan.parameters.iter().map(QueryRepositoryJava::binding).collect();
        assert_eq!(
            bindings,
            [
                ".setParameter(\"ids\", ids != null ? ids : List.of())",
                ".setParameter(\"idsSize\", ids != null ? ids.size() : 0)",
                ".setParameter(\"min\", min != null ? min : \"\")",
            ]
        );
        assert_eq!(signature(&plan), "List<String> ids, String min");
        assert_eq!(call_arguments(&plan), "ids, min");
    }

    #[test]
    fn test_native_repository_uses_model() {
        let plan = build_plan(None, &[]);
        let code = QueryRepositoryJava::new(&plan).render();
        assert!(code.contains("import models.Users;\n"));
        assert!(code.contains("public CompletionStage<List<Users>> search() {\n"));
        assert!(code.contains("            return DB.findNative(Users.class, sql)\n"));
        assert!(code.contains("                    t0.*\n"));
    }

    #[test]
    fn test_scalar_repository_maps_to_scalar() {
        let plan = build_plan(Some("t0.score"), &["t0.id = :id"]);
        let code = QueryRepositoryJava::new(&plan).render();
        assert!(code.contains("            return DB.sqlQuery(sql)\n"));
        assert!(code.contains("                .mapToScalar(BigDecimal.class)\n"));
        assert!(code.contains("public CompletionStage<List<BigDecimal>> search(String id) {\n"));
    }

    #[test]
    fn test_controller_reads_parameters() {
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_filter("t0.id IN (:ids)");
        state.set_limit(":limit");
        let plan = QueryPlan::build(&state, &tables()).unwrap();
        let code = QueryControllerJava::new(&plan).render();

        assert!(code.contains("import java.util.Arrays;\n"));
        assert!(code.contains(
            "Integer limit = request.queryString(\"limit\").map(Integer::valueOf).orElse(null);"
        ));
        assert!(code.contains("return service.search(ids, limit).thenApply(list -> ok(Json.toJson(list)));"));
    }

    #[test]
    fn test_text_block_escaping() {
        assert_eq!(escape_text_block(r#"a = '\d' AND b = """x""""#), r#"a = '\\d' AND b = \"""x\""""#);
    }
}
