//! controllers/api/<Table>Controller.java generator.

use tablegen_codegen::builder::CodeBuilder;
use tablegen_core::{GeneratedFile, to_camel_case};
use tablegen_schema::Table;

use super::{NAMING, logical_name, push_doc};
use crate::java_file::JavaFile;

/// Thin Play handlers over the table's service.
pub struct ControllerJava<'a> {
    table: &'a Table,
}

impl<'a> ControllerJava<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    fn model(&self) -> String {
        NAMING.type_name(&self.table.table_name)
    }
}

/// `Map<String, String> params = ...` from the first value of each query
/// string key.
fn push_query_params(b: &mut CodeBuilder) {
    b.push_line("Map<String, String> params = request.queryString().entrySet().stream()");
    b.push_indent();
    b.push_line(".collect(Collectors.toMap(Map.Entry::getKey, entry -> entry.getValue()[0]));");
    b.push_dedent();
}

impl GeneratedFile for ControllerJava<'_> {
    fn path(&self) -> String {
        format!("controllers/api/{}Controller.java", self.model())
    }

    fn render(&self) -> String {
        let model = self.model();
        let var = to_camel_case(&model);
        let service = format!("{model}Service");
        let service_var = to_camel_case(&service);

        JavaFile::new("controllers.api")
            .imports([
                "com.fasterxml.jackson.databind.JsonNode",
                "com.fasterxml.jackson.databind.ObjectMapper",
                "com.fasterxml.jackson.databind.node.ObjectNode",
                "controllers.actions.Authenticated",
                "java.time.Instant",
                "java.util.Map",
                "java.util.concurrent.CompletionStage",
                "java.util.stream.Collectors",
                "javax.inject.Inject",
                "libraries.CsvImportHandler",
                "libraries.CsvResult",
                "play.libs.Json",
                "play.mvc.Controller",
                "play.mvc.Http",
                "play.mvc.Result",
            ])
            .import(format!("models.{model}"))
            .import(format!("services.{service}"))
            .render(|b| {
                push_doc(b, &[format!("{} controller", logical_name(self.table)).as_str()]);
                b.push_line("@Authenticated");
                b.push_block(&format!("public class {model}Controller extends Controller {{"), "}", |b| {
                    b.push_blank();
                    b.push_line(&format!("private final {service} {service_var};"));
                    b.push_blank();
                    b.push_line("@Inject");
                    b.push_block(
                        &format!("public {model}Controller({service} {service_var}) {{"),
                        "}",
                        |b| {
                            b.push_line(&format!("this.{service_var} = {service_var};"));
                        },
                    );
                    b.push_blank();

                    b.push_block("public CompletionStage<Result> find(Http.Request request) {", "}", |b| {
                        b.push_line("int offset = request.queryString(\"offset\").map(Integer::parseInt).orElse(0);");
                        b.push_line("int limit = request.queryString(\"limit\").map(Integer::parseInt).orElse(Integer.MAX_VALUE);");
                        push_query_params(b);
                        b.push_line("params.remove(\"offset\");");
                        b.push_line("params.remove(\"limit\");");
                        b.push_line(&format!(
                            "{model} filter = new ObjectMapper().convertValue(params, {model}.class);"
                        ));
                        b.push_line(&format!(
                            "return {service_var}.find(filter, offset, limit).thenApply(result -> ok(result));"
                        ));
                    });
                    b.push_blank();

                    b.push_block(
                        "public CompletionStage<Result> findById(Http.Request request, Long id) {",
                        "}",
                        |b| {
                            b.push_line(&format!("return {service_var}.findById(id).thenApply(found ->"));
                            b.push_indent();
                            b.push_line("found.map(m -> ok(Json.toJson(m))).orElse(notFound())");
                            b.push_dedent();
                            b.push_line(");");
                        },
                    );
                    b.push_blank();

                    b.push_block("public CompletionStage<Result> create(Http.Request request) {", "}", |b| {
                        b.push_line("JsonNode json = request.body().asJson();");
                        b.push_line(&format!("{model} {var} = Json.fromJson(json, {model}.class);"));
                        b.push_line(&format!(
                            "return {service_var}.create({var}).thenApply(inserted -> created(Json.toJson(inserted)));"
                        ));
                    });
                    b.push_blank();

                    b.push_block(
                        "public CompletionStage<Result> update(Http.Request request, Long id) {",
                        "}",
                        |b| {
                            b.push_line("JsonNode json = request.body().asJson();");
                            b.push_line(&format!("{model} {var} = Json.fromJson(json, {model}.class);"));
                            b.push_line(&format!(
                                "return {service_var}.update(id, {var}).thenApply(updated -> ok(Json.toJson(updated)));"
                            ));
                        },
                    );
                    b.push_blank();

                    b.push_block(
                        "public CompletionStage<Result> delete(Http.Request request, Long id, String updatedAt) {",
                        "}",
                        |b| {
                            b.push_line(&format!(
                                "return {service_var}.delete(id, Instant.parse(updatedAt)).thenApply(result -> ok());"
                            ));
                        },
                    );
                    b.push_blank();

                    b.push_block("public CompletionStage<Result> exportCsv(Http.Request request) {", "}", |b| {
                        push_query_params(b);
                        b.push_line(&format!(
                            "{model} filter = new ObjectMapper().convertValue(params, {model}.class);"
                        ));
                        b.push_line(&format!(
                            "return {service_var}.exportCsv(filter).thenApply(csv -> CsvResult.ok(csv, \"{}.csv\"));",
                            self.table.table_name
                        ));
                    });
                    b.push_blank();

                    b.push_block("public CompletionStage<Result> importCsv(Http.Request request) {", "}", |b| {
                        b.push_line("return CsvImportHandler.handle(request, file ->");
                        b.push_indent();
                        b.push_block(&format!("{service_var}.importCsv(file).thenApply(count -> {{"), "})", |b| {
                            b.push_line("ObjectNode body = Json.newObject();");
                            b.push_line("body.put(\"message\", \"CSV imported successfully.\");");
                            b.push_line("body.put(\"imported_count\", count);");
                            b.push_line("return ok(body);");
                        });
                        b.push_dedent();
                        b.push_line(");");
                    });
                });
            })
    }
}
