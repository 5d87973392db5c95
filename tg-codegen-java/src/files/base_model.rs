//! models/BaseModel.java generator.

use tablegen_codegen::{builder::CodeBuilder, language::GenerationContext};
use tablegen_core::GeneratedFile;

use super::NAMING;
use crate::java_file::JavaFile;

/// Mapped superclass carrying the common columns.
pub struct BaseModelJava<'a> {
    ctx: &'a GenerationContext,
}

impl<'a> BaseModelJava<'a> {
    pub fn new(ctx: &'a GenerationContext) -> Self {
        Self { ctx }
    }
}

fn push_field(b: &mut CodeBuilder, doc: &str, annotation: Option<&str>, declaration: &str) {
    b.push_doc_block([doc]);
    if let Some(annotation) = annotation {
        b.push_line(annotation);
    }
    b.push_line(declaration);
}

impl GeneratedFile for BaseModelJava<'_> {
    fn path(&self) -> String {
        "models/BaseModel.java".to_string()
    }

    fn render(&self) -> String {
        let common = &self.ctx.common;
        let flag = &common.is_deleted;

        JavaFile::new("models")
            .imports([
                "io.ebean.Model",
                "io.ebean.annotation.WhenCreated",
                "io.ebean.annotation.WhenModified",
                "jakarta.persistence.Id",
                "jakarta.persistence.MappedSuperclass",
                "java.time.Instant",
                "lombok.Getter",
                "lombok.Setter",
            ])
            .render(|b| {
                b.push_doc_block(["Columns shared by every table"]);
                b.push_lines(["@MappedSuperclass", "@Getter", "@Setter"]);
                b.push_block("public class BaseModel extends Model {", "}", |b| {
                    b.push_line("@Id");
                    b.push_line(&format!("public Long {};", NAMING.field_name(&common.id)));
                    b.push_blank();
                    push_field(
                        b,
                        "Soft-delete flag",
                        None,
                        &format!(
                            "public {} {} = {};",
                            flag.java_type(),
                            NAMING.field_name(&flag.name),
                            flag.java_literal(false)
                        ),
                    );
                    b.push_blank();
                    push_field(
                        b,
                        "Created at",
                        Some("@WhenCreated"),
                        &format!("public Instant {};", NAMING.field_name(&common.created_at)),
                    );
                    b.push_blank();
                    push_field(
                        b,
                        "Created by",
                        None,
                        &format!("public String {};", NAMING.field_name(&common.created_by)),
                    );
                    b.push_blank();
                    push_field(
                        b,
                        "Updated at",
                        Some("@WhenModified"),
                        &format!("public Instant {};", NAMING.field_name(&common.updated_at)),
                    );
                    b.push_blank();
                    push_field(
                        b,
                        "Updated by",
                        None,
                        &format!("public String {};", NAMING.field_name(&common.updated_by)),
                    );
                });
            })
    }
}
