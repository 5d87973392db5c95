//! Row-level security support: models/SessionInfo.java and models/RlsAware.java.

use tablegen_codegen::language::GenerationContext;
use tablegen_core::GeneratedFile;

use super::NAMING;
use crate::java_file::JavaFile;

/// Per-request session: the tenant and whether the user is an admin.
pub struct SessionInfoJava<'a> {
    ctx: &'a GenerationContext,
}

impl<'a> SessionInfoJava<'a> {
    pub fn new(ctx: &'a GenerationContext) -> Self {
        Self { ctx }
    }
}

impl GeneratedFile for SessionInfoJava<'_> {
    fn path(&self) -> String {
        "models/SessionInfo.java".to_string()
    }

    fn render(&self) -> String {
        let admin = NAMING.field_name(&self.ctx.rls.admin_flag_column);
        JavaFile::new("models")
            .imports([
                "lombok.AllArgsConstructor",
                "lombok.Getter",
                "lombok.NoArgsConstructor",
                "lombok.Setter",
            ])
            .render(|b| {
                b.push_doc_block(["Session information used for row-level security"]);
                b.push_lines(["@Getter", "@Setter", "@NoArgsConstructor", "@AllArgsConstructor"]);
                b.push_block("public class SessionInfo {", "}", |b| {
                    b.push_line(&format!("private boolean {admin};"));
                    b.push_line("private String tenantId;");
                });
            })
    }
}

/// Marker interface of models scoped by tenant.
pub struct RlsAwareJava;

impl GeneratedFile for RlsAwareJava {
    fn path(&self) -> String {
        "models/RlsAware.java".to_string()
    }

    fn render(&self) -> String {
        JavaFile::new("models").render(|b| {
            b.push_doc_block(["Implemented by models that belong to a tenant"]);
            b.push_block("public interface RlsAware {", "}", |b| {
                b.push_line("String getTenantId();");
            });
        })
    }
}
