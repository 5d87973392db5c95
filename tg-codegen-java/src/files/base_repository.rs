//! repository/BaseRepository.java generator, emitted with row-level security.

use tablegen_codegen::language::GenerationContext;
use tablegen_core::GeneratedFile;

use super::{NAMING, boolean_getter};
use crate::java_file::JavaFile;

/// Superclass of every repository when RLS is enabled: reads start from
/// `rlsFilter()`, which limits tenant-scoped models to the session's
/// tenant unless the session is an admin.
pub struct BaseRepositoryJava<'a> {
    ctx: &'a GenerationContext,
}

impl<'a> BaseRepositoryJava<'a> {
    pub fn new(ctx: &'a GenerationContext) -> Self {
        Self { ctx }
    }
}

impl GeneratedFile for BaseRepositoryJava<'_> {
    fn path(&self) -> String {
        "repository/BaseRepository.java".to_string()
    }

    fn render(&self) -> String {
        let tenant = NAMING.field_name(&self.ctx.rls.tenant_id_column);
        let is_admin = boolean_getter(&NAMING.field_name(&self.ctx.rls.admin_flag_column));

        JavaFile::new("repository")
            .imports([
                "io.ebean.DB",
                "io.ebean.ExpressionList",
                "javax.inject.Inject",
                "models.BaseModel",
                "models.RlsAware",
                "models.SessionInfo",
            ])
            .render(|b| {
                b.push_doc_block([
                    "Base repository applying the row-level security filter",
                    "@param <T> model type",
                ]);
                b.push_block(
                    "public abstract class BaseRepository<T extends BaseModel> {",
                    "}",
                    |b| {
                        b.push_blank();
                        b.push_lines([
                            "protected final DatabaseExecutionContext executionContext;",
                            "protected final SessionInfo sessionInfo;",
                            "private final Class<T> beanType;",
                        ]);
                        b.push_blank();
                        b.push_line("@Inject");
                        b.push_block(
                            "public BaseRepository(DatabaseExecutionContext executionContext, SessionInfo sessionInfo, Class<T> beanType) {",
                            "}",
                            |b| {
                                b.push_lines([
                                    "this.executionContext = executionContext;",
                                    "this.sessionInfo = sessionInfo;",
                                    "this.beanType = beanType;",
                                ]);
                            },
                        );
                        b.push_blank();
                        b.push_doc_block([
                            "Query over the bean type, limited to the session's tenant.",
                            "@return filtered expression list",
                        ]);
                        b.push_block("protected ExpressionList<T> rlsFilter() {", "}", |b| {
                            b.push_line("ExpressionList<T> query = DB.find(beanType).where();");
                            b.push_blank();
                            b.push_block(
                                &format!(
                                    "if (sessionInfo != null && !sessionInfo.{is_admin}() && RlsAware.class.isAssignableFrom(beanType)) {{"
                                ),
                                "}",
                                |b| {
                                    b.push_line(&format!(
                                        "query.eq(\"{tenant}\", sessionInfo.getTenantId());"
                                    ));
                                },
                            );
                            b.push_line("return query;");
                        });
                    },
                );
            })
    }
}
