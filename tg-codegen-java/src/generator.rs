//! Java generators.

use eyre::Result;
use tablegen_codegen::{
    generation::Format,
    language::{GenerationContext, Generator},
};
use tablegen_core::{Artifact, GeneratedFile};
use tablegen_query::{QueryPlan, ResultKind};
use tablegen_schema::Table;
use tracing::debug;

use crate::files::{
    BaseModelJava, BaseRepositoryJava, ControllerJava, DatabaseExecutionContextJava, ModelJava,
    OptimisticLockExceptionJava, QueryControllerJava, QueryDtoJava, QueryRepositoryJava,
    QueryServiceJava, RepositoryJava, RlsAwareJava, ServiceJava, SessionInfoJava,
};

/// Generator for the `java-model` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaModelGenerator;

impl Generator for JavaModelGenerator {
    fn format(&self) -> Format {
        Format::JavaModel
    }

    fn generate(&self, tables: &[Table], ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), rls = ctx.rls.enabled, "generating Java models");
        let mut artifacts = vec![BaseModelJava::new(ctx).to_artifact()];
        if ctx.rls.enabled {
            artifacts.push(SessionInfoJava::new(ctx).to_artifact());
            artifacts.push(RlsAwareJava.to_artifact());
        }
        artifacts.extend(tables.iter().map(|t| ModelJava::new(t, ctx).to_artifact()));
        Ok(artifacts)
    }
}

/// Generator for the `java-repo` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaRepoGenerator;

impl Generator for JavaRepoGenerator {
    fn format(&self) -> Format {
        Format::JavaRepo
    }

    fn generate(&self, tables: &[Table], ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), rls = ctx.rls.enabled, "generating Java repositories");
        let mut artifacts = vec![
            OptimisticLockExceptionJava.to_artifact(),
            DatabaseExecutionContextJava.to_artifact(),
        ];
        if ctx.rls.enabled {
            artifacts.push(BaseRepositoryJava::new(ctx).to_artifact());
        }
        artifacts.extend(tables.iter().map(|t| RepositoryJava::new(t, ctx).to_artifact()));
        Ok(artifacts)
    }
}

/// Generator for the `java-service` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaServiceGenerator;

impl Generator for JavaServiceGenerator {
    fn format(&self) -> Format {
        Format::JavaService
    }

    fn generate(&self, tables: &[Table], ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), "generating Java services");
        Ok(tables
            .iter()
            .map(|t| ServiceJava::new(t, ctx).to_artifact())
            .collect())
    }
}

/// Generator for the `java-controller` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaControllerGenerator;

impl Generator for JavaControllerGenerator {
    fn format(&self) -> Format {
        Format::JavaController
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        Ok(tables
            .iter()
            .map(|t| ControllerJava::new(t).to_artifact())
            .collect())
    }
}

/// Java artifacts of a query. The DTO is only emitted for record results;
/// native results reuse the table's model and scalars a boxed type.
pub fn query_artifacts(plan: &QueryPlan) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(4);
    if plan.kind == ResultKind::Record {
        artifacts.push(QueryDtoJava::new(plan).to_artifact());
    }
    artifacts.push(QueryRepositoryJava::new(plan).to_artifact());
    artifacts.push(QueryServiceJava::new(plan).to_artifact());
    artifacts.push(QueryControllerJava::new(plan).to_artifact());
    artifacts
}

#[cfg(test)]
mod tests {
    use tablegen_codegen::testing::{context_from_toml, default_context, sample_tables};

    use super::*;

    fn paths(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.path.as_str()).collect()
    }

    #[test]
    fn test_model_generator_without_rls() {
        let artifacts = JavaModelGenerator
            .generate(&sample_tables(), &default_context())
            .unwrap();
        assert_eq!(
            paths(&artifacts),
            ["models/BaseModel.java", "models/Users.java", "models/Departments.java"]
        );
    }

    #[test]
    fn test_rls_adds_support_files() {
        let ctx = context_from_toml(
            r#"
[export.rls]
enabled = true
"#,
        );
        let models = JavaModelGenerator.generate(&sample_tables(), &ctx).unwrap();
        assert!(paths(&models).contains(&"models/SessionInfo.java"));
        assert!(paths(&models).contains(&"models/RlsAware.java"));

        let repos = JavaRepoGenerator.generate(&sample_tables(), &ctx).unwrap();
        assert_eq!(
            paths(&repos),
            [
                "repository/OptimisticLockingFailureException.java",
                "repository/DatabaseExecutionContext.java",
                "repository/BaseRepository.java",
                "repository/UsersRepository.java",
                "repository/DepartmentsRepository.java",
            ]
        );
    }

    #[test]
    fn test_per_table_generators() {
        let tables = sample_tables();
        let ctx = default_context();
        assert_eq!(
            paths(&JavaServiceGenerator.generate(&tables, &ctx).unwrap()),
            ["services/UsersService.java", "services/DepartmentsService.java"]
        );
        assert_eq!(
            paths(&JavaControllerGenerator.generate(&tables, &ctx).unwrap()),
            [
                "controllers/api/UsersController.java",
                "controllers/api/DepartmentsController.java"
            ]
        );
    }
}
