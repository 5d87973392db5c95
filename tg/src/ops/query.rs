//! Query operation - SQL and query code from a query script.

use eyre::{Context, Result};
use tablegen_codegen::generation::FileRegistry;
use tablegen_core::Artifact;
use tablegen_query::{QueryPlan, QueryScript, ResultKind};
use tablegen_schema::{Config, Table};
use tracing::info;

use super::generate::{OutputOptions, finish};
use crate::reports::GenerateReport;

/// Execute the query operation.
///
/// Replays the script through the query engine, then emits the statement
/// and the TypeScript and Java query artifacts.
pub fn query(
    tables: &[Table],
    config: &Config,
    script: &QueryScript,
    opts: OutputOptions,
) -> Result<GenerateReport> {
    let state = script
        .apply(tables, &config.common_columns)
        .wrap_err("Failed to build the query")?;
    let plan = QueryPlan::build(&state, tables).wrap_err("Failed to plan the query")?;
    info!(base = %plan.base_name, kind = ?plan.kind, "planned query");

    let mut registry = FileRegistry::new();
    registry.register(Artifact::new(
        format!("sql/{}.sql", plan.base_name),
        plan.sql_file(),
    ));
    registry.register_all(tablegen_codegen_typescript::query_artifacts(&plan));
    registry.register_all(tablegen_codegen_java::query_artifacts(&plan));

    Ok(GenerateReport {
        subject: describe(&plan),
        formats: vec!["sql".into(), "typescript".into(), "java".into()],
        result: finish(registry, &opts)?,
    })
}

/// `UsersCustom: record result, parameters ids, name`
fn describe(plan: &QueryPlan) -> String {
    let kind = match plan.kind {
        ResultKind::Native => "native",
        ResultKind::Scalar => "scalar",
        ResultKind::Record => "record",
    };
    let params: Vec<&str> = plan.signature_parameters().map(|p| p.name.as_str()).collect();
    if params.is_empty() {
        format!("{}: {kind} result", plan.base_name)
    } else {
        format!("{}: {kind} result, parameters {}", plan.base_name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_codegen::testing::sample_tables;
    use tempfile::TempDir;

    use super::*;
    use crate::reports::GenerationResult;

    const SCRIPT: &str = r#"
filters = ["t0.id IN (:ids)", "cardinality(:idsSize) > 0"]
limit = ":limit"
select = "t0.user_name, t1.name"

[[tables]]
name = "users"

[[tables]]
name = "departments"
join = "left"
"#;

    #[test]
    fn test_query_artifacts_written() {
        let temp = TempDir::new().unwrap();
        let script: QueryScript = toml::from_str(SCRIPT).unwrap();
        let report = query(
            &sample_tables(),
            &Config::default(),
            &script,
            OutputOptions {
                output_dir: temp.path(),
                dry_run: false,
            },
        )
        .unwrap();

        assert_eq!(
            report.subject,
            "UsersCustom: record result, parameters ids, limit"
        );
        let GenerationResult::Written(written) = report.result else {
            panic!("expected written files");
        };
        assert_eq!(
            written.written,
            [
                "sql/UsersCustom.sql",
                "models/ts/UsersCustomDto.ts",
                "models/dto/UsersCustomDto.java",
                "repository/UsersCustomSqlRepository.java",
                "services/UsersCustomSqlService.java",
                "controllers/api/UsersCustomSqlController.java",
            ]
        );
        let sql = std::fs::read_to_string(temp.path().join("sql/UsersCustom.sql")).unwrap();
        assert!(sql.contains("LEFT JOIN departments AS t1 ON "));
        assert!(sql.ends_with("LIMIT :limit;\n"));
    }

    #[test]
    fn test_unknown_table() {
        let script: QueryScript = toml::from_str("[[tables]]\nname = \"orders\"\n").unwrap();
        let err = query(
            &sample_tables(),
            &Config::default(),
            &script,
            OutputOptions {
                output_dir: std::path::Path::new("."),
                dry_run: true,
            },
        )
        .unwrap_err();
        assert_eq!(format!("{:#}", err), "Failed to build the query: unknown table 'orders'");
    }
}
