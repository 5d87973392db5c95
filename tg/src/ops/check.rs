//! Check operation - summarize parsed table definitions.

use std::path::Path;

use tablegen_core::SqlType;
use tablegen_schema::Table;

use crate::reports::{CheckReport, TableSummary};

/// Execute the check operation.
///
/// Parsing already rejected malformed input; this collects the summary and
/// warns about definitions that generate poorly.
pub fn check(tables: &[Table], schema_path: &Path) -> CheckReport {
    let mut warnings = Vec::new();

    for (i, table) in tables.iter().enumerate() {
        if tables[..i].iter().any(|t| t.table_name == table.table_name) {
            warnings.push(format!("table '{}' is defined more than once", table.table_name));
        }
        if table.columns.is_empty() {
            warnings.push(format!("table '{}' has no columns", table.table_name));
            continue;
        }
        if !table.columns.iter().any(|c| c.is_primary_key()) {
            warnings.push(format!("table '{}' has no primary key", table.table_name));
        }
        for col in &table.columns {
            if col.sql_type() == SqlType::Other {
                warnings.push(format!(
                    "{}.{}: unknown type '{}' maps to a fallback type",
                    table.table_name, col.col_name, col.ty
                ));
            }
        }
    }

    CheckReport {
        schema_path: schema_path.to_path_buf(),
        tables: tables.iter().map(summarize).collect(),
        warnings,
    }
}

fn summarize(table: &Table) -> TableSummary {
    TableSummary {
        name: table.table_name.clone(),
        name_jp: table.table_name_jp.clone(),
        columns: table.columns.len(),
        primary_key: table
            .columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.col_name.clone())
            .collect(),
        indexes: table.indexes.keys().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_codegen::testing::sample_tables;
    use tablegen_schema::Column;

    use super::*;

    #[test]
    fn test_summary() {
        let report = check(&sample_tables(), Path::new("tables.json"));

        assert!(report.warnings.is_empty());
        assert_eq!(
            report.tables[0],
            TableSummary {
                name: "users".to_string(),
                name_jp: "ユーザー".to_string(),
                columns: 7,
                primary_key: vec!["id".to_string()],
                indexes: vec![
                    "Idx1".to_string(),
                    "Idx2".to_string(),
                    "Idx3".to_string(),
                    "Idx4".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_warnings() {
        let tables = vec![
            Table::new("logs", "").with_column(Column::new("payload", "", "jsonb")),
            Table::new("empty", ""),
        ];
        let report = check(&tables, Path::new("tables.tsv"));

        assert_eq!(
            report.warnings,
            [
                "table 'logs' has no primary key",
                "logs.payload: unknown type 'jsonb' maps to a fallback type",
                "table 'empty' has no columns",
            ]
        );
    }
}
