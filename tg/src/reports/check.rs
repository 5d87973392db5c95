//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from parsing a table-definition file.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the table-definition file.
    pub schema_path: PathBuf,
    pub tables: Vec<TableSummary>,
    /// Questionable but accepted definitions.
    pub warnings: Vec<String>,
}

/// One parsed table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub name_jp: String,
    pub columns: usize,
    pub primary_key: Vec<String>,
    /// Index group names, e.g. `Idx1`.
    pub indexes: Vec<String>,
}

impl TableSummary {
    fn describe(&self) -> String {
        let mut text = self.name.clone();
        if !self.name_jp.is_empty() {
            text.push_str(&format!(" ({})", self.name_jp));
        }
        text.push_str(&format!(
            ": {} column{}",
            self.columns,
            if self.columns == 1 { "" } else { "s" }
        ));
        if !self.primary_key.is_empty() {
            text.push_str(&format!(", PK ({})", self.primary_key.join(", ")));
        }
        if !self.indexes.is_empty() {
            text.push_str(&format!(", indexes {}", self.indexes.join(" ")));
        }
        text
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }
        if !self.warnings.is_empty() {
            out.newline();
        }

        out.preformatted(&format!("✓ {} is valid", self.schema_path.display()));
        out.newline();

        let count = self.tables.len();
        out.section(&format!("{} table{}", count, if count == 1 { "" } else { "s" }));
        for table in &self.tables {
            out.list_item(&table.describe());
        }
    }
}
