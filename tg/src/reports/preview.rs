//! Preview command report data structures.

use super::output::{Output, Report};

/// Table definitions laid out for reading.
#[derive(Debug)]
pub struct PreviewReport {
    /// Column fields shown, e.g. `colName`.
    pub fields: Vec<String>,
    pub tables: Vec<PreviewTable>,
    /// Columns left out because every table has them.
    pub hidden: Vec<String>,
}

#[derive(Debug)]
pub struct PreviewTable {
    pub title: String,
    pub rows: Vec<Vec<String>>,
}

impl Report for PreviewReport {
    fn render(&self, out: &mut dyn Output) {
        let header: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            out.section(&table.title);
            out.table(&header, &table.rows);
        }

        if !self.hidden.is_empty() {
            out.newline();
            out.key_value(
                "Common columns hidden (--all-columns to show)",
                &self.hidden.join(", "),
            );
        }
    }
}
