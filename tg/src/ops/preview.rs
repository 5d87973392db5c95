//! Preview operation - table definitions as aligned text.

use tablegen_schema::{Column, Config, Table};
use tracing::warn;

use crate::reports::{PreviewReport, PreviewTable};

/// Column fields `preview.defaultVisibleColumns` may name.
const FIELDS: [&str; 14] = [
    "colNo",
    "colNameJP",
    "colName",
    "pkfk",
    "type",
    "length",
    "constraint",
    "default",
    "description",
    "idx1",
    "idx2",
    "idx3",
    "idx4",
    "idx5",
];

fn field<'a>(col: &'a Column, name: &str) -> &'a str {
    match name {
        "colNo" => &col.col_no,
        "colNameJP" => &col.col_name_jp,
        "colName" => &col.col_name,
        "pkfk" => &col.pkfk,
        "type" => &col.ty,
        "length" => &col.length,
        "constraint" => &col.constraint,
        "default" => &col.default,
        "description" => &col.description,
        "idx1" => &col.idx1,
        "idx2" => &col.idx2,
        "idx3" => &col.idx3,
        "idx4" => &col.idx4,
        "idx5" => &col.idx5,
        _ => "",
    }
}

/// Column names present in every table, except `id`. Empty for a single
/// table.
fn shared_columns(tables: &[Table]) -> Vec<String> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return Vec::new();
    }
    first
        .columns
        .iter()
        .map(|c| c.col_name.as_str())
        .filter(|name| *name != "id" && rest.iter().all(|t| t.has_column(name)))
        .map(str::to_string)
        .collect()
}

/// Execute the preview operation.
///
/// `filter` keeps tables whose physical or logical name contains it,
/// ignoring case.
pub fn preview(
    tables: &[Table],
    config: &Config,
    all_columns: bool,
    filter: Option<&str>,
) -> PreviewReport {
    let mut fields = Vec::new();
    for name in &config.preview.default_visible_columns {
        if FIELDS.contains(&name.as_str()) {
            fields.push(name.clone());
        } else {
            warn!(field = %name, "unknown preview column field, ignored");
        }
    }
    if fields.is_empty() {
        fields = FIELDS[..9].iter().map(|f| f.to_string()).collect();
    }

    let hidden = if all_columns {
        Vec::new()
    } else {
        shared_columns(tables)
    };

    let needle = filter.map(str::to_lowercase);
    let tables = tables
        .iter()
        .filter(|t| {
            needle.as_deref().is_none_or(|n| {
                t.table_name.to_lowercase().contains(n) || t.table_name_jp.to_lowercase().contains(n)
            })
        })
        .map(|table| PreviewTable {
            title: if table.table_name_jp.is_empty() {
                table.table_name.clone()
            } else {
                format!("{} ({})", table.table_name_jp, table.table_name)
            },
            rows: table
                .columns
                .iter()
                .filter(|c| !hidden.contains(&c.col_name))
                .map(|c| fields.iter().map(|f| field(c, f).to_string()).collect())
                .collect(),
        })
        .collect();

    PreviewReport {
        fields,
        tables,
        hidden,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_codegen::testing::sample_tables;

    use super::*;

    #[test]
    fn test_hides_shared_columns() {
        let report = preview(&sample_tables(), &Config::default(), false, None);

        assert_eq!(report.hidden, ["created_at"]);
        assert_eq!(
            report.fields,
            ["colNameJP", "colName", "pkfk", "type", "length", "constraint"]
        );
        let departments = &report.tables[1];
        assert_eq!(departments.title, "部署 (departments)");
        assert_eq!(departments.rows.len(), 4);
        assert_eq!(departments.rows[1], ["部署コード", "code", "AK", "char", "10", "NN, U"]);
    }

    #[test]
    fn test_all_columns_and_filter() {
        let report = preview(&sample_tables(), &Config::default(), true, Some("USER"));

        assert!(report.hidden.is_empty());
        assert_eq!(report.tables.len(), 1);
        assert_eq!(report.tables[0].rows.len(), 7);
    }

    #[test]
    fn test_single_table_hides_nothing() {
        let tables = sample_tables();
        assert!(shared_columns(&tables[..1]).is_empty());
    }
}
