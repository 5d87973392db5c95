//! Conversion of flat table-definition rows into [`Table`]s.

use std::path::Path;

use indexmap::IndexMap;
use miette::SourceSpan;
use tracing::debug;

use crate::{
    Column, Delimiter, Error, IndexMember, Result, RowError, SourceContext, Table,
    delimited::{self, RawRow},
    model::{INDEX_SLOTS, index_key},
};

/// Header names of delimited input, in their conventional order.
pub const HEADER: [&str; 17] = [
    "TableNo",
    "TableName",
    "TableName_JP",
    "ColNo",
    "ColName",
    "ColName_JP",
    "PK/FK",
    "Type",
    "Length",
    "Constraint",
    "Default",
    "Description",
    "Idx1",
    "Idx2",
    "Idx3",
    "Idx4",
    "Idx5",
];

const REQUIRED_HEADER: [&str; 2] = ["TableName", "ColName"];

/// Input format of a table-definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Delimited(Delimiter),
    Json,
}

impl SchemaFormat {
    /// Guess the format from a file extension (`.json`, `.csv`, else tab).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SchemaFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => {
                SchemaFormat::Delimited(Delimiter::Comma)
            }
            _ => SchemaFormat::Delimited(Delimiter::Tab),
        }
    }
}

/// One flat table-definition record, keyed like the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// 1-based row number, used in error reports
    pub row: usize,
    /// Location of the row in its source, if any
    pub span: Option<SourceSpan>,
    pub table_no: String,
    pub table_name: String,
    pub table_name_jp: String,
    pub col_no: String,
    pub col_name: String,
    pub col_name_jp: String,
    pub pkfk: String,
    pub ty: String,
    pub length: String,
    pub constraint: String,
    pub default: String,
    pub description: String,
    pub idx: [String; INDEX_SLOTS],
}

impl Record {
    fn into_column(self) -> Column {
        let [idx1, idx2, idx3, idx4, idx5] = self.idx;
        Column {
            col_no: self.col_no,
            col_name: self.col_name,
            col_name_jp: self.col_name_jp,
            pkfk: self.pkfk,
            ty: self.ty,
            length: self.length,
            constraint: self.constraint,
            default: self.default,
            description: self.description,
            idx1,
            idx2,
            idx3,
            idx4,
            idx5,
        }
    }
}

/// Group records into tables.
///
/// Tables appear in first-seen order and columns in record order. Records
/// without a table name are skipped. Index groups are sorted ascending by
/// ordinal. Every invalid ordinal is reported; no tables are returned then.
pub fn build_tables(
    records: impl IntoIterator<Item = Record>,
) -> std::result::Result<Vec<Table>, Vec<RowError>> {
    let mut tables: IndexMap<String, Table> = IndexMap::new();
    let mut errors = Vec::new();

    for record in records {
        let table_name = record.table_name.trim().to_string();
        if table_name.is_empty() {
            debug!(row = record.row, "skipping row without a table name");
            continue;
        }

        let table = tables.entry(table_name.clone()).or_insert_with(|| Table {
            table_no: record.table_no.clone(),
            table_name,
            table_name_jp: record.table_name_jp.clone(),
            description: record.description.clone(),
            columns: Vec::new(),
            indexes: IndexMap::new(),
        });

        for (i, raw) in record.idx.iter().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let slot = index_key(i + 1);
            match raw.parse::<i64>() {
                Ok(order) => table
                    .indexes
                    .entry(slot)
                    .or_default()
                    .push(IndexMember::new(order, record.col_name.clone())),
                Err(_) => errors.push(RowError::InvalidIndexOrdinal {
                    row: record.row,
                    slot,
                    value: raw.to_string(),
                    span: record.span.unwrap_or_else(|| (0, 0).into()),
                }),
            }
        }

        table.columns.push(record.into_column());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut tables: Vec<Table> = tables.into_values().collect();
    for table in &mut tables {
        table.sort_indexes();
    }
    debug!(count = tables.len(), "built tables");
    Ok(tables)
}

/// Column positions of the known header names.
struct HeaderMap {
    positions: [Option<usize>; HEADER.len()],
    width: usize,
}

impl HeaderMap {
    fn new(header: &RawRow) -> Self {
        let mut positions = [None; HEADER.len()];
        for (pos, name) in header.fields.iter().enumerate() {
            if let Some(i) = HEADER.iter().position(|h| *h == name.trim()) {
                positions[i].get_or_insert(pos);
            }
        }
        Self {
            positions,
            width: header.fields.len(),
        }
    }

    fn missing(&self) -> Option<&'static str> {
        REQUIRED_HEADER.into_iter().find(|name| {
            HEADER
                .iter()
                .position(|h| h == name)
                .is_some_and(|i| self.positions[i].is_none())
        })
    }

    fn get(&self, fields: &[String], name: &str) -> String {
        HEADER
            .iter()
            .position(|h| *h == name)
            .and_then(|i| self.positions[i])
            .and_then(|pos| fields.get(pos))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn record(&self, row: &RawRow) -> Record {
        let f = &row.fields;
        Record {
            row: row.row,
            span: Some(row.span),
            table_no: self.get(f, "TableNo"),
            table_name: self.get(f, "TableName"),
            table_name_jp: self.get(f, "TableName_JP"),
            col_no: self.get(f, "ColNo"),
            col_name: self.get(f, "ColName"),
            col_name_jp: self.get(f, "ColName_JP"),
            pkfk: self.get(f, "PK/FK"),
            ty: self.get(f, "Type"),
            length: self.get(f, "Length"),
            constraint: self.get(f, "Constraint"),
            default: self.get(f, "Default"),
            description: self.get(f, "Description"),
            idx: std::array::from_fn(|i| self.get(f, &index_key(i + 1))),
        }
    }
}

/// Parse delimited text (uses "schema.tsv" as filename in diagnostics)
pub fn parse_str(content: &str, delimiter: Delimiter) -> Result<Vec<Table>> {
    parse_str_with_filename(content, "schema.tsv", delimiter)
}

/// Parse delimited text with a custom filename for error reporting
pub fn parse_str_with_filename(
    content: &str,
    filename: &str,
    delimiter: Delimiter,
) -> Result<Vec<Table>> {
    let ctx = SourceContext::new(content, filename);
    let (rows, mut errors) = delimited::tokenize(content, delimiter);

    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return if errors.is_empty() {
            Ok(Vec::new())
        } else {
            Err(ctx.delimited_error(errors))
        };
    };

    let header = HeaderMap::new(&header_row);
    if let Some(column) = header.missing() {
        return Err(ctx.missing_header_error(column, Some(header_row.span)));
    }

    let mut records = Vec::new();
    for row in rows {
        let found = row.fields.len();
        if found < header.width {
            errors.push(RowError::TooFewFields {
                row: row.row,
                expected: header.width,
                found,
                span: row.span,
            });
        } else if found > header.width {
            errors.push(RowError::TooManyFields {
                row: row.row,
                expected: header.width,
                found,
                span: row.span,
            });
        } else {
            records.push(header.record(&row));
        }
    }

    match build_tables(records) {
        Ok(tables) if errors.is_empty() => Ok(tables),
        Ok(_) => Err(ctx.delimited_error(sorted(errors))),
        Err(more) => {
            errors.extend(more);
            Err(ctx.delimited_error(sorted(errors)))
        }
    }
}

fn sorted(mut errors: Vec<RowError>) -> Vec<RowError> {
    errors.sort_by_key(RowError::row);
    errors
}

/// Parse a JSON array of tables (uses "schema.json" as filename in diagnostics)
pub fn parse_json_str(content: &str) -> Result<Vec<Table>> {
    parse_json_str_with_filename(content, "schema.json")
}

/// Parse a JSON array of tables with a custom filename for error reporting
///
/// Tables without `indexes` get them rebuilt from the columns' index slots.
pub fn parse_json_str_with_filename(content: &str, filename: &str) -> Result<Vec<Table>> {
    let ctx = SourceContext::new(content, filename);
    let mut tables: Vec<Table> =
        serde_json::from_str(content).map_err(|e| ctx.json_error(e))?;

    for table in &mut tables {
        if table.indexes.is_empty() {
            table.rebuild_indexes();
        } else {
            table.sort_indexes();
        }
    }
    Ok(tables)
}

/// Parse a table-definition file, guessing the format from its extension
/// unless one is given.
pub fn parse_file(path: impl AsRef<Path>, format: Option<SchemaFormat>) -> Result<Vec<Table>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();

    match format.unwrap_or_else(|| SchemaFormat::from_path(path)) {
        SchemaFormat::Json => parse_json_str_with_filename(&content, &filename),
        SchemaFormat::Delimited(delimiter) => {
            parse_str_with_filename(&content, &filename, delimiter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsv(rows: &[&str]) -> String {
        let mut out = HEADER.join("\t");
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    fn row(table: &str, col: &str, idx: [&str; 5]) -> String {
        format!(
            "1\t{table}\t{table}JP\t1\t{col}\t{col}JP\t\tvarchar\t10\tNN\t\tdesc {col}\t{}",
            idx.join("\t")
        )
    }

    #[test]
    fn test_groups_rows_by_table_first_seen() {
        let src = tsv(&[
            &row("users", "id", ["", "", "", "", ""]),
            &row("depts", "id", ["", "", "", "", ""]),
            &row("users", "name", ["", "", "", "", ""]),
        ]);
        let tables = parse_str(&src, Delimiter::Tab).unwrap();

        let names: Vec<_> = tables.iter().map(|t| t.table_name.as_str()).collect();
        assert_eq!(names, ["users", "depts"]);
        let cols: Vec<_> = tables[0].columns.iter().map(|c| c.col_name.as_str()).collect();
        assert_eq!(cols, ["id", "name"]);
        assert_eq!(tables[0].table_name_jp, "usersJP");
        assert_eq!(tables[0].description, "desc id");
    }

    #[test]
    fn test_index_groups_sorted_by_ordinal() {
        let src = tsv(&[
            &row("users", "a", ["2", "", "", "", ""]),
            &row("users", "b", ["1", "", "1", "", ""]),
            &row("users", "c", ["3", "", "", "", ""]),
        ]);
        let tables = parse_str(&src, Delimiter::Tab).unwrap();
        let idx1: Vec<_> = tables[0].indexes["Idx1"]
            .iter()
            .map(|m| (m.order, m.col_name.as_str()))
            .collect();
        assert_eq!(idx1, [(1, "b"), (2, "a"), (3, "c")]);
        assert_eq!(tables[0].indexes["Idx3"].len(), 1);
        assert!(!tables[0].indexes.contains_key("Idx2"));
    }

    #[test]
    fn test_row_without_table_name_skipped() {
        let src = tsv(&[
            &row("", "orphan", ["", "", "", "", ""]),
            &row("users", "id", ["", "", "", "", ""]),
        ]);
        let tables = parse_str(&src, Delimiter::Tab).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].columns.len(), 1);
    }

    #[test]
    fn test_field_count_errors_collected() {
        let src = tsv(&["users\tid", &row("users", "id", ["", "", "", "", ""]), "a\tb"]);
        let err = parse_str(&src, Delimiter::Tab).unwrap_err();
        let rows: Vec<_> = err.row_errors().iter().map(RowError::row).collect();
        assert_eq!(rows, [2, 4]);
        assert!(matches!(
            err.row_errors()[0],
            RowError::TooFewFields {
                expected: 17,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_too_many_fields() {
        let src = tsv(&[&format!("{}\textra", row("users", "id", ["", "", "", "", ""]))]);
        let err = parse_str(&src, Delimiter::Tab).unwrap_err();
        assert!(matches!(
            err.row_errors()[0],
            RowError::TooManyFields {
                row: 2,
                found: 18,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_index_ordinal() {
        let src = tsv(&[&row("users", "id", ["", "first", "", "", ""])]);
        let err = parse_str(&src, Delimiter::Tab).unwrap_err();
        match &err.row_errors()[0] {
            RowError::InvalidIndexOrdinal { slot, value, .. } => {
                assert_eq!(slot, "Idx2");
                assert_eq!(value, "first");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_header_column() {
        let err = parse_str("TableNo\tColName\n1\tid", Delimiter::Tab).unwrap_err();
        assert!(matches!(*err, Error::MissingHeader { ref column, .. } if column == "TableName"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("", Delimiter::Tab).unwrap().is_empty());
        assert!(parse_str(&tsv(&[]), Delimiter::Tab).unwrap().is_empty());
    }

    #[test]
    fn test_comma_with_reordered_header() {
        let src = "ColName,TableName,Type\nid,users,bigint\n\"na,me\",users,text\n";
        let tables = parse_str(src, Delimiter::Comma).unwrap();
        assert_eq!(tables[0].columns[1].col_name, "na,me");
        assert_eq!(tables[0].columns[0].ty, "bigint");
    }

    #[test]
    fn test_json_rebuilds_indexes() {
        let json = r#"[{
            "tableName": "users",
            "tableNameJP": "Users",
            "columns": [
                {"colName": "a", "type": "text", "idx1": "2"},
                {"colName": "b", "type": "text", "idx1": "1"}
            ]
        }]"#;
        let tables = parse_json_str(json).unwrap();
        let idx1: Vec<_> = tables[0].indexes["Idx1"]
            .iter()
            .map(|m| m.col_name.as_str())
            .collect();
        assert_eq!(idx1, ["b", "a"]);
    }

    #[test]
    fn test_json_error_has_span() {
        let err = parse_json_str("[{\"tableName\": }]").unwrap_err();
        assert!(matches!(*err, Error::Json { span: Some(_), .. }));
    }

    #[test]
    fn test_schema_format_from_path() {
        assert_eq!(SchemaFormat::from_path(Path::new("a.json")), SchemaFormat::Json);
        assert_eq!(
            SchemaFormat::from_path(Path::new("a.CSV")),
            SchemaFormat::Delimited(Delimiter::Comma)
        );
        assert_eq!(
            SchemaFormat::from_path(Path::new("a.tsv")),
            SchemaFormat::Delimited(Delimiter::Tab)
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let src = tsv(&[
            &row("users", "a", ["2", "1", "", "", ""]),
            &row("users", "b", ["1", "", "", "", ""]),
        ]);
        assert_eq!(
            parse_str(&src, Delimiter::Tab).unwrap(),
            parse_str(&src, Delimiter::Tab).unwrap()
        );
    }
}
