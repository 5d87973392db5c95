//! VS Code snippet files for table and column names.
//!
//! Eight `vscode/*.code-snippets` files are produced: table names and
//! column names, each as English, logical (JP), English to logical and
//! logical to English completions.

use std::collections::HashSet;

use eyre::Result;
use indexmap::IndexMap;
use serde::Serialize;
use tablegen_core::Artifact;
use tablegen_schema::Table;

use crate::{
    generation::Format,
    language::{GenerationContext, Generator},
};

/// One VS Code snippet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub prefix: String,
    pub body: Vec<String>,
    pub description: String,
}

impl Snippet {
    fn new(prefix: &str, body: &str, description: String) -> Self {
        Self {
            prefix: prefix.to_string(),
            body: vec![body.to_string()],
            description,
        }
    }
}

type SnippetFile = IndexMap<String, Snippet>;

/// Generator for the `vscode-snippets` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct VscodeSnippetsGenerator;

impl Generator for VscodeSnippetsGenerator {
    fn format(&self) -> Format {
        Format::VscodeSnippets
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        let files = [
            ("tables_en", table_en(tables)),
            ("tables_jp", table_jp(tables)),
            ("tables_en_to_jp", table_en_to_jp(tables)),
            ("tables_jp_to_en", table_jp_to_en(tables)),
            ("columns_en", column_en(tables)),
            ("columns_jp", column_jp(tables)),
            ("columns_en_to_jp", column_en_to_jp(tables)),
            ("columns_jp_to_en", column_jp_to_en(tables)),
        ];

        files
            .into_iter()
            .map(|(name, snippets)| -> Result<Artifact> {
                let content = serde_json::to_string_pretty(&snippets)?;
                Ok(Artifact::new(
                    format!("vscode/{name}.code-snippets"),
                    content,
                ))
            })
            .collect()
    }
}

fn table_en(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for name in tables.iter().map(|t| t.table_name.as_str()).filter(|n| !n.is_empty()) {
        out.insert(
            format!("Table: {name}"),
            Snippet::new(name, name, format!("Table English Name: {name}")),
        );
    }
    out
}

fn table_jp(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for jp in tables.iter().map(|t| t.table_name_jp.as_str()).filter(|n| !n.is_empty()) {
        out.entry(format!("TableJP: {jp}"))
            .or_insert_with(|| Snippet::new(jp, jp, format!("Table Japanese Name: {jp}")));
    }
    out
}

fn table_en_to_jp(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for table in tables.iter().filter(|t| !t.table_name.is_empty()) {
        let (name, jp) = (&table.table_name, &table.table_name_jp);
        out.insert(
            format!("Table EN->JP: {name}"),
            Snippet::new(name, jp, format!("Convert {name} to {jp}")),
        );
    }
    out
}

fn table_jp_to_en(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for table in tables.iter().filter(|t| !t.table_name_jp.is_empty()) {
        let (name, jp) = (&table.table_name, &table.table_name_jp);
        out.entry(format!("Table JP->EN: {jp}"))
            .or_insert_with(|| Snippet::new(jp, name, format!("Convert {jp} to {name}")));
    }
    out
}

fn column_en(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for col in tables.iter().flat_map(|t| &t.columns) {
        let name = col.col_name.as_str();
        if name.is_empty() {
            continue;
        }
        out.entry(format!("Column: {name}"))
            .or_insert_with(|| Snippet::new(name, name, format!("Column English Name: {name}")));
    }
    out
}

fn column_jp(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    for col in tables.iter().flat_map(|t| &t.columns) {
        let jp = col.col_name_jp.as_str();
        if jp.is_empty() {
            continue;
        }
        out.entry(format!("ColumnJP: {jp}"))
            .or_insert_with(|| Snippet::new(jp, jp, format!("Column Japanese Name: {jp}")));
    }
    out
}

fn column_en_to_jp(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    let mut seen = HashSet::new();
    for col in tables.iter().flat_map(|t| &t.columns) {
        let (name, jp) = (col.col_name.as_str(), col.col_name_jp.as_str());
        if name.is_empty() || !seen.insert((name, jp)) {
            continue;
        }
        out.insert(
            format!("Col EN->JP: {name} -> {jp}"),
            Snippet::new(name, jp, format!("Convert Column {name} to {jp}")),
        );
    }
    out
}

fn column_jp_to_en(tables: &[Table]) -> SnippetFile {
    let mut out = SnippetFile::new();
    let mut seen = HashSet::new();
    for col in tables.iter().flat_map(|t| &t.columns) {
        let (name, jp) = (col.col_name.as_str(), col.col_name_jp.as_str());
        if jp.is_empty() || !seen.insert((jp, name)) {
            continue;
        }
        out.insert(
            format!("Col JP->EN: {jp} -> {name}"),
            Snippet::new(jp, name, format!("Convert Column {jp} to {name}")),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_schema::Column;

    use super::*;

    fn tables() -> Vec<Table> {
        vec![
            Table::new("users", "ユーザー")
                .with_column(Column::new("id", "ID", "bigserial"))
                .with_column(Column::new("name", "名前", "varchar")),
            Table::new("posts", "投稿")
                .with_column(Column::new("id", "ID", "bigserial"))
                .with_column(Column::new("user_id", "ユーザーID", "bigint")),
        ]
    }

    fn generate() -> Vec<Artifact> {
        VscodeSnippetsGenerator
            .generate(&tables(), &GenerationContext::default())
            .unwrap()
    }

    #[test]
    fn test_eight_files() {
        let artifacts = generate();
        assert_eq!(artifacts.len(), 8);
        assert_eq!(artifacts[0].path, "vscode/tables_en.code-snippets");
        assert_eq!(artifacts[7].path, "vscode/columns_jp_to_en.code-snippets");
    }

    #[test]
    fn test_columns_deduplicated() {
        let artifacts = generate();
        let columns: serde_json::Value = serde_json::from_str(&artifacts[4].content).unwrap();
        let keys: Vec<_> = columns.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"Column: id".to_string()));
    }

    #[test]
    fn test_table_en_to_jp_content() {
        let artifacts = generate();
        let expected = r#"{
  "Table EN->JP: users": {
    "prefix": "users",
    "body": [
      "ユーザー"
    ],
    "description": "Convert users to ユーザー"
  },
  "Table EN->JP: posts": {
    "prefix": "posts",
    "body": [
      "投稿"
    ],
    "description": "Convert posts to 投稿"
  }
}"#;
        assert_eq!(artifacts[2].content, expected);
    }

    #[test]
    fn test_empty_tables() {
        let artifacts = VscodeSnippetsGenerator
            .generate(&[], &GenerationContext::default())
            .unwrap();
        assert!(artifacts.iter().all(|a| a.content == "{}"));
    }
}
