//! Test utilities for generators.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use tablegen_schema::{Config, Table, parse_json_str};

use crate::language::GenerationContext;

/// Two related tables: `users` (with an `AK` user name and an `FK` to
/// departments) and `departments`.
pub const SAMPLE_SCHEMA: &str = r#"[
  {
    "tableName": "users",
    "tableNameJP": "ユーザー",
    "columns": [
      { "colName": "id", "colNameJP": "ID", "pkfk": "PK", "type": "bigserial", "constraint": "NN", "idx1": "1" },
      { "colName": "user_name", "colNameJP": "ユーザー名", "pkfk": "AK", "type": "varchar", "length": "255", "constraint": "NN, U", "idx2": "1" },
      { "colName": "email", "colNameJP": "メールアドレス", "type": "varchar", "length": "255", "constraint": "NN, U", "idx3": "1" },
      { "colName": "note", "colNameJP": "備考", "type": "text", "constraint": "NN" },
      { "colName": "is_active", "colNameJP": "有効フラグ", "type": "boolean", "constraint": "NN", "default": "true" },
      { "colName": "department_id", "colNameJP": "部署ID", "pkfk": "FK", "type": "bigint", "constraint": "NN", "idx4": "1" },
      { "colName": "created_at", "colNameJP": "作成日時", "type": "timestamp", "constraint": "NN", "default": "now()" }
    ]
  },
  {
    "tableName": "departments",
    "tableNameJP": "部署",
    "columns": [
      { "colName": "id", "colNameJP": "ID", "pkfk": "PK", "type": "bigserial", "constraint": "NN", "idx1": "1" },
      { "colName": "code", "colNameJP": "部署コード", "pkfk": "AK", "type": "char", "length": "10", "constraint": "NN, U", "idx2": "1" },
      { "colName": "name", "colNameJP": "部署名", "type": "varchar", "length": "255", "constraint": "NN" },
      { "colName": "budget", "colNameJP": "予算", "type": "numeric", "length": "12,2" },
      { "colName": "created_at", "colNameJP": "作成日時", "type": "timestamp", "constraint": "NN", "default": "now()" }
    ]
  }
]"#;

/// Parse [`SAMPLE_SCHEMA`].
///
/// # Panics
///
/// Panics if the sample does not parse, which would be a bug in this module.
pub fn sample_tables() -> Vec<Table> {
    parse_json_str(SAMPLE_SCHEMA).expect("sample schema parses")
}

/// Default generation context.
pub fn default_context() -> GenerationContext {
    GenerationContext::default()
}

/// Generation context built from TOML config text.
///
/// # Panics
///
/// Panics if the config does not parse.
pub fn context_from_toml(toml: &str) -> GenerationContext {
    let config = Config::from_str_with_filename(toml, "test.toml").expect("test config parses");
    GenerationContext::from_config(&config)
}
