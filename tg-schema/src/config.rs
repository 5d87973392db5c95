//! Generator configuration (`tablegen.toml`).
//!
//! Every key is optional; missing keys take the documented defaults.

use std::{fmt, path::Path};

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use tablegen_core::{java_string_literal, sql_string_literal};

use crate::{Error, Result, SourceContext};

/// Default config file name
pub const CONFIG_FILE: &str = "tablegen.toml";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub preview: PreviewConfig,
    pub export: ExportConfig,
    pub sql: SqlConfig,
    pub common_columns: CommonColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    /// Column fields shown by `tg preview`
    pub default_visible_columns: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            default_visible_columns: ["colNameJP", "colName", "pkfk", "type", "length", "constraint"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Formats generated when none are given on the command line
    pub default_formats: Vec<String>,
    pub rls: RlsConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_formats: [
                "ddl",
                "ddl-play",
                "typescript",
                "zod-schema",
                "zod-type",
                "java-model",
                "java-repo",
                "java-service",
                "java-controller",
            ]
            .map(String::from)
            .to_vec(),
            rls: RlsConfig::default(),
        }
    }
}

/// Row-level security (per-tenant scoping) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RlsConfig {
    pub enabled: bool,
    pub tenant_id_column: String,
    pub admin_flag_column: String,
}

impl Default for RlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tenant_id_column: "tenant_id".to_string(),
            admin_flag_column: "is_admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqlConfig {
    /// Generate `countAll`/`count` repository methods
    pub include_count_method: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            include_count_method: true,
        }
    }
}

/// Physical names of the columns every table shares.
///
/// Blank names fall back to the defaults when the config is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonColumns {
    pub id: String,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
    pub is_deleted: DeleteFlag,
}

impl Default for CommonColumns {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            created_at: "created_at".to_string(),
            created_by: "created_by".to_string(),
            updated_at: "updated_at".to_string(),
            updated_by: "updated_by".to_string(),
            is_deleted: DeleteFlag::default(),
        }
    }
}

impl CommonColumns {
    /// Replace blank names with their defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        for (value, default) in [
            (&mut self.id, defaults.id),
            (&mut self.created_at, defaults.created_at),
            (&mut self.created_by, defaults.created_by),
            (&mut self.updated_at, defaults.updated_at),
            (&mut self.updated_by, defaults.updated_by),
            (&mut self.is_deleted.name, defaults.is_deleted.name),
        ] {
            if value.trim().is_empty() {
                *value = default;
            }
        }
        self
    }

    /// All shared column names: id, audit columns, soft-delete flag.
    pub fn names(&self) -> [&str; 6] {
        [
            &self.id,
            &self.is_deleted.name,
            &self.created_at,
            &self.created_by,
            &self.updated_at,
            &self.updated_by,
        ]
    }

    /// Whether `column` is one of the shared columns.
    pub fn is_common(&self, column: &str) -> bool {
        self.names().contains(&column)
    }
}

/// Soft-delete flag column and its encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteFlag {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagKind,
    #[serde(rename = "valTrue")]
    pub val_true: FlagValue,
    #[serde(rename = "valFalse")]
    pub val_false: FlagValue,
}

impl Default for DeleteFlag {
    fn default() -> Self {
        Self {
            name: "is_deleted".to_string(),
            kind: FlagKind::Boolean,
            val_true: FlagValue::Bool(true),
            val_false: FlagValue::Bool(false),
        }
    }
}

impl DeleteFlag {
    /// SQL literal for the flag value, quoted and escaped for the string
    /// encoding.
    pub fn sql_literal(&self, deleted: bool) -> String {
        match self.kind {
            FlagKind::Boolean => deleted.to_string(),
            FlagKind::String => sql_string_literal(&self.value(deleted).to_string()),
        }
    }

    /// Java literal for the flag value.
    pub fn java_literal(&self, deleted: bool) -> String {
        match self.kind {
            FlagKind::Boolean => deleted.to_string(),
            FlagKind::String => java_string_literal(&self.value(deleted).to_string()),
        }
    }

    /// Java type of the flag field.
    pub fn java_type(&self) -> &'static str {
        match self.kind {
            FlagKind::Boolean => "Boolean",
            FlagKind::String => "String",
        }
    }

    fn value(&self, deleted: bool) -> &FlagValue {
        if deleted { &self.val_true } else { &self.val_false }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    #[default]
    Boolean,
    String,
}

/// A flag value as written in the config: `true` or `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Config {
    /// Parse a config file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Load `path` if it exists, otherwise return the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config text with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let config: Config = toml::from_str(content).map_err(|e| ctx.config_error(e))?;
        let config = Config {
            common_columns: config.common_columns.normalized(),
            ..config
        };
        config.validate(&ctx)?;
        Ok(config)
    }

    fn validate(&self, ctx: &SourceContext) -> Result<()> {
        let flag = &self.common_columns.is_deleted;
        if flag.kind == FlagKind::String && flag.val_true == flag.val_false {
            return Err(ctx.validation_error(
                "soft-delete flag values must differ",
                find_key_span(ctx.src(), "valFalse"),
            ));
        }

        let rls = &self.export.rls;
        if rls.enabled && rls.tenant_id_column.trim().is_empty() {
            return Err(ctx.validation_error(
                "tenantIdColumn is required when RLS is enabled",
                find_key_span(ctx.src(), "tenantIdColumn"),
            ));
        }
        Ok(())
    }

    /// Render as TOML, as written by `tg init`
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Find the span of a key in TOML source, e.g. `valFalse =`.
fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    src.match_indices(key)
        .find(|(pos, _)| {
            let before_ok = src[..*pos]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c == '{' || c == ',' || c == '.');
            let after = src[pos + key.len()..].trim_start();
            before_ok && after.starts_with('=')
        })
        .map(|(pos, _)| SourceSpan::from((pos, key.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str_with_filename("", CONFIG_FILE).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.sql.include_count_method);
        assert!(!config.export.rls.enabled);
        assert_eq!(config.export.rls.tenant_id_column, "tenant_id");
        assert_eq!(config.export.default_formats.len(), 9);
        assert_eq!(config.common_columns.is_deleted.sql_literal(false), "false");
    }

    #[test]
    fn test_common_columns_override() {
        let src = r#"
[commonColumns]
id = "record_id"
created_at = ""

[commonColumns.is_deleted]
name = "is_removed"
type = "string"
valTrue = "1"
valFalse = "0"
"#;
        let config = Config::from_str_with_filename(src, CONFIG_FILE).unwrap();
        let common = &config.common_columns;
        assert_eq!(common.id, "record_id");
        assert_eq!(common.created_at, "created_at");
        assert!(common.is_common("is_removed"));
        assert!(!common.is_common("is_deleted"));

        let flag = &common.is_deleted;
        assert_eq!(flag.sql_literal(false), "'0'");
        assert_eq!(flag.java_literal(true), "\"1\"");
        assert_eq!(flag.java_type(), "String");
    }

    #[test]
    fn test_flag_literals_are_escaped() {
        let flag = DeleteFlag {
            name: "state".into(),
            kind: FlagKind::String,
            val_true: FlagValue::Text("it's gone".into()),
            val_false: FlagValue::Text(r#"say "live""#.into()),
        };
        assert_eq!(flag.sql_literal(true), "'it''s gone'");
        assert_eq!(flag.sql_literal(false), r#"'say "live"'"#);
        assert_eq!(flag.java_literal(true), r#""it's gone""#);
        assert_eq!(flag.java_literal(false), r#""say \"live\"""#);
    }

    #[test]
    fn test_partial_sections() {
        let src = "[export.rls]\nenabled = true\n\n[sql]\nincludeCountMethod = false\n";
        let config = Config::from_str_with_filename(src, CONFIG_FILE).unwrap();
        assert!(config.export.rls.enabled);
        assert_eq!(config.export.rls.admin_flag_column, "is_admin");
        assert!(!config.sql.include_count_method);
        assert_eq!(config.preview, PreviewConfig::default());
    }

    #[test]
    fn test_parse_error_has_span() {
        let err = Config::from_str_with_filename("[sql]\nincludeCountMethod = \"yes\"\n", CONFIG_FILE)
            .unwrap_err();
        assert!(matches!(*err, Error::Config { span: Some(_), .. }));
    }

    #[test]
    fn test_identical_flag_values_rejected() {
        let src = "[commonColumns.is_deleted]\ntype = \"string\"\nvalTrue = \"x\"\nvalFalse = \"x\"\n";
        let err = Config::from_str_with_filename(src, CONFIG_FILE).unwrap_err();
        match *err {
            Error::Validation { span, message, .. } => {
                assert_eq!(message, "soft-delete flag values must differ");
                assert_eq!(span, Some(SourceSpan::from((src.find("valFalse").unwrap(), 8))));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = Config::default().to_toml_string().unwrap();
        assert!(text.contains("includeCountMethod = true"));
        let parsed = Config::from_str_with_filename(&text, CONFIG_FILE).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_find_key_span_skips_prefixes() {
        let src = "xvalFalse = 1\nvalFalse = 2\n";
        assert_eq!(find_key_span(src, "valFalse"), Some(SourceSpan::from((14, 8))));
    }
}
