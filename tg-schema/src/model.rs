//! Table and column definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tablegen_core::SqlType;

/// Number of index slots (`Idx1`..`Idx5`) a column can carry.
pub const INDEX_SLOTS: usize = 5;

/// A table definition.
///
/// Column order is the order in which rows were read. Tables are
/// identified by [`Table::table_name`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, deserialize_with = "lenient_string")]
    pub table_no: String,
    pub table_name: String,
    #[serde(rename = "tableNameJP", default, deserialize_with = "lenient_string")]
    pub table_name_jp: String,
    /// Description of the first row read for this table
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Index groups keyed `Idx1`..`Idx5`, members ascending by ordinal
    #[serde(default)]
    pub indexes: IndexMap<String, Vec<IndexMember>>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>, name_jp: impl Into<String>) -> Self {
        Self {
            table_name: name.into(),
            table_name_jp: name_jp.into(),
            ..Default::default()
        }
    }

    /// Builder-style column append, mostly useful in tests.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column by physical name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.col_name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns tagged `PK`, in column order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key())
    }

    /// Columns tagged `AK`, in column order.
    pub fn alternate_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_alternate_key())
    }

    /// Rebuild [`Table::indexes`] from the columns' index slots.
    ///
    /// Ordinals that do not parse are skipped.
    pub fn rebuild_indexes(&mut self) {
        let mut indexes: IndexMap<String, Vec<IndexMember>> = IndexMap::new();
        for column in &self.columns {
            for slot in 1..=INDEX_SLOTS {
                if let Some(Ok(order)) = column.index_ordinal(slot).map(str::parse::<i64>) {
                    indexes
                        .entry(index_key(slot))
                        .or_default()
                        .push(IndexMember::new(order, &column.col_name));
                }
            }
        }
        self.indexes = indexes;
        self.sort_indexes();
    }

    /// Sort every index group ascending by ordinal (stable).
    pub fn sort_indexes(&mut self) {
        for members in self.indexes.values_mut() {
            members.sort_by_key(|m| m.order);
        }
    }
}

/// Index group key for a 1-based slot (`Idx1`..`Idx5`).
pub fn index_key(slot: usize) -> String {
    format!("Idx{slot}")
}

/// One member of an index group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMember {
    pub order: i64,
    pub col_name: String,
}

impl IndexMember {
    pub fn new(order: i64, col_name: impl Into<String>) -> Self {
        Self {
            order,
            col_name: col_name.into(),
        }
    }
}

/// A column definition.
///
/// Every field keeps the raw text read from the input; the accessor
/// methods interpret it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    #[serde(deserialize_with = "lenient_string")]
    pub col_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub col_name: String,
    #[serde(rename = "colNameJP", deserialize_with = "lenient_string")]
    pub col_name_jp: String,
    /// Role tags, e.g. `PK`, `FK`, `AK`, `PK/FK`
    #[serde(deserialize_with = "lenient_string")]
    pub pkfk: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub ty: String,
    /// Raw length, may encode `precision,scale`
    #[serde(deserialize_with = "lenient_string")]
    pub length: String,
    /// Constraint tokens, e.g. `NN`, `U`
    #[serde(deserialize_with = "lenient_string")]
    pub constraint: String,
    #[serde(deserialize_with = "lenient_string")]
    pub default: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub idx1: String,
    #[serde(deserialize_with = "lenient_string")]
    pub idx2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub idx3: String,
    #[serde(deserialize_with = "lenient_string")]
    pub idx4: String,
    #[serde(deserialize_with = "lenient_string")]
    pub idx5: String,
}

impl Column {
    /// Create a column with a name, logical name and type.
    pub fn new(name: impl Into<String>, name_jp: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            col_name: name.into(),
            col_name_jp: name_jp.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    pub fn with_pkfk(mut self, pkfk: impl Into<String>) -> Self {
        self.pkfk = pkfk.into();
        self
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = length.into();
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Set the ordinal for a 1-based index slot. Out-of-range slots are ignored.
    pub fn with_index(mut self, slot: usize, ordinal: impl Into<String>) -> Self {
        let ordinal = ordinal.into();
        match slot {
            1 => self.idx1 = ordinal,
            2 => self.idx2 = ordinal,
            3 => self.idx3 = ordinal,
            4 => self.idx4 = ordinal,
            5 => self.idx5 = ordinal,
            _ => {}
        }
        self
    }

    /// Role tags, split on any non-alphanumeric character.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        tokens(&self.pkfk)
    }

    /// Whether the column carries a role tag (case-insensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_primary_key(&self) -> bool {
        self.has_role("PK")
    }

    pub fn is_foreign_key(&self) -> bool {
        self.has_role("FK")
    }

    pub fn is_alternate_key(&self) -> bool {
        self.has_role("AK")
    }

    /// Whether the constraint set contains a token (case-insensitive).
    pub fn has_constraint(&self, token: &str) -> bool {
        tokens(&self.constraint).any(|t| t.eq_ignore_ascii_case(token))
    }

    pub fn is_not_null(&self) -> bool {
        self.has_constraint("NN")
    }

    pub fn is_unique(&self) -> bool {
        self.has_constraint("U")
    }

    /// Trimmed length, `None` when blank.
    pub fn length(&self) -> Option<&str> {
        non_blank(&self.length)
    }

    /// Trimmed default expression, `None` when blank.
    pub fn default_value(&self) -> Option<&str> {
        non_blank(&self.default)
    }

    /// Lower-cased, trimmed source type name.
    pub fn type_name(&self) -> String {
        self.ty.trim().to_lowercase()
    }

    /// Classification of the source type.
    pub fn sql_type(&self) -> SqlType {
        SqlType::classify(&self.ty, self.length())
    }

    /// Raw ordinal for a 1-based index slot, `None` when blank.
    pub fn index_ordinal(&self, slot: usize) -> Option<&str> {
        let raw = match slot {
            1 => &self.idx1,
            2 => &self.idx2,
            3 => &self.idx3,
            4 => &self.idx4,
            5 => &self.idx5,
            _ => return None,
        };
        non_blank(raw)
    }
}

fn tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Accept strings, numbers, booleans and null where text is expected.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Null(()),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(s) => s,
        Lenient::Int(n) => n.to_string(),
        Lenient::Float(n) => n.to_string(),
        Lenient::Bool(b) => b.to_string(),
        Lenient::Null(()) => String::new(),
    })
}
