//! Query scripts: a declarative description of a query, replayed
//! through the [`QueryState`] operations.
//!
//! ```toml
//! filters = ["t0.is_active = :active", "t1.id IN (:ids)"]
//! limit = 20
//!
//! [[tables]]
//! name = "users"
//!
//! [[tables]]
//! name = "departments"
//! join = "left"
//!
//! [[sorts]]
//! alias = "t1"
//! direction = "desc"
//! ```
//!
//! Every table after the first is joined to the one before it. The join
//! type defaults to `inner`; `condition` replaces the inferred condition.

use serde::{Deserialize, Deserializer};
use tablegen_schema::{CommonColumns, Table};
use tracing::debug;

use crate::{
    error::QueryError,
    state::{JoinType, JoinUpdate, QueryState, SortDirection, SortUpdate, find_table},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryScript {
    pub tables: Vec<TableStep>,
    pub filters: Vec<String>,
    pub sorts: Vec<SortStep>,
    #[serde(deserialize_with = "text_or_number")]
    pub limit: String,
    #[serde(deserialize_with = "text_or_number")]
    pub offset: String,
    pub select: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableStep {
    pub name: String,
    #[serde(default)]
    pub join: JoinType,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortStep {
    /// Defaults to the first table.
    pub alias: Option<String>,
    /// Defaults to the first column of the sorted table.
    pub column: Option<String>,
    pub direction: SortDirection,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl QueryScript {
    /// Build a fresh [`QueryState`] by replaying the script.
    pub fn apply(&self, tables: &[Table], common: &CommonColumns) -> Result<QueryState, QueryError> {
        let mut state = QueryState::new();

        for (position, step) in self.tables.iter().enumerate() {
            if find_table(tables, &step.name).is_none() {
                return Err(QueryError::UnknownTable(step.name.clone()));
            }
            state.add_table(step.name.as_str());
            if position == 0 {
                continue;
            }
            state.add_join(tables, common)?;
            let index = state.joins.len() - 1;
            state.update_join(index, JoinUpdate::Type(step.join))?;
            if let Some(condition) = &step.condition {
                state.update_join(index, JoinUpdate::Condition(condition.clone()))?;
            }
        }

        for filter in &self.filters {
            state.add_filter(filter.as_str());
        }

        for step in &self.sorts {
            state.add_sort(tables)?;
            let index = state.sorts.len() - 1;
            if let Some(alias) = &step.alias {
                state.update_sort(index, SortUpdate::Alias(alias.clone()), tables)?;
            }
            if let Some(column) = &step.column {
                state.update_sort(index, SortUpdate::Column(column.clone()), tables)?;
            }
            state.update_sort(index, SortUpdate::Direction(step.direction), tables)?;
        }

        state.set_limit(self.limit.as_str());
        state.set_offset(self.offset.as_str());
        state.set_select(self.select.clone());

        debug!(
            tables = state.selected_tables.len(),
            joins = state.joins.len(),
            filters = state.filters.len(),
            sorts = state.sorts.len(),
            "replayed query script"
        );
        Ok(state)
    }
}
