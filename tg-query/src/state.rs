//! Caller-owned query state and its edit operations.
//!
//! Every operation mutates the state in place and borrows the parsed
//! table list when it needs column information. A failed operation leaves
//! the state untouched.
//!
//! Aliases are always `t0..t{n-1}` in selection order. When a table is
//! removed or moved, joins, sorts, filters and the select override are
//! rewritten to the new aliases. Joins and sorts that point at a removed
//! table are dropped, as are joins and filters whose text mentions it.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use tablegen_schema::{CommonColumns, Table};
use tracing::{debug, warn};

use crate::{
    alias::{alias_for, mentions_alias, remap_aliases},
    error::QueryError,
    join::infer_join,
    select::default_select_list,
};

/// A table in the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTable {
    pub table_name: String,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    #[serde(rename = "INNER JOIN", alias = "inner", alias = "INNER")]
    Inner,
    #[serde(rename = "LEFT JOIN", alias = "left", alias = "LEFT")]
    Left,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub left_alias: String,
    pub right_alias: String,
    #[serde(rename = "type")]
    pub join_type: JoinType,
    /// Free SQL; continuation lines start with `AND`.
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub alias: String,
    pub column: String,
    pub direction: SortDirection,
}

/// One-step move within an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Up,
    Down,
}

/// A single-field edit of a [`Join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinUpdate {
    LeftAlias(String),
    RightAlias(String),
    Type(JoinType),
    Condition(String),
}

/// A single-field edit of a [`Sort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortUpdate {
    /// Also resets the column to the first column of that alias' table.
    Alias(String),
    Column(String),
    Direction(SortDirection),
}

/// Query being composed: selected tables, joins, filters, sorts and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    pub selected_tables: Vec<SelectedTable>,
    pub joins: Vec<Join>,
    /// Raw predicates, ANDed. Blank entries are ignored when rendering.
    pub filters: Vec<String>,
    pub sorts: Vec<Sort>,
    pub limit: String,
    pub offset: String,
    /// User-edited select list replacing the default one.
    pub select: Option<String>,
}

pub(crate) fn find_table<'t>(tables: &'t [Table], name: &str) -> Option<&'t Table> {
    tables.iter().find(|t| t.table_name == name)
}

/// Move `items[index]` one step. `None` when `index` is out of range,
/// `Some(false)` when the item is already at the edge.
fn shift_item<T>(items: &mut [T], index: usize, shift: Shift) -> Option<bool> {
    if index >= items.len() {
        return None;
    }
    let target = match shift {
        Shift::Up => index.checked_sub(1),
        Shift::Down => Some(index + 1).filter(|&i| i < items.len()),
    };
    match target {
        Some(target) => {
            items.swap(index, target);
            Some(true)
        }
        None => Some(false),
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_tables.is_empty()
    }

    pub fn table_for_alias(&self, alias: &str) -> Option<&SelectedTable> {
        self.selected_tables.iter().find(|t| t.alias == alias)
    }

    /// Schema definition of the table behind `alias`.
    pub fn definition<'t>(&self, tables: &'t [Table], alias: &str) -> Option<&'t Table> {
        self.table_for_alias(alias)
            .and_then(|selected| find_table(tables, &selected.table_name))
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    /// Append a table; its alias is `t<position>`.
    pub fn add_table(&mut self, table_name: impl Into<String>) -> &SelectedTable {
        let position = self.selected_tables.len();
        let selected = SelectedTable {
            table_name: table_name.into(),
            alias: alias_for(position),
        };
        debug!(table = %selected.table_name, alias = %selected.alias, "added table");
        self.selected_tables.push(selected);
        &self.selected_tables[position]
    }

    pub fn remove_table(&mut self, index: usize) -> Result<SelectedTable, QueryError> {
        let len = self.selected_tables.len();
        if index >= len {
            return Err(QueryError::TableIndexOutOfRange { index, len });
        }
        let removed = self.selected_tables.remove(index);
        self.drop_references(&removed.alias);
        self.renumber();
        Ok(removed)
    }

    /// Move a table one step. Returns `false` when it is already at the edge.
    pub fn move_table(&mut self, index: usize, shift: Shift) -> Result<bool, QueryError> {
        let len = self.selected_tables.len();
        let moved = shift_item(&mut self.selected_tables, index, shift)
            .ok_or(QueryError::TableIndexOutOfRange { index, len })?;
        if moved {
            self.renumber();
        }
        Ok(moved)
    }

    fn drop_references(&mut self, alias: &str) {
        self.joins.retain(|join| {
            let keep = join.left_alias != alias
                && join.right_alias != alias
                && !mentions_alias(&join.condition, alias);
            if !keep {
                warn!(alias, "dropping join that references a removed table");
            }
            keep
        });
        self.sorts.retain(|sort| {
            let keep = sort.alias != alias;
            if !keep {
                warn!(alias, column = %sort.column, "dropping sort on a removed table");
            }
            keep
        });
        self.filters.retain(|filter| {
            let keep = !mentions_alias(filter, alias);
            if !keep {
                warn!(alias, filter = %filter, "dropping filter that references a removed table");
            }
            keep
        });
        if self.select.as_deref().is_some_and(|s| mentions_alias(s, alias)) {
            warn!(alias, "select list references a removed table, restoring the default");
            self.select = None;
        }
    }

    /// Reassign `t<position>` aliases and rewrite everything that refers
    /// to the old ones.
    fn renumber(&mut self) {
        let mut mapping = HashMap::new();
        for (position, table) in self.selected_tables.iter_mut().enumerate() {
            let alias = alias_for(position);
            if table.alias != alias {
                let old = std::mem::replace(&mut table.alias, alias.clone());
                mapping.insert(old, alias);
            }
        }
        if mapping.is_empty() {
            return;
        }
        debug!(?mapping, "renumbered aliases");

        let rename = |alias: &mut String| {
            if let Some(new) = mapping.get(alias.as_str()) {
                *alias = new.clone();
            }
        };
        for join in &mut self.joins {
            rename(&mut join.left_alias);
            rename(&mut join.right_alias);
            join.condition = remap_aliases(&join.condition, &mapping);
        }
        for sort in &mut self.sorts {
            rename(&mut sort.alias);
        }
        for filter in &mut self.filters {
            *filter = remap_aliases(filter, &mapping);
        }
        if let Some(select) = &mut self.select {
            *select = remap_aliases(select, &mapping);
        }
    }

    // ---------------------------------------------------------------------
    // Joins
    // ---------------------------------------------------------------------

    /// Join the last selected table to the one before it, inferring the
    /// condition from the schema.
    pub fn add_join(
        &mut self,
        tables: &[Table],
        common: &CommonColumns,
    ) -> Result<&Join, QueryError> {
        let len = self.selected_tables.len();
        if len < 2 {
            return Err(QueryError::JoinNeedsTwoTables);
        }
        let left = &self.selected_tables[len - 2];
        let right = &self.selected_tables[len - 1];
        let inferred = infer_join(left, right, tables, common);
        debug!(
            left = %left.table_name,
            right = %right.table_name,
            rule = ?inferred.rule,
            "inferred join condition"
        );
        self.joins.push(Join {
            left_alias: left.alias.clone(),
            right_alias: right.alias.clone(),
            join_type: JoinType::Inner,
            condition: inferred.condition,
        });
        Ok(&self.joins[self.joins.len() - 1])
    }

    /// Edit one field of a join. A new side must be a selected alias.
    pub fn update_join(&mut self, index: usize, update: JoinUpdate) -> Result<(), QueryError> {
        let len = self.joins.len();
        if index >= len {
            return Err(QueryError::JoinIndexOutOfRange { index, len });
        }
        if let JoinUpdate::LeftAlias(alias) | JoinUpdate::RightAlias(alias) = &update
            && self.table_for_alias(alias).is_none()
        {
            return Err(QueryError::UnknownAlias(alias.clone()));
        }
        let join = &mut self.joins[index];
        match update {
            JoinUpdate::LeftAlias(alias) => join.left_alias = alias,
            JoinUpdate::RightAlias(alias) => join.right_alias = alias,
            JoinUpdate::Type(join_type) => join.join_type = join_type,
            JoinUpdate::Condition(condition) => join.condition = condition,
        }
        Ok(())
    }

    pub fn remove_join(&mut self, index: usize) -> Result<Join, QueryError> {
        let len = self.joins.len();
        if index >= len {
            return Err(QueryError::JoinIndexOutOfRange { index, len });
        }
        Ok(self.joins.remove(index))
    }

    pub fn move_join(&mut self, index: usize, shift: Shift) -> Result<bool, QueryError> {
        let len = self.joins.len();
        shift_item(&mut self.joins, index, shift)
            .ok_or(QueryError::JoinIndexOutOfRange { index, len })
    }

    // ---------------------------------------------------------------------
    // Filters
    // ---------------------------------------------------------------------

    /// Append a filter and return its index.
    pub fn add_filter(&mut self, predicate: impl Into<String>) -> usize {
        self.filters.push(predicate.into());
        self.filters.len() - 1
    }

    pub fn update_filter(
        &mut self,
        index: usize,
        predicate: impl Into<String>,
    ) -> Result<(), QueryError> {
        let len = self.filters.len();
        let filter = self
            .filters
            .get_mut(index)
            .ok_or(QueryError::FilterIndexOutOfRange { index, len })?;
        *filter = predicate.into();
        Ok(())
    }

    pub fn remove_filter(&mut self, index: usize) -> Result<String, QueryError> {
        let len = self.filters.len();
        if index >= len {
            return Err(QueryError::FilterIndexOutOfRange { index, len });
        }
        Ok(self.filters.remove(index))
    }

    pub fn move_filter(&mut self, index: usize, shift: Shift) -> Result<bool, QueryError> {
        let len = self.filters.len();
        shift_item(&mut self.filters, index, shift)
            .ok_or(QueryError::FilterIndexOutOfRange { index, len })
    }

    // ---------------------------------------------------------------------
    // Sorts
    // ---------------------------------------------------------------------

    /// Append an ascending sort on the first column of the first table.
    pub fn add_sort(&mut self, tables: &[Table]) -> Result<&Sort, QueryError> {
        let first = self
            .selected_tables
            .first()
            .ok_or(QueryError::EmptySelection)?;
        let column = first_column(tables, &first.table_name)?;
        self.sorts.push(Sort {
            alias: first.alias.clone(),
            column,
            direction: SortDirection::Asc,
        });
        Ok(&self.sorts[self.sorts.len() - 1])
    }

    pub fn update_sort(
        &mut self,
        index: usize,
        update: SortUpdate,
        tables: &[Table],
    ) -> Result<(), QueryError> {
        let len = self.sorts.len();
        if index >= len {
            return Err(QueryError::SortIndexOutOfRange { index, len });
        }
        match update {
            SortUpdate::Alias(alias) => {
                let selected = self
                    .table_for_alias(&alias)
                    .ok_or_else(|| QueryError::UnknownAlias(alias.clone()))?;
                let column = first_column(tables, &selected.table_name)?;
                let sort = &mut self.sorts[index];
                sort.alias = alias;
                sort.column = column;
            }
            SortUpdate::Column(column) => self.sorts[index].column = column,
            SortUpdate::Direction(direction) => self.sorts[index].direction = direction,
        }
        Ok(())
    }

    pub fn remove_sort(&mut self, index: usize) -> Result<Sort, QueryError> {
        let len = self.sorts.len();
        if index >= len {
            return Err(QueryError::SortIndexOutOfRange { index, len });
        }
        Ok(self.sorts.remove(index))
    }

    pub fn move_sort(&mut self, index: usize, shift: Shift) -> Result<bool, QueryError> {
        let len = self.sorts.len();
        shift_item(&mut self.sorts, index, shift)
            .ok_or(QueryError::SortIndexOutOfRange { index, len })
    }

    // ---------------------------------------------------------------------
    // Paging and select list
    // ---------------------------------------------------------------------

    pub fn set_limit(&mut self, limit: impl Into<String>) {
        self.limit = limit.into();
    }

    pub fn set_offset(&mut self, offset: impl Into<String>) {
        self.offset = offset.into();
    }

    /// Replace the select list; `None` or blank text restores the default.
    pub fn set_select(&mut self, select: Option<String>) {
        self.select = select.filter(|s| !s.trim().is_empty());
    }

    /// `alias.col AS alias_col` for every selected column, table by table.
    pub fn default_select_list(&self, tables: &[Table]) -> String {
        default_select_list(&self.selected_tables, tables)
    }

    /// The select list in effect: the override, or the default.
    pub fn select_list(&self, tables: &[Table]) -> String {
        match &self.select {
            Some(select) => select.clone(),
            None => self.default_select_list(tables),
        }
    }

    /// Whether the select list in effect differs from the default,
    /// ignoring whitespace.
    pub fn is_select_edited(&self, tables: &[Table]) -> bool {
        let squash = |s: &str| s.split_whitespace().collect::<String>();
        squash(&self.select_list(tables)) != squash(&self.default_select_list(tables))
    }
}

fn first_column(tables: &[Table], table_name: &str) -> Result<String, QueryError> {
    let table = find_table(tables, table_name)
        .ok_or_else(|| QueryError::UnknownTable(table_name.to_string()))?;
    table
        .columns
        .first()
        .map(|c| c.col_name.clone())
        .ok_or_else(|| QueryError::TableHasNoColumns(table_name.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_schema::Column;

    use super::*;

    fn tables() -> Vec<Table> {
        vec![
            Table::new("users", "Users")
                .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
                .with_column(Column::new("name", "Name", "varchar"))
                .with_column(Column::new("dept_id", "Dept", "bigint").with_pkfk("FK")),
            Table::new("departments", "Departments")
                .with_column(Column::new("id", "ID", "bigserial").with_pkfk("PK"))
                .with_column(Column::new("title", "Title", "varchar")),
            Table::new("projects", "Projects")
                .with_column(Column::new("code", "Code", "char"))
                .with_column(Column::new("dept_id", "Dept", "bigint")),
        ]
    }

    fn aliases(state: &QueryState) -> Vec<&str> {
        state
            .selected_tables
            .iter()
            .map(|t| t.alias.as_str())
            .collect()
    }

    fn three_tables() -> QueryState {
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_table("departments");
        state.add_table("projects");
        state
    }

    #[test]
    fn test_add_table_assigns_position_alias() {
        let state = three_tables();
        assert_eq!(aliases(&state), ["t0", "t1", "t2"]);
    }

    #[test]
    fn test_remove_table_renumbers() {
        let mut state = three_tables();
        let removed = state.remove_table(0).unwrap();
        assert_eq!(removed.table_name, "users");
        assert_eq!(aliases(&state), ["t0", "t1"]);
        assert_eq!(state.selected_tables[0].table_name, "departments");
    }

    #[test]
    fn test_move_table_renumbers_and_rewrites() {
        let tables = tables();
        let mut state = three_tables();
        state.add_filter("t2.code = :code");
        state.add_sort(&tables).unwrap();

        assert!(state.move_table(2, Shift::Up).unwrap());
        assert_eq!(aliases(&state), ["t0", "t1", "t2"]);
        assert_eq!(state.selected_tables[1].table_name, "projects");
        assert_eq!(state.filters, ["t1.code = :code"]);
        assert_eq!(state.sorts[0].alias, "t0");
    }

    #[test]
    fn test_move_table_past_edges_is_noop() {
        let mut state = three_tables();
        assert!(!state.move_table(0, Shift::Up).unwrap());
        assert!(!state.move_table(2, Shift::Down).unwrap());
        assert_eq!(state.selected_tables[0].table_name, "users");
        assert_eq!(
            state.move_table(3, Shift::Up),
            Err(QueryError::TableIndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_remove_table_drops_dangling_references() {
        let tables = tables();
        let common = CommonColumns::default();
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_table("departments");
        state.add_join(&tables, &common).unwrap();
        state.add_table("projects");
        state.add_join(&tables, &common).unwrap();
        state.add_filter("t1.title = :title");
        state.add_filter("t2.code = :code");

        state.remove_table(1).unwrap();

        assert_eq!(aliases(&state), ["t0", "t1"]);
        assert!(state.joins.is_empty());
        assert_eq!(state.filters, ["t1.code = :code"]);
    }

    #[test]
    fn test_add_join_needs_two_tables() {
        let tables = tables();
        let mut state = QueryState::new();
        state.add_table("users");
        let before = state.clone();
        let err = state.add_join(&tables, &CommonColumns::default()).unwrap_err();
        assert_eq!(err, QueryError::JoinNeedsTwoTables);
        assert_eq!(
            err.to_string(),
            "at least two tables must be selected to add a join"
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_join_uses_last_two_tables() {
        let tables = tables();
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_table("departments");
        let join = state.add_join(&tables, &CommonColumns::default()).unwrap();
        assert_eq!(join.left_alias, "t0");
        assert_eq!(join.right_alias, "t1");
        assert_eq!(join.join_type, JoinType::Inner);
        assert_eq!(join.condition, "t0.dept_id = t1.id");
    }

    #[test]
    fn test_update_and_move_joins() {
        let tables = tables();
        let common = CommonColumns::default();
        let mut state = three_tables();
        state.add_join(&tables, &common).unwrap();
        state
            .update_join(0, JoinUpdate::Type(JoinType::Left))
            .unwrap();
        state
            .update_join(0, JoinUpdate::Condition("t1.id = t2.dept_id".into()))
            .unwrap();
        assert_eq!(state.joins[0].join_type, JoinType::Left);
        assert_eq!(state.joins[0].condition, "t1.id = t2.dept_id");
        assert!(!state.move_join(0, Shift::Down).unwrap());
        assert_eq!(
            state.update_join(5, JoinUpdate::Type(JoinType::Inner)),
            Err(QueryError::JoinIndexOutOfRange { index: 5, len: 1 })
        );
        state.remove_join(0).unwrap();
        assert!(state.joins.is_empty());
    }

    #[test]
    fn test_update_join_rejects_unknown_alias() {
        let tables = tables();
        let mut state = three_tables();
        state.add_join(&tables, &CommonColumns::default()).unwrap();
        let before = state.clone();

        assert_eq!(
            state.update_join(0, JoinUpdate::LeftAlias("t9".into())),
            Err(QueryError::UnknownAlias("t9".into()))
        );
        assert_eq!(
            state.update_join(0, JoinUpdate::RightAlias("t3".into())),
            Err(QueryError::UnknownAlias("t3".into()))
        );
        assert_eq!(state, before);

        state
            .update_join(0, JoinUpdate::LeftAlias("t0".into()))
            .unwrap();
        assert_eq!(state.joins[0].left_alias, "t0");
    }

    #[test]
    fn test_remove_middle_table_drops_joins_mentioning_it() {
        let tables = tables();
        let common = CommonColumns::default();
        let mut state = three_tables();
        state.add_join(&tables, &common).unwrap();
        state.add_join(&tables, &common).unwrap();
        for (index, condition) in [
            (0, "t0.dept_id = t2.dept_id\nAND t1.id = t2.dept_id"),
            (1, "t0.dept_id = t2.dept_id"),
        ] {
            state
                .update_join(index, JoinUpdate::LeftAlias("t0".into()))
                .unwrap();
            state
                .update_join(index, JoinUpdate::Condition(condition.into()))
                .unwrap();
        }

        state.remove_table(1).unwrap();

        assert_eq!(aliases(&state), ["t0", "t1"]);
        assert_eq!(state.joins.len(), 1);
        assert_eq!(state.joins[0].left_alias, "t0");
        assert_eq!(state.joins[0].right_alias, "t1");
        assert_eq!(state.joins[0].condition, "t0.dept_id = t1.dept_id");
    }

    #[test]
    fn test_filters() {
        let mut state = QueryState::new();
        state.add_filter("a = 1");
        state.add_filter("b = 2");
        state.update_filter(1, "b = 3").unwrap();
        assert!(state.move_filter(1, Shift::Up).unwrap());
        assert_eq!(state.filters, ["b = 3", "a = 1"]);
        assert_eq!(state.remove_filter(0).unwrap(), "b = 3");
        assert!(state.remove_filter(4).is_err());
    }

    #[test]
    fn test_add_sort_defaults_to_first_column() {
        let tables = tables();
        let mut state = QueryState::new();
        assert_eq!(state.add_sort(&tables), Err(QueryError::EmptySelection));

        state.add_table("users");
        state.add_table("projects");
        let sort = state.add_sort(&tables).unwrap();
        assert_eq!(
            sort,
            &Sort {
                alias: "t0".into(),
                column: "id".into(),
                direction: SortDirection::Asc,
            }
        );
    }

    #[test]
    fn test_sort_alias_change_resets_column() {
        let tables = tables();
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_table("projects");
        state.add_sort(&tables).unwrap();
        state
            .update_sort(0, SortUpdate::Column("name".into()), &tables)
            .unwrap();
        state
            .update_sort(0, SortUpdate::Direction(SortDirection::Desc), &tables)
            .unwrap();
        state
            .update_sort(0, SortUpdate::Alias("t1".into()), &tables)
            .unwrap();
        assert_eq!(state.sorts[0].column, "code");
        assert_eq!(state.sorts[0].direction, SortDirection::Desc);

        assert_eq!(
            state.update_sort(0, SortUpdate::Alias("t9".into()), &tables),
            Err(QueryError::UnknownAlias("t9".into()))
        );
        assert_eq!(state.sorts[0].alias, "t1");
    }

    #[test]
    fn test_select_edited_ignores_whitespace() {
        let tables = tables();
        let mut state = QueryState::new();
        state.add_table("departments");
        assert!(!state.is_select_edited(&tables));

        state.set_select(Some("t0.id AS t0_id,   t0.title AS t0_title".into()));
        assert!(!state.is_select_edited(&tables));

        state.set_select(Some("t0.title".into()));
        assert!(state.is_select_edited(&tables));

        state.set_select(Some("   ".into()));
        assert_eq!(state.select, None);
    }
}
