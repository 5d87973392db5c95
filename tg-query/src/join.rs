//! Join condition inference.
//!
//! Rules, first match wins:
//!
//! 1. a column tagged `AK` or `FK` in both tables
//! 2. a column whose name contains `_id` in both tables
//! 3. the left table has `<right table>_id`, equated to the right id
//! 4. the right table has `<left table>_id`, equated to the left id
//! 5. a `<stem>_id` column on one side whose stem abbreviates the other
//!    table's name (`dept_id` and `departments`), equated to the other
//!    side's id; left side first
//!
//! Without a match the condition is [`JOIN_PLACEHOLDER`]. Either way,
//! each side that carries the soft-delete column gets an
//! `AND <alias>.<flag> = <not deleted>` line.

use tablegen_schema::{Column, CommonColumns, Table};

use crate::state::{SelectedTable, find_table};

/// Condition used when no rule matches.
pub const JOIN_PLACEHOLDER: &str = "/* set the join condition */";

/// Condition used when a table is missing from the schema.
pub const MISSING_DEFINITION: &str = "/* table definition not found */";

/// Which rule produced a join condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRule {
    SharedKey,
    SharedId,
    LeftReferencesRight,
    RightReferencesLeft,
    NameStem,
    Unmatched,
    MissingDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredJoin {
    pub condition: String,
    pub rule: JoinRule,
}

pub fn infer_join(
    left: &SelectedTable,
    right: &SelectedTable,
    tables: &[Table],
    common: &CommonColumns,
) -> InferredJoin {
    let (Some(left_def), Some(right_def)) = (
        find_table(tables, &left.table_name),
        find_table(tables, &right.table_name),
    ) else {
        return InferredJoin {
            condition: MISSING_DEFINITION.to_string(),
            rule: JoinRule::MissingDefinition,
        };
    };

    let sides = Sides {
        left,
        left_def,
        right,
        right_def,
        id: &common.id,
    };
    let (mut condition, rule) = sides
        .key_condition()
        .unwrap_or_else(|| (JOIN_PLACEHOLDER.to_string(), JoinRule::Unmatched));

    let flag = &common.is_deleted;
    let not_deleted = flag.sql_literal(false);
    for (selected, def) in [(left, left_def), (right, right_def)] {
        if def.has_column(&flag.name) {
            condition.push_str(&format!(
                "\nAND {}.{} = {not_deleted}",
                selected.alias, flag.name
            ));
        }
    }

    InferredJoin { condition, rule }
}

struct Sides<'a> {
    left: &'a SelectedTable,
    left_def: &'a Table,
    right: &'a SelectedTable,
    right_def: &'a Table,
    id: &'a str,
}

impl Sides<'_> {
    fn eq(&self, left_col: &str, right_col: &str) -> String {
        format!(
            "{}.{left_col} = {}.{right_col}",
            self.left.alias, self.right.alias
        )
    }

    fn key_condition(&self) -> Option<(String, JoinRule)> {
        let shared_key = self
            .left_def
            .columns
            .iter()
            .filter(|c| is_join_key(c))
            .find(|c| self.right_def.column(&c.col_name).is_some_and(is_join_key));
        if let Some(col) = shared_key {
            return Some((self.eq(&col.col_name, &col.col_name), JoinRule::SharedKey));
        }

        let shared_id = self
            .left_def
            .columns
            .iter()
            .find(|c| c.col_name.contains("_id") && self.right_def.has_column(&c.col_name));
        if let Some(col) = shared_id {
            return Some((self.eq(&col.col_name, &col.col_name), JoinRule::SharedId));
        }

        let right_ref = format!("{}_id", self.right.table_name);
        if self.left_def.has_column(&right_ref) {
            return Some((self.eq(&right_ref, self.id), JoinRule::LeftReferencesRight));
        }

        let left_ref = format!("{}_id", self.left.table_name);
        if self.right_def.has_column(&left_ref) {
            return Some((self.eq(self.id, &left_ref), JoinRule::RightReferencesLeft));
        }

        if let Some(col) = stem_reference(self.left_def, self.right_def, self.id) {
            return Some((self.eq(col, self.id), JoinRule::NameStem));
        }
        if let Some(col) = stem_reference(self.right_def, self.left_def, self.id) {
            return Some((self.eq(self.id, col), JoinRule::NameStem));
        }

        None
    }
}

fn is_join_key(column: &Column) -> bool {
    column.is_alternate_key() || column.is_foreign_key()
}

/// First `<stem>_id` column of `table` whose stem abbreviates the name
/// of `other`, provided `other` has the id column.
fn stem_reference<'a>(table: &'a Table, other: &Table, id: &str) -> Option<&'a str> {
    if !other.has_column(id) {
        return None;
    }
    table
        .columns
        .iter()
        .map(|c| c.col_name.as_str())
        .filter(|name| *name != id)
        .find(|name| {
            name.strip_suffix("_id")
                .is_some_and(|stem| abbreviates(stem, &other.table_name))
        })
}

/// Whether `stem` abbreviates `name` or its singular: same first
/// character, remaining characters in order (`dept` for `departments`,
/// `categ` for `categories`).
fn abbreviates(stem: &str, name: &str) -> bool {
    let Some(first) = stem.chars().next() else {
        return false;
    };
    singular_forms(name)
        .iter()
        .any(|candidate| candidate.starts_with(first) && is_subsequence(stem, candidate))
}

fn singular_forms(name: &str) -> Vec<String> {
    let mut forms = vec![name.to_string()];
    if let Some(base) = name.strip_suffix("ies") {
        forms.push(format!("{base}y"));
    }
    if let Some(base) = name.strip_suffix("es") {
        forms.push(base.to_string());
    }
    if let Some(base) = name.strip_suffix('s') {
        forms.push(base.to_string());
    }
    forms
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
