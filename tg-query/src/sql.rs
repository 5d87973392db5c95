//! SQL statement assembly.

use tablegen_codegen::builder::CodeBuilder;
use tracing::warn;

use crate::state::QueryState;

/// Render the statement for `state` using `select` as the select list.
///
/// Clause keywords sit at column zero with their items indented one
/// level; continuation lines of a join condition are indented under the
/// join. The statement has no trailing semicolon. An empty selection
/// renders as an empty string.
pub fn render_sql(state: &QueryState, select: &str) -> String {
    let Some(first) = state.selected_tables.first() else {
        return String::new();
    };
    let mut b = CodeBuilder::sql();

    b.push_line("SELECT").push_indent();
    let select = select.trim();
    if select.is_empty() {
        b.push_line("*");
    } else {
        b.push_lines(select.lines().map(str::trim).filter(|l| !l.is_empty()));
    }
    b.push_dedent();

    b.push_line("FROM").push_indent();
    b.push_line(&format!("{} AS {}", first.table_name, first.alias));
    b.push_dedent();

    for join in &state.joins {
        let table = match state.table_for_alias(&join.right_alias) {
            Some(selected) => selected.table_name.as_str(),
            None => {
                warn!(alias = %join.right_alias, "join references an alias that is not selected");
                "???"
            }
        };
        let mut condition = join.condition.lines().map(str::trim);
        let head = condition.next().unwrap_or_default();
        b.push_line(&format!(
            "{} {} AS {} ON {head}",
            join.join_type, table, join.right_alias
        ));
        b.push_indent();
        b.push_lines(condition);
        b.push_dedent();
    }

    let filters: Vec<&str> = state
        .filters
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if !filters.is_empty() {
        b.push_line("WHERE").push_indent();
        let last = filters.len() - 1;
        for (i, filter) in filters.iter().enumerate() {
            if i < last {
                b.push_line(&format!("{filter} AND"));
            } else {
                b.push_line(filter);
            }
        }
        b.push_dedent();
    }

    if !state.sorts.is_empty() {
        b.push_line("ORDER BY").push_indent();
        let last = state.sorts.len() - 1;
        for (i, sort) in state.sorts.iter().enumerate() {
            let sep = if i < last { "," } else { "" };
            b.push_line(&format!(
                "{}.{} {}{sep}",
                sort.alias, sort.column, sort.direction
            ));
        }
        b.push_dedent();
    }

    for (keyword, value) in [("LIMIT", &state.limit), ("OFFSET", &state.offset)] {
        let value = value.trim();
        if !value.is_empty() {
            b.push_line(&format!("{keyword} {value}"));
        }
    }

    b.build()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::state::{JoinType, Join, Sort, SortDirection};

    fn state() -> QueryState {
        let mut state = QueryState::new();
        state.add_table("users");
        state.add_table("departments");
        state.joins.push(Join {
            left_alias: "t0".into(),
            right_alias: "t1".into(),
            join_type: JoinType::Left,
            condition: "t0.dept_id = t1.id\nAND t1.is_deleted = false".into(),
        });
        state
    }

    #[test]
    fn test_full_statement() {
        let mut state = state();
        state.add_filter("t0.name = :name");
        state.add_filter("  ");
        state.add_filter("t1.id IN (:ids)");
        state.sorts.push(Sort {
            alias: "t0".into(),
            column: "name".into(),
            direction: SortDirection::Desc,
        });
        state.sorts.push(Sort {
            alias: "t1".into(),
            column: "id".into(),
            direction: SortDirection::Asc,
        });
        state.set_limit(" :limit ");
        state.set_offset("");

        let expected = "\
SELECT
    t0.id,
    t1.title
FROM
    users AS t0
LEFT JOIN departments AS t1 ON t0.dept_id = t1.id
    AND t1.is_deleted = false
WHERE
    t0.name = :name AND
    t1.id IN (:ids)
ORDER BY
    t0.name DESC,
    t1.id ASC
LIMIT :limit
";
        assert_eq!(render_sql(&state, "t0.id,\n  t1.title"), expected);
    }

    #[test]
    fn test_blank_select_is_star() {
        let mut state = QueryState::new();
        state.add_table("users");
        assert_eq!(render_sql(&state, " "), "SELECT\n    *\nFROM\n    users AS t0\n");
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(render_sql(&QueryState::new(), "*"), "");
    }

    #[test]
    fn test_dangling_join_alias() {
        let mut state = state();
        state.joins[0].right_alias = "t7".into();
        assert!(render_sql(&state, "*").contains("LEFT JOIN ??? AS t7 ON"));
    }
}
