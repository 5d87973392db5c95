//! Select-list splitting and item parsing.
//!
//! Items are split on commas outside parentheses and single-quoted
//! strings. Within an item, the first top-level `AS` separates the
//! expression from its output alias; the first `word.word` in the
//! expression is its column reference.

use tablegen_schema::Table;

use crate::{alias::is_word, state::SelectedTable, state::find_table};

/// The default select list: `alias.col AS alias_col` for every column,
/// table by table, one item per line. A table missing from the schema
/// contributes `alias.*`.
pub fn default_select_list(selected: &[SelectedTable], tables: &[Table]) -> String {
    let mut items = Vec::new();
    for table in selected {
        let alias = &table.alias;
        match find_table(tables, &table.table_name) {
            Some(def) => items.extend(
                def.columns
                    .iter()
                    .map(|c| format!("{alias}.{name} AS {alias}_{name}", name = c.col_name)),
            ),
            None => items.push(format!("{alias}.*")),
        }
    }
    items.join(",\n")
}

/// Split a select list into trimmed, non-empty items.
pub fn split_select_list(list: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    for (i, b) in list.bytes().enumerate() {
        match b {
            b'\'' => in_quote = !in_quote,
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => depth = depth.saturating_sub(1),
            b',' if !in_quote && depth == 0 => {
                items.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(list[start..].trim());
    items.retain(|item| !item.is_empty());
    items
}

/// One select-list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectItem<'a> {
    pub expr: &'a str,
    pub alias: Option<&'a str>,
}

impl<'a> SelectItem<'a> {
    pub fn parse(item: &'a str) -> Self {
        match split_alias(item) {
            Some((expr, alias)) => Self {
                expr,
                alias: Some(alias),
            },
            None => Self {
                expr: item.trim(),
                alias: None,
            },
        }
    }

    /// `(table alias, column)` of the first qualified reference.
    pub fn column_reference(&self) -> Option<(&'a str, &'a str)> {
        column_reference(self.expr)
    }

    /// Name of the result column: the alias, else the referenced column,
    /// else the expression with every non-word character replaced by `_`.
    pub fn output_name(&self) -> String {
        if let Some(alias) = self.alias {
            return alias.to_string();
        }
        match self.column_reference() {
            Some((_, column)) => column.to_string(),
            None => self
                .expr
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect(),
        }
    }
}

fn split_alias(item: &str) -> Option<(&str, &str)> {
    let bytes = item.as_bytes();
    let mut depth = 0i32;
    let mut in_quote = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' => in_quote = !in_quote,
            b'(' if !in_quote => depth += 1,
            b')' if !in_quote => depth -= 1,
            _ if depth == 0 && !in_quote && b.is_ascii_whitespace() => {
                let rest = &bytes[i..];
                let ws = rest.iter().take_while(|c| c.is_ascii_whitespace()).count();
                let keyword = &rest[ws..];
                if keyword.len() > 2
                    && keyword[..2].eq_ignore_ascii_case(b"as")
                    && keyword[2].is_ascii_whitespace()
                {
                    let expr = item[..i].trim();
                    let alias = item[i + ws + 2..].trim();
                    if !expr.is_empty() && !alias.is_empty() {
                        return Some((expr, alias));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// First `word.word` (or `word.*`) in `expr`.
pub fn column_reference(expr: &str) -> Option<(&str, &str)> {
    let bytes = expr.as_bytes();
    for (dot, _) in expr.match_indices('.') {
        let start = bytes[..dot]
            .iter()
            .rposition(|b| !is_word(*b))
            .map_or(0, |p| p + 1);
        let end = bytes[dot + 1..]
            .iter()
            .position(|b| !(is_word(*b) || *b == b'*'))
            .map_or(bytes.len(), |p| dot + 1 + p);
        if start < dot && dot + 1 < end {
            return Some((&expr[start..dot], &expr[dot + 1..end]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tablegen_schema::Column;

    use super::*;

    #[test]
    fn test_split_respects_parens_and_quotes() {
        assert_eq!(
            split_select_list("t0.id, COALESCE(t0.name, 'a,b') AS name,\n  , count(*)"),
            ["t0.id", "COALESCE(t0.name, 'a,b') AS name", "count(*)"]
        );
    }

    #[test]
    fn test_parse_alias() {
        let item = SelectItem::parse("t0.id as user_id");
        assert_eq!(item.expr, "t0.id");
        assert_eq!(item.alias, Some("user_id"));
        assert_eq!(item.column_reference(), Some(("t0", "id")));
        assert_eq!(item.output_name(), "user_id");
    }

    #[test]
    fn test_alias_inside_parens_ignored() {
        let item = SelectItem::parse("CAST(t0.price AS text) AS price_text");
        assert_eq!(item.expr, "CAST(t0.price AS text)");
        assert_eq!(item.alias, Some("price_text"));
    }

    #[test]
    fn test_output_name_fallbacks() {
        assert_eq!(SelectItem::parse("t1.title").output_name(), "title");
        assert_eq!(SelectItem::parse("count(*)").output_name(), "count___");
        assert_eq!(SelectItem::parse("t0.*").output_name(), "*");
    }

    #[test]
    fn test_column_reference_skips_bare_dots() {
        assert_eq!(column_reference("lower( .x) || t2.code"), Some(("t2", "code")));
        assert_eq!(column_reference("now()"), None);
    }

    #[test]
    fn test_default_select_list() {
        let tables = vec![
            Table::new("users", "Users")
                .with_column(Column::new("id", "ID", "bigserial"))
                .with_column(Column::new("name", "Name", "varchar")),
        ];
        let selected = vec![
            SelectedTable {
                table_name: "users".into(),
                alias: "t0".into(),
            },
            SelectedTable {
                table_name: "ghosts".into(),
                alias: "t1".into(),
            },
        ];
        assert_eq!(
            default_select_list(&selected, &tables),
            "t0.id AS t0_id,\nt0.name AS t0_name,\nt1.*"
        );
    }
}
