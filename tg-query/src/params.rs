//! Bind parameter extraction.
//!
//! A placeholder is `:name` outside string literals and comments; `::` is
//! a cast. Classification, in order:
//!
//! 1. `IN (:name)` makes `name` a list
//! 2. `LIMIT :name` / `OFFSET :name` make `name` an integer
//! 3. `<list>Size`, where `<list>` is a list parameter, is derived: an
//!    integer bound as the list's size and left out of method signatures
//!
//! Everything else is a scalar string.

use serde::Serialize;

use crate::alias::is_word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Text,
    TextList,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Computed from another parameter; never part of a method signature.
    pub is_derived: bool,
    /// The list parameter this one is the size of.
    pub derived_from: Option<String>,
}

impl Parameter {
    pub fn is_list(&self) -> bool {
        self.ty == ParamType::TextList
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Placeholder(&'a str),
    Symbol(u8),
}

fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match sql[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes.get(i + 1).is_some_and(|b| is_word(*b)) => {
                let start = i + 1;
                i = start;
                while i < bytes.len() && is_word(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::Placeholder(&sql[start..i]));
            }
            b if is_word(b) => {
                let start = i;
                while i < bytes.len() && is_word(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::Word(&sql[start..i]));
            }
            b if b.is_ascii_whitespace() => i += 1,
            b => {
                tokens.push(Token::Symbol(b));
                i += 1;
            }
        }
    }
    tokens
}

fn is_keyword(token: Option<&Token<'_>>, keywords: &[&str]) -> bool {
    matches!(token, Some(Token::Word(w)) if keywords.iter().any(|k| w.eq_ignore_ascii_case(k)))
}

/// Distinct bind parameters of `sql`, in order of first appearance.
pub fn extract_parameters(sql: &str) -> Vec<Parameter> {
    let tokens = tokenize(sql);
    // (name, list, integer)
    let mut found: Vec<(&str, bool, bool)> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let Token::Placeholder(name) = *token else {
            continue;
        };
        let before = |n: usize| i.checked_sub(n).and_then(|j| tokens.get(j));
        let list = is_keyword(before(2), &["in"])
            && before(1) == Some(&Token::Symbol(b'('))
            && tokens.get(i + 1) == Some(&Token::Symbol(b')'));
        let integer = is_keyword(before(1), &["limit", "offset"]);

        match found.iter_mut().find(|(n, _, _)| *n == name) {
            Some(entry) => {
                entry.1 |= list;
                entry.2 |= integer;
            }
            None => found.push((name, list, integer)),
        }
    }

    let lists: Vec<&str> = found
        .iter()
        .filter(|(_, list, _)| *list)
        .map(|(name, _, _)| *name)
        .collect();

    found
        .iter()
        .map(|&(name, list, integer)| {
            let derived_from = name
                .strip_suffix("Size")
                .filter(|base| !list && lists.contains(base))
                .map(str::to_string);
            let ty = if list {
                ParamType::TextList
            } else if integer || derived_from.is_some() {
                ParamType::Integer
            } else {
                ParamType::Text
            };
            Parameter {
                name: name.to_string(),
                ty,
                is_derived: derived_from.is_some(),
                derived_from,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn summary(sql: &str) -> Vec<(String, ParamType, Option<String>)> {
        extract_parameters(sql)
            .into_iter()
            .map(|p| (p.name, p.ty, p.derived_from))
            .collect()
    }

    #[test]
    fn test_classification() {
        let sql = "SELECT * FROM t WHERE t.id IN (:ids) AND t.flag = :flag \
                   AND cardinality(:idsSize) > 0 LIMIT :limit OFFSET :offset";
        assert_eq!(
            summary(sql),
            vec![
                ("ids".into(), ParamType::TextList, None),
                ("flag".into(), ParamType::Text, None),
                ("idsSize".into(), ParamType::Integer, Some("ids".into())),
                ("limit".into(), ParamType::Integer, None),
                ("offset".into(), ParamType::Integer, None),
            ]
        );
    }

    #[test]
    fn test_deduplicates_in_first_seen_order() {
        let params = extract_parameters("a = :b OR c = :a OR d = :b");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_casts_strings_and_comments_ignored() {
        let sql = "x::text = :name AND y = ':fake' -- :commented\n AND z /* :block */ = 1";
        assert_eq!(summary(sql), vec![("name".into(), ParamType::Text, None)]);
    }

    #[test]
    fn test_size_without_list_is_scalar() {
        assert_eq!(
            summary("page = :pageSize"),
            vec![("pageSize".into(), ParamType::Text, None)]
        );
    }

    #[test]
    fn test_in_is_case_insensitive() {
        let params = extract_parameters("code in ( :codes )");
        assert!(params[0].is_list());
        assert!(!params[0].is_derived);
    }

    #[test]
    fn test_serialized_shape() {
        let params = extract_parameters("id IN (:ids) AND n = cardinality(:idsSize)");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "name": "ids", "type": "textlist", "isDerived": false, "derivedFrom": null },
                { "name": "idsSize", "type": "integer", "isDerived": true, "derivedFrom": "ids" },
            ])
        );
    }

    #[test]
    fn test_no_parameters() {
        assert!(extract_parameters("SELECT 1").is_empty());
    }
}
