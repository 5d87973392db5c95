//! Shared utility functions for code generation.

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
///
/// Only the first character of each `_`-separated part is touched.
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to camelCase (e.g., "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Case-insensitive check whether `name` contains any of `keywords`.
pub fn contains_any_keyword(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// SQL string literal: `it's` becomes `'it''s'`.
pub fn sql_string_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Java string literal with backslashes and double quotes escaped.
pub fn java_string_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("hello"), "Hello");
        assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
        assert_eq!(to_pascal_case("foo_bar_baz"), "FooBarBaz");
        assert_eq!(to_pascal_case("hElLo"), "HElLo");
        assert_eq!(to_pascal_case("t0_user_id"), "T0UserId");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("record_id"), "recordId");
        assert_eq!(to_camel_case("is_removed"), "isRemoved");
        assert_eq!(to_camel_case("Users"), "users");
        assert_eq!(to_camel_case("UsersRepository"), "usersRepository");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_contains_any_keyword() {
        let keywords = ["description", "note", "remarks"];
        assert!(contains_any_keyword("item_Description", &keywords));
        assert!(contains_any_keyword("notes", &keywords));
        assert!(!contains_any_keyword("user_name", &keywords));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(sql_string_literal("ユーザー"), "'ユーザー'");
        assert_eq!(sql_string_literal("it's"), "'it''s'");
        assert_eq!(java_string_literal("0"), r#""0""#);
        assert_eq!(java_string_literal(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
    }
}
