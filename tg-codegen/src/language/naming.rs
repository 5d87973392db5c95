//! Naming conventions for different programming languages.

use tablegen_core::{to_camel_case, to_pascal_case};

/// Language-specific naming conventions.
///
/// Defines how to transform table and column names, and how to handle
/// reserved words.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Transform table name to type name (e.g., "user_roles" -> "UserRoles")
    pub table_to_type: fn(&str) -> String,
    /// Transform column name to field name (e.g., "user_id" -> "userId")
    pub column_to_field: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g., "default" -> "default_" in Java)
    pub escape_reserved: fn(&str) -> String,
}

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

fn suffix_underscore(name: &str) -> String {
    format!("{name}_")
}

impl NamingConvention {
    /// Java: PascalCase types, camelCase fields, `_` suffix for keywords.
    pub const JAVA: Self = Self {
        table_to_type: to_pascal_case,
        column_to_field: to_camel_case,
        reserved_words: JAVA_RESERVED,
        escape_reserved: suffix_underscore,
    };

    /// TypeScript: PascalCase types, camelCase properties. Property names
    /// may be keywords, so nothing is escaped.
    pub const TYPESCRIPT: Self = Self {
        table_to_type: to_pascal_case,
        column_to_field: to_camel_case,
        reserved_words: &[],
        escape_reserved: str::to_string,
    };

    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, table: &str) -> String {
        let transformed = (self.table_to_type)(table);
        self.safe_name(&transformed)
    }

    /// Transform and make safe for use as a field name.
    pub fn field_name(&self, column: &str) -> String {
        let transformed = (self.column_to_field)(column);
        self.safe_name(&transformed)
    }

    /// PascalCase form of a field name, for accessors (`getUserId`).
    pub fn accessor_suffix(&self, column: &str) -> String {
        to_pascal_case(&self.field_name(column))
    }
}
