//! Java type mapper.

use tablegen_core::{SqlType, TypeMapper};

/// Java reference types, as used by Ebean models and DTOs.
pub struct JavaTypeMapper;

impl JavaTypeMapper {
    /// Import a mapped type needs, if it is not in `java.lang`.
    pub fn import(ty: SqlType) -> Option<&'static str> {
        match ty {
            SqlType::Decimal => Some("java.math.BigDecimal"),
            SqlType::Instant => Some("java.time.Instant"),
            SqlType::Time => Some("java.time.LocalTime"),
            _ => None,
        }
    }
}

impl TypeMapper for JavaTypeMapper {
    fn language(&self) -> &'static str {
        "java"
    }

    fn map_type(&self, ty: SqlType) -> &'static str {
        match ty {
            SqlType::BigInt => "Long",
            SqlType::Int => "Integer",
            SqlType::Decimal => "BigDecimal",
            SqlType::Text => "String",
            SqlType::Bool => "Boolean",
            SqlType::Instant => "Instant",
            SqlType::Time => "LocalTime",
            SqlType::Bytes => "byte[]",
            SqlType::Other => "Object",
        }
    }
}
