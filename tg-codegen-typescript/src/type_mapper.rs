//! TypeScript and zod type mappers.

use tablegen_core::{SqlType, TypeMapper};

/// Plain TypeScript types.
pub struct TypeScriptTypeMapper;

impl TypeMapper for TypeScriptTypeMapper {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn map_type(&self, ty: SqlType) -> &'static str {
        match ty {
            SqlType::BigInt | SqlType::Int | SqlType::Decimal => "number",
            SqlType::Text | SqlType::Instant | SqlType::Time | SqlType::Bytes => "string",
            SqlType::Bool => "boolean",
            SqlType::Other => "any",
        }
    }
}

/// Base zod schema constructors.
pub struct ZodTypeMapper;

impl TypeMapper for ZodTypeMapper {
    fn language(&self) -> &'static str {
        "zod"
    }

    fn map_type(&self, ty: SqlType) -> &'static str {
        match ty {
            SqlType::BigInt | SqlType::Int | SqlType::Decimal => "z.number()",
            SqlType::Text | SqlType::Bytes => "z.string()",
            SqlType::Bool => "z.boolean()",
            SqlType::Instant => "z.iso.datetime()",
            SqlType::Time => "z.iso.time()",
            SqlType::Other => "z.any()",
        }
    }
}
