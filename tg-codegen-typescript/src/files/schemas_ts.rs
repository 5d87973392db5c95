//! schemas.ts generator.
//!
//! Field chains are built in a fixed order: base type, `.min(1)`,
//! `.max(len)`, digit refinement, `.optional()`, `.describe(...)`.

use tablegen_codegen::{builder::CodeBuilder, language::NamingConvention};
use tablegen_core::{GeneratedFile, Precision, SqlType, TypeMapper, contains_any_keyword};
use tablegen_schema::{Column, Table};

use crate::type_mapper::ZodTypeMapper;

/// Not-null string columns whose name contains one of these may be empty.
const MIN_LENGTH_EXEMPT: &[&str] = &["description", "note", "remarks"];

/// One `z.object` schema per table.
pub struct SchemasTs<'a> {
    tables: &'a [Table],
}

impl<'a> SchemasTs<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        Self { tables }
    }
}

impl GeneratedFile for SchemasTs<'_> {
    fn path(&self) -> String {
        "schemas.ts".to_string()
    }

    fn render(&self) -> String {
        let naming = NamingConvention::TYPESCRIPT;
        let mut b = CodeBuilder::typescript();
        b.push_line("import { z } from 'zod';").push_blank();

        for table in self.tables {
            let type_name = naming.type_name(&table.table_name);
            let doc = if table.table_name_jp.is_empty() {
                &table.table_name
            } else {
                &table.table_name_jp
            };
            b.push_doc_block([doc.as_str()]);
            b.push_block(
                &format!("export const {type_name}Schema = z.object({{"),
                "});",
                |b| {
                    for col in &table.columns {
                        b.push_line(&format!(
                            "{}: {},",
                            naming.field_name(&col.col_name),
                            zod_field(col)
                        ));
                    }
                },
            );
            b.push_blank();
        }
        b.build()
    }
}

/// The zod expression for one column.
pub fn zod_field(col: &Column) -> String {
    let ty = col.sql_type();
    let mut expr = ZodTypeMapper.map_type(ty).to_string();

    if matches!(ty, SqlType::Text | SqlType::Bytes) {
        if col.is_not_null() && !contains_any_keyword(&col.col_name, MIN_LENGTH_EXEMPT) {
            expr.push_str(".min(1)");
        }
        if let Some(max) = col.length().and_then(|l| l.parse::<u32>().ok()) {
            expr.push_str(&format!(".max({max})"));
        }
    }

    if let Some(pattern) = digit_pattern(col) {
        expr.push_str(&format!(".refine((v) => {pattern}.test(String(v)))"));
    }

    expr.push_str(".optional()");

    if !col.col_name_jp.is_empty() {
        expr.push_str(&format!(".describe('{}')", escape_single_quoted(&col.col_name_jp)));
    }
    expr
}

/// Regex literal accepting at most the integer and fraction digits of a
/// `numeric(p, s)` column.
fn digit_pattern(col: &Column) -> Option<String> {
    if !matches!(col.type_name().as_str(), "numeric" | "decimal") {
        return None;
    }
    let precision = col.length().and_then(Precision::parse)?;
    let integer = precision.integer_digits().max(1);
    Some(match precision.scale {
        0 => format!(r"/^-?\d{{1,{integer}}}$/"),
        scale => format!(r"/^-?\d{{1,{integer}}}(\.\d{{1,{scale}}})?$/"),
    })
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_string() {
        let col = Column::new("user_name", "User", "varchar")
            .with_length("50")
            .with_constraint("NN");
        assert_eq!(
            zod_field(&col),
            "z.string().min(1).max(50).optional().describe('User')"
        );
    }

    #[test]
    fn test_exempt_names_skip_min() {
        let col = Column::new("remarks_text", "", "text").with_constraint("NN");
        assert_eq!(zod_field(&col), "z.string().optional()");
    }

    #[test]
    fn test_numeric_refinement() {
        let col = Column::new("price", "", "numeric").with_length("10,2");
        assert_eq!(
            zod_field(&col),
            r"z.number().refine((v) => /^-?\d{1,8}(\.\d{1,2})?$/.test(String(v))).optional()"
        );

        let col = Column::new("qty", "", "numeric").with_length("5");
        assert_eq!(
            zod_field(&col),
            r"z.number().refine((v) => /^-?\d{1,5}$/.test(String(v))).optional()"
        );
    }

    #[test]
    fn test_describe_escapes_quotes() {
        let col = Column::new("flag", "It's on", "boolean");
        assert_eq!(zod_field(&col), r"z.boolean().optional().describe('It\'s on')");
    }

    #[test]
    fn test_time_and_unknown() {
        assert_eq!(
            zod_field(&Column::new("at", "", "time")),
            "z.iso.time().optional()"
        );
        assert_eq!(
            zod_field(&Column::new("doc", "", "jsonb")),
            "z.any().optional()"
        );
    }
}
