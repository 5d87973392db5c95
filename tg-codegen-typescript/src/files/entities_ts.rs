//! entities.ts generator.

use tablegen_codegen::{builder::CodeBuilder, language::NamingConvention};
use tablegen_core::{GeneratedFile, TypeMapper};
use tablegen_schema::Table;

use super::type_tag;
use crate::type_mapper::TypeScriptTypeMapper;

/// One exported object type per table, every property optional.
pub struct EntitiesTs<'a> {
    tables: &'a [Table],
}

impl<'a> EntitiesTs<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        Self { tables }
    }
}

impl GeneratedFile for EntitiesTs<'_> {
    fn path(&self) -> String {
        "entities.ts".to_string()
    }

    fn render(&self) -> String {
        let naming = NamingConvention::TYPESCRIPT;
        let mut b = CodeBuilder::typescript();
        for table in self.tables {
            let type_name = naming.type_name(&table.table_name);
            b.push_doc_block([type_tag(&type_name, &table.table_name_jp).as_str()]);
            b.push_block(&format!("export type {type_name} = {{"), "};", |b| {
                for col in &table.columns {
                    if !col.col_name_jp.is_empty() {
                        b.push_jsdoc(&col.col_name_jp);
                    }
                    b.push_line(&format!(
                        "{}?: {};",
                        naming.field_name(&col.col_name),
                        TypeScriptTypeMapper.map_type(col.sql_type())
                    ));
                }
            });
            b.push_blank();
        }
        b.build()
    }
}
