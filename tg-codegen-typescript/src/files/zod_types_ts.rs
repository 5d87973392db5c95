//! zod-types.ts generator.

use tablegen_codegen::{builder::CodeBuilder, language::NamingConvention};
use tablegen_core::GeneratedFile;
use tablegen_schema::Table;

use super::type_tag;

/// Types inferred from the schemas in `schemas.ts`.
pub struct ZodTypesTs<'a> {
    tables: &'a [Table],
}

impl<'a> ZodTypesTs<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        Self { tables }
    }
}

impl GeneratedFile for ZodTypesTs<'_> {
    fn path(&self) -> String {
        "zod-types.ts".to_string()
    }

    fn render(&self) -> String {
        let naming = NamingConvention::TYPESCRIPT;
        let type_names: Vec<String> = self
            .tables
            .iter()
            .map(|t| naming.type_name(&t.table_name))
            .collect();

        let mut b = CodeBuilder::typescript();
        b.push_line("import { z } from 'zod';");
        if !type_names.is_empty() {
            let schemas: Vec<String> = type_names.iter().map(|n| format!("{n}Schema")).collect();
            b.push_line(&format!(
                "import {{ {} }} from './schemas';",
                schemas.join(", ")
            ));
        }
        b.push_blank();

        for (table, type_name) in self.tables.iter().zip(&type_names) {
            b.push_doc_block([type_tag(type_name, &table.table_name_jp).as_str()]);
            b.push_line(&format!(
                "export type {type_name} = z.infer<typeof {type_name}Schema>;"
            ));
            b.push_blank();
        }
        b.build()
    }
}
