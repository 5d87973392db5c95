//! schema.sql generator.

use tablegen_codegen::builder::CodeBuilder;
use tablegen_core::GeneratedFile;
use tablegen_schema::Table;

use super::create_table::{drop_table, push_create_table};

/// Plain DDL for every table: drop, create, comments, indexes.
pub struct SchemaSql<'a> {
    tables: &'a [Table],
}

impl<'a> SchemaSql<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        Self { tables }
    }
}

impl GeneratedFile for SchemaSql<'_> {
    fn path(&self) -> String {
        "schema.sql".to_string()
    }

    fn render(&self) -> String {
        let mut b = CodeBuilder::sql();
        for table in self.tables {
            b.push_line(&drop_table(table)).push_blank();
            push_create_table(&mut b, table);
        }
        b.build()
    }
}
