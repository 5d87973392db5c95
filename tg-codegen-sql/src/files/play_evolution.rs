//! Play Framework evolution script generator.

use tablegen_codegen::builder::CodeBuilder;
use tablegen_core::GeneratedFile;
use tablegen_schema::Table;

use super::create_table::{drop_table, push_create_table};

/// The schema as `evolutions/1.sql`. Tables are dropped in reverse order.
pub struct PlayEvolution<'a> {
    tables: &'a [Table],
}

impl<'a> PlayEvolution<'a> {
    pub fn new(tables: &'a [Table]) -> Self {
        Self { tables }
    }
}

impl GeneratedFile for PlayEvolution<'_> {
    fn path(&self) -> String {
        "evolutions/1.sql".to_string()
    }

    fn render(&self) -> String {
        let mut b = CodeBuilder::sql();
        b.push_line("# --- !Ups").push_blank();
        for table in self.tables {
            push_create_table(&mut b, table);
        }

        b.push_line("# --- !Downs").push_blank();
        for table in self.tables.iter().rev() {
            b.push_line(&drop_table(table));
        }
        b.build()
    }
}
