//! Statements shared by the DDL files.

use tablegen_codegen::builder::CodeBuilder;
use tablegen_core::sql_string_literal;
use tablegen_schema::{Column, Table};

use crate::render_column_type;

/// Separator written after each table.
pub(crate) const TABLE_SEPARATOR: &str = "-- --------------------------------------------------";

/// `DROP TABLE IF EXISTS <table>;`
pub(crate) fn drop_table(table: &Table) -> String {
    format!("DROP TABLE IF EXISTS {};", table.table_name)
}

/// CREATE TABLE, comments and indexes of one table, then the separator.
pub(crate) fn push_create_table(b: &mut CodeBuilder, table: &Table) {
    let name = &table.table_name;

    let mut defs: Vec<String> = table.columns.iter().map(column_def).collect();

    let pk: Vec<&str> = table.primary_keys().map(|c| c.col_name.as_str()).collect();
    if !pk.is_empty() {
        defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }

    let ak: Vec<&str> = table.alternate_keys().map(|c| c.col_name.as_str()).collect();
    if !ak.is_empty() {
        defs.push(format!("CONSTRAINT {name}_ak UNIQUE ({})", ak.join(", ")));
    }

    b.push_line(&format!("CREATE TABLE {name} ("));
    b.push_indent();
    let last = defs.len().saturating_sub(1);
    for (i, def) in defs.iter().enumerate() {
        if i == last {
            b.push_line(def);
        } else {
            b.push_line(&format!("{def},"));
        }
    }
    b.push_dedent();
    b.push_line(");").push_blank();

    b.push_line(&format!(
        "COMMENT ON TABLE {name} IS {};",
        sql_string_literal(&table.table_name_jp)
    ));
    for col in &table.columns {
        b.push_line(&format!(
            "COMMENT ON COLUMN {name}.{} IS {};",
            col.col_name,
            sql_string_literal(&col.col_name_jp)
        ));
    }
    b.push_blank();

    for (key, members) in &table.indexes {
        let columns: Vec<&str> = members.iter().map(|m| m.col_name.as_str()).collect();
        b.push_line(&format!(
            "CREATE INDEX {name}_{} ON {name} ({});",
            key.to_lowercase(),
            columns.join(", ")
        ));
    }

    b.push_blank().push_line(TABLE_SEPARATOR).push_blank();
}

fn column_def(col: &Column) -> String {
    let mut def = format!("{} {}", col.col_name, render_column_type(col));
    if col.is_not_null() {
        def.push_str(" NOT NULL");
    }
    if col.is_unique() {
        def.push_str(" UNIQUE");
    }
    if let Some(default) = col.default_value() {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    def
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_def() {
        let col = Column::new("email", "", "varchar")
            .with_length("255")
            .with_constraint("NN, U")
            .with_default("''");
        assert_eq!(column_def(&col), "email VARCHAR(255) NOT NULL UNIQUE DEFAULT ''");
    }

    #[test]
    fn test_composite_primary_key() {
        let table = Table::new("user_roles", "")
            .with_column(Column::new("user_id", "", "bigint").with_pkfk("PK/FK"))
            .with_column(Column::new("role_id", "", "bigint").with_pkfk("PK,FK"));
        let mut b = CodeBuilder::sql();
        push_create_table(&mut b, &table);
        let ddl = b.build();
        assert_eq!(ddl.matches("PRIMARY KEY").count(), 1);
        assert!(ddl.contains("    PRIMARY KEY (user_id, role_id)\n);"));
    }
}
