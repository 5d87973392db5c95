//! Java file generators.

mod base_model;
mod base_repository;
mod controller;
mod model;
mod query;
mod repository;
mod rls;
mod service;
mod support;

pub use base_model::BaseModelJava;
pub use base_repository::BaseRepositoryJava;
pub use controller::ControllerJava;
pub use model::ModelJava;
pub use query::{QueryControllerJava, QueryDtoJava, QueryRepositoryJava, QueryServiceJava};
pub use repository::RepositoryJava;
pub use rls::{RlsAwareJava, SessionInfoJava};
pub use service::ServiceJava;
pub use support::{DatabaseExecutionContextJava, OptimisticLockExceptionJava};

use tablegen_codegen::{builder::CodeBuilder, language::NamingConvention};
use tablegen_core::{TypeMapper, to_pascal_case};
use tablegen_schema::{Column, Table};

use crate::type_mapper::JavaTypeMapper;

const NAMING: NamingConvention = NamingConvention::JAVA;

/// Logical name of a table, falling back to its physical name.
fn logical_name(table: &Table) -> &str {
    if table.table_name_jp.is_empty() {
        &table.table_name
    } else {
        &table.table_name_jp
    }
}

/// Multi-line doc comment from mixed owned and borrowed lines.
fn push_doc(b: &mut CodeBuilder, lines: &[&str]) {
    b.push_doc_block(lines.iter().copied());
}

fn java_type(col: &Column) -> &'static str {
    JavaTypeMapper.map_type(col.sql_type())
}

fn java_import(col: &Column) -> Option<&'static str> {
    JavaTypeMapper::import(col.sql_type())
}

/// `getUserName` for `user_name`.
fn getter(column: &str) -> String {
    format!("get{}", NAMING.accessor_suffix(column))
}

/// `setUserName` for `user_name`.
fn setter(column: &str) -> String {
    format!("set{}", NAMING.accessor_suffix(column))
}

/// Lombok getter of a primitive `boolean` field: `isAdmin` stays
/// `isAdmin`, `admin` becomes `isAdmin`.
fn boolean_getter(field: &str) -> String {
    match field.strip_prefix("is") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => field.to_string(),
        _ => format!("is{}", to_pascal_case(field)),
    }
}

/// Columns with a `findBy<Column>` lookup: alternate keys and unique
/// columns that are not primary keys, each once.
fn lookup_columns(table: &Table) -> Vec<&Column> {
    let mut columns: Vec<&Column> = Vec::new();
    for col in &table.columns {
        let candidate = (col.is_alternate_key() || col.is_unique()) && !col.is_primary_key();
        if candidate && !columns.iter().any(|c| c.col_name == col.col_name) {
            columns.push(col);
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(getter("user_name"), "getUserName");
        assert_eq!(setter("id"), "setId");
        assert_eq!(boolean_getter("isAdmin"), "isAdmin");
        assert_eq!(boolean_getter("admin"), "isAdmin");
        assert_eq!(boolean_getter("issuer"), "isIssuer");
    }

    #[test]
    fn test_lookup_columns() {
        let table = Table::new("users", "")
            .with_column(Column::new("id", "", "bigserial").with_pkfk("PK").with_constraint("U"))
            .with_column(Column::new("code", "", "char").with_pkfk("AK").with_constraint("U"))
            .with_column(Column::new("email", "", "varchar").with_constraint("NN, U"))
            .with_column(Column::new("name", "", "varchar"));
        let names: Vec<_> = lookup_columns(&table)
            .iter()
            .map(|c| c.col_name.as_str())
            .collect();
        assert_eq!(names, ["code", "email"]);
        assert_eq!(logical_name(&table), "users");
    }
}
