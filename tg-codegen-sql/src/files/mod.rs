//! DDL file generators.

mod create_table;
mod play_evolution;
mod schema_sql;

pub use play_evolution::PlayEvolution;
pub use schema_sql::SchemaSql;
