//! PostgreSQL DDL generator for tablegen.
//!
//! # Generated Output
//!
//! - `schema.sql` (`ddl`) - drop/create statements, comments and indexes
//! - `evolutions/1.sql` (`ddl-play`) - the same schema as a Play evolution

mod column_type;
mod generator;

pub mod files;

pub use column_type::render_column_type;
pub use generator::{DdlGenerator, PlayEvolutionGenerator};
