//! Core utilities and types for the tablegen schema generator.
//!
//! This crate provides fundamental types and utilities used across
//! the tablegen crates: source type classification, case conversion
//! and generated artifacts.

mod file;
mod type_mapper;
mod utils;

// File operations
pub use file::{Artifact, GeneratedFile, Overwrite, WriteResult};
// Type classification
pub use type_mapper::{Precision, SqlType, TypeMapper};
// String utilities
pub use utils::{
    contains_any_keyword, java_string_literal, sql_string_literal, to_camel_case, to_pascal_case,
};
