//! Shared code generation utilities for the tablegen generators.
//!
//! This crate provides language-agnostic abstractions and utilities
//! used by the format-specific generators (e.g., `tablegen-codegen-java`).
//!
//! # Module Organization
//!
//! - [`builder`] - Indented line and block writer (CodeBuilder)
//! - [`generation`] - Output management (Format, FileRegistry)
//! - [`language`] - Generator trait, generation context, naming conventions
//! - [`snippets`] - VS Code snippet generator
//! - [`testing`] - Test fixtures and helpers (feature-gated)

pub mod builder;
pub mod generation;
pub mod language;
pub mod snippets;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
