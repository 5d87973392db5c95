//! Language-agnostic code generation traits.

use eyre::Result;
use tablegen_core::Artifact;
use tablegen_schema::Table;

use super::GenerationContext;
use crate::generation::Format;

/// Trait for artifact generators.
///
/// A generator turns the table list into text artifacts. It never
/// executes or validates what it emits, and an empty table list yields
/// artifacts without per-table content.
pub trait Generator {
    /// Format identifier this generator produces
    fn format(&self) -> Format;

    /// Generate all artifacts for the given tables
    fn generate(&self, tables: &[Table], ctx: &GenerationContext) -> Result<Vec<Artifact>>;
}
