//! DDL generators.

use eyre::Result;
use tablegen_codegen::{
    generation::Format,
    language::{GenerationContext, Generator},
};
use tablegen_core::{Artifact, GeneratedFile};
use tablegen_schema::Table;
use tracing::debug;

use crate::files::{PlayEvolution, SchemaSql};

/// Generator for the `ddl` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlGenerator;

impl Generator for DdlGenerator {
    fn format(&self) -> Format {
        Format::Ddl
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), "generating DDL");
        Ok(vec![SchemaSql::new(tables).to_artifact()])
    }
}

/// Generator for the `ddl-play` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayEvolutionGenerator;

impl Generator for PlayEvolutionGenerator {
    fn format(&self) -> Format {
        Format::DdlPlay
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        Ok(vec![PlayEvolution::new(tables).to_artifact()])
    }
}
