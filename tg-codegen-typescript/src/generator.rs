//! TypeScript generators.

use eyre::Result;
use tablegen_codegen::{
    generation::Format,
    language::{GenerationContext, Generator},
};
use tablegen_core::{Artifact, GeneratedFile};
use tablegen_query::QueryPlan;
use tablegen_schema::Table;
use tracing::debug;

use crate::files::{EntitiesTs, QueryDtoTs, SchemasTs, ZodTypesTs};

/// Generator for the `typescript` format (`entities.ts`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl Generator for TypeScriptGenerator {
    fn format(&self) -> Format {
        Format::TypeScript
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), "generating TypeScript types");
        Ok(vec![EntitiesTs::new(tables).to_artifact()])
    }
}

/// Generator for the `zod-schema` format (`schemas.ts`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodSchemaGenerator;

impl Generator for ZodSchemaGenerator {
    fn format(&self) -> Format {
        Format::ZodSchema
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        debug!(tables = tables.len(), "generating zod schemas");
        Ok(vec![SchemasTs::new(tables).to_artifact()])
    }
}

/// Generator for the `zod-type` format (`zod-types.ts`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodTypeGenerator;

impl Generator for ZodTypeGenerator {
    fn format(&self) -> Format {
        Format::ZodType
    }

    fn generate(&self, tables: &[Table], _ctx: &GenerationContext) -> Result<Vec<Artifact>> {
        Ok(vec![ZodTypesTs::new(tables).to_artifact()])
    }
}

/// TypeScript artifacts of a query: the result DTO interface.
pub fn query_artifacts(plan: &QueryPlan) -> Vec<Artifact> {
    vec![QueryDtoTs::new(plan).to_artifact()]
}
