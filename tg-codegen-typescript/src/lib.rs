//! TypeScript generators for tablegen.
//!
//! # Generated Output
//!
//! - `entities.ts` (`typescript`) - one object type per table
//! - `schemas.ts` (`zod-schema`) - one zod object schema per table
//! - `zod-types.ts` (`zod-type`) - types inferred from those schemas
//! - `models/ts/<Base>Dto.ts` - result interface of a composed query
//!
//! Every property is optional; property order is column order.

mod generator;
mod type_mapper;

pub mod files;

pub use generator::{TypeScriptGenerator, ZodSchemaGenerator, ZodTypeGenerator, query_artifacts};
pub use type_mapper::{TypeScriptTypeMapper, ZodTypeMapper};
