//! TypeScript file generators.

mod entities_ts;
mod query_dto_ts;
mod schemas_ts;
mod zod_types_ts;

pub use entities_ts::EntitiesTs;
pub use query_dto_ts::QueryDtoTs;
pub use schemas_ts::{SchemasTs, zod_field};
pub use zod_types_ts::ZodTypesTs;

/// `@type <Type> <logical name>` tag for a type's doc comment.
fn type_tag(type_name: &str, logical_name: &str) -> String {
    format!("@type {type_name} {logical_name}")
        .trim_end()
        .to_string()
}
