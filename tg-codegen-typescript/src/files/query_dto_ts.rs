//! models/ts/<Base>Dto.ts generator for query results.

use tablegen_codegen::{builder::CodeBuilder, language::NamingConvention};
use tablegen_core::{GeneratedFile, TypeMapper};
use tablegen_query::QueryPlan;

use crate::type_mapper::TypeScriptTypeMapper;

/// TypeScript interface of a query's result columns.
pub struct QueryDtoTs<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryDtoTs<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }
}

impl GeneratedFile for QueryDtoTs<'_> {
    fn path(&self) -> String {
        format!("models/ts/{}.ts", self.plan.dto_name())
    }

    fn render(&self) -> String {
        let naming = NamingConvention::TYPESCRIPT;
        let mut b = CodeBuilder::typescript();
        b.push_doc_block(["SQL query result DTO"]);
        b.push_block(
            &format!("export interface {} {{", self.plan.dto_name()),
            "}",
            |b| {
                for col in &self.plan.columns {
                    let ty = col
                        .sql_type()
                        .map_or("any", |ty| TypeScriptTypeMapper.map_type(ty));
                    if !col.logical_name().is_empty() {
                        b.push_jsdoc(col.logical_name());
                    }
                    b.push_line(&format!("{}?: {ty};", naming.field_name(&col.name)));
                }
            },
        );
        b.build()
    }
}
