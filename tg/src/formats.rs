//! Format dispatch.
//!
//! Centralizes the mapping from format identifiers to generators.

use tablegen_codegen::{generation::Format, language::Generator, snippets::VscodeSnippetsGenerator};
use tablegen_codegen_java::{
    JavaControllerGenerator, JavaModelGenerator, JavaRepoGenerator, JavaServiceGenerator,
};
use tablegen_codegen_sql::{DdlGenerator, PlayEvolutionGenerator};
use tablegen_codegen_typescript::{TypeScriptGenerator, ZodSchemaGenerator, ZodTypeGenerator};

/// Create the generator for `format`.
pub fn generator(format: Format) -> Box<dyn Generator> {
    match format {
        Format::Ddl => Box::new(DdlGenerator),
        Format::DdlPlay => Box::new(PlayEvolutionGenerator),
        Format::TypeScript => Box::new(TypeScriptGenerator),
        Format::ZodSchema => Box::new(ZodSchemaGenerator),
        Format::ZodType => Box::new(ZodTypeGenerator),
        Format::JavaModel => Box::new(JavaModelGenerator),
        Format::JavaRepo => Box::new(JavaRepoGenerator),
        Format::JavaService => Box::new(JavaServiceGenerator),
        Format::JavaController => Box::new(JavaControllerGenerator),
        Format::VscodeSnippets => Box::new(VscodeSnippetsGenerator),
    }
}
