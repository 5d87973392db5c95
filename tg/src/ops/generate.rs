//! Generate operation - artifacts from table definitions.

use std::path::Path;

use eyre::{Context, Result};
use tablegen_codegen::{
    generation::{FileRegistry, Format},
    language::GenerationContext,
};
use tablegen_schema::{Config, Table};
use tracing::info;

use crate::{
    formats,
    reports::{GenerateReport, GenerationResult, PreviewResult, WrittenResult},
};

/// Options for writing generated artifacts.
pub struct OutputOptions<'a> {
    /// Directory the artifact paths are relative to.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Write the registry, or collect it for preview.
pub(crate) fn finish(registry: FileRegistry, opts: &OutputOptions) -> Result<GenerationResult> {
    if opts.dry_run {
        return Ok(GenerationResult::Preview(PreviewResult {
            files: registry.into_artifacts(),
        }));
    }

    let stats = registry
        .write_all(opts.output_dir)
        .wrap_err_with(|| format!("Failed to write to {}", opts.output_dir.display()))?;
    Ok(GenerationResult::Written(WrittenResult {
        output_dir: opts.output_dir.to_path_buf(),
        written: stats.written,
        skipped: stats.skipped,
    }))
}

/// Execute the generate operation.
///
/// Runs each format's generator over the tables. A path produced by more
/// than one format is written once.
pub fn generate(
    tables: &[Table],
    config: &Config,
    formats: &[Format],
    opts: OutputOptions,
) -> Result<GenerateReport> {
    let ctx = GenerationContext::from_config(config);
    let mut registry = FileRegistry::new();

    for &format in formats {
        let artifacts = formats::generator(format)
            .generate(tables, &ctx)
            .wrap_err_with(|| format!("Failed to generate {format}"))?;
        info!(%format, artifacts = artifacts.len(), "generated");
        registry.register_all(artifacts);
    }

    let count = tables.len();
    Ok(GenerateReport {
        subject: format!("{} table{}", count, if count == 1 { "" } else { "s" }),
        formats: formats.iter().map(Format::to_string).collect(),
        result: finish(registry, &opts)?,
    })
}
