use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use tablegen_query::QueryScript;

use super::SchemaArgs;
use crate::{
    ops::{self, generate::OutputOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct QueryCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Query script (TOML: tables, filters, sorts, limit, offset, select)
    pub script: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "generated")]
    pub output: PathBuf,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl QueryCommand {
    pub fn run(&self) -> Result<()> {
        let tables = self.schema.tables();
        let config = self.schema.config();

        let content = std::fs::read_to_string(&self.script)
            .wrap_err_with(|| format!("Failed to read {}", self.script.display()))?;
        let script: QueryScript = toml::from_str(&content)
            .wrap_err_with(|| format!("Invalid query script {}", self.script.display()))?;

        let report = ops::query(
            &tables,
            &config,
            &script,
            OutputOptions {
                output_dir: &self.output,
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
