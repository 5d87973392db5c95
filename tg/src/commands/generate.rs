use std::path::PathBuf;

use clap::Args;
use eyre::{Result, eyre};
use tablegen_codegen::generation::Format;

use super::SchemaArgs;
use crate::{
    ops::{self, generate::OutputOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Formats to generate (defaults to export.defaultFormats)
    #[arg(short, long = "format", value_name = "FORMAT")]
    pub formats: Vec<Format>,

    /// Output directory
    #[arg(short, long, default_value = "generated")]
    pub output: PathBuf,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let tables = self.schema.tables();
        let config = self.schema.config();

        let formats = if self.formats.is_empty() {
            Format::parse_list(config.export.default_formats.iter().map(String::as_str))
                .map_err(|e| eyre!("export.defaultFormats: {e}"))?
        } else {
            let mut formats = Vec::new();
            for &format in &self.formats {
                if !formats.contains(&format) {
                    formats.push(format);
                }
            }
            formats
        };

        let report = ops::generate(
            &tables,
            &config,
            &formats,
            OutputOptions {
                output_dir: &self.output,
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
