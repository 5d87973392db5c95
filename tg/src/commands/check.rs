use clap::Args;
use eyre::Result;

use super::SchemaArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let tables = self.schema.tables();

        let report = ops::check(&tables, &self.schema.schema);
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
