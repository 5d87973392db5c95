use clap::Args;
use eyre::Result;

use super::SchemaArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Also show the columns every table shares
    #[arg(long)]
    pub all_columns: bool,

    /// Only tables whose name or logical name contains this text
    #[arg(short, long)]
    pub table: Option<String>,
}

impl PreviewCommand {
    pub fn run(&self) -> Result<()> {
        let tables = self.schema.tables();
        let config = self.schema.config();

        let report = ops::preview(&tables, &config, self.all_columns, self.table.as_deref());
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
