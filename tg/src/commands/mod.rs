mod check;
mod completions;
mod generate;
mod init;
mod preview;
mod query;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use init::InitCommand;
use preview::PreviewCommand;
use query::QueryCommand;
use tablegen_schema::{CONFIG_FILE, Config, Delimiter, SchemaFormat, Table};

/// Extension trait for exiting on schema and config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for tablegen_schema::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "tg")]
#[command(version)]
#[command(about = "Generate DDL, TypeScript, zod and Java layers from table definitions")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Preview(cmd) => cmd.run(),
            Commands::Query(cmd) => cmd.run(),
            Commands::Init(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts from a table-definition file
    Generate(GenerateCommand),

    /// Parse a table-definition file and summarize it
    Check(CheckCommand),

    /// Print the table definitions
    Preview(PreviewCommand),

    /// Generate SQL and query code from a query script
    Query(QueryCommand),

    /// Write a default tablegen.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Arguments shared by commands reading a table-definition file.
#[derive(clap::Args)]
pub(crate) struct SchemaArgs {
    /// Table definitions (.tsv, .csv or .json)
    pub schema: PathBuf,

    /// Field separator of delimited input (guessed from the extension by default)
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Config file (defaults to ./tablegen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl SchemaArgs {
    /// Parse the table definitions, exiting with a diagnostic on error.
    pub fn tables(&self) -> Vec<Table> {
        tablegen_schema::parse_file(&self.schema, self.delimiter.map(SchemaFormat::Delimited))
            .unwrap_or_exit()
    }

    /// The given config file, or `tablegen.toml` when present.
    pub fn config(&self) -> Config {
        match &self.config {
            Some(path) => Config::from_file(path).unwrap_or_exit(),
            None => Config::load_or_default(CONFIG_FILE).unwrap_or_exit(),
        }
    }
}
