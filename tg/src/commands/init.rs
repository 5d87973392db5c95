use std::path::{Path, PathBuf};

use clap::Args;
use dialoguer::{Confirm, theme::ColorfulTheme};
use eyre::{Context, Result};
use tablegen_schema::{CONFIG_FILE, Config};

#[derive(Args)]
pub struct InitCommand {
    /// Directory to write tablegen.toml into
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing tablegen.toml without asking
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);

        if path.exists() && !self.force && !Self::confirm_overwrite(&path)? {
            println!("Kept existing {}", path.display());
            return Ok(());
        }

        let content = Config::default()
            .to_toml_string()
            .wrap_err("Failed to render the default config")?;
        std::fs::create_dir_all(&self.dir)
            .wrap_err_with(|| format!("Failed to create {}", self.dir.display()))?;
        std::fs::write(&path, content)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        println!("Created {}", path.display());
        println!();
        println!("Next steps:");
        println!("  tg check <tables.tsv>");
        println!("  tg generate <tables.tsv>");

        Ok(())
    }

    fn confirm_overwrite(path: &Path) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} exists. Overwrite it?", path.display()))
            .default(false)
            .interact()
            .wrap_err("Failed to get confirmation")
    }
}
