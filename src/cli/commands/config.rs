use crate::core::config::{default_config, save_config};
use anyhow::Result;
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Where to write the configuration
    #[arg(short, long, value_name = "FILE", default_value = "taxlca.toml")]
    pub output: PathBuf,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    save_config(&args.output, &default_config())?;
    eprintln!(
        "{} Wrote default configuration to {}",
        "✓".green().bold(),
        args.output.display()
    );
    Ok(())
}
