use crate::core::config::Config;
use crate::report::{read_classification_counts, CladeReport};
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args)]
pub struct ReportArgs {
    /// Taxdump directory or `<prefix>` of `<prefix>_nodes.dmp` etc.
    #[arg(short, long)]
    pub taxonomy: Option<PathBuf>,

    /// Output of `taxlca lca`
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Report destination
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Write JSON instead of the tab-separated report
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReportArgs, config: Config) -> Result<()> {
    let taxonomy = super::load_taxonomy(args.taxonomy.clone(), &config)?;

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let counts = read_classification_counts(BufReader::new(file), &args.input.display().to_string())?;

    let report = CladeReport::build(&taxonomy, &counts);
    let contents = if args.json {
        report.to_json()?
    } else {
        report.to_text()
    };
    std::fs::write(&args.output, contents)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    eprintln!(
        "{} Wrote report of {} taxa ({} reads) to {}",
        "✓".green().bold(),
        report.rows.len(),
        report.total,
        args.output.display()
    );
    Ok(())
}
