pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taxlca",
    version,
    about = "Lowest-common-ancestor taxonomy assignment over NCBI taxdumps",
    long_about = "taxlca assigns one consensus taxon per query from the taxa of its matched \
                  targets, using an Euler-tour index over the NCBI taxonomy for constant-time \
                  LCA queries, and builds clade-count reports from the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign the LCA taxon to every query of an alignment result
    Lca(commands::lca::LcaArgs),

    /// Build a clade-count report from `lca` output
    Report(commands::report::ReportArgs),

    /// Write the default configuration
    Config(commands::config::ConfigArgs),
}
