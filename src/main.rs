use clap::Parser;
use colored::*;
use std::process;
use taxlca::cli::{Cli, Commands};
use taxlca::core::config::{load_config, Config};
use taxlca::utils::parallel::configure_thread_pool;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG wins, then TAXLCA_LOG
    let log_level = std::env::var("TAXLCA_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<taxlca::TaxLcaError>() {
            Some(taxlca::TaxLcaError::Config(_)) => 2,
            Some(taxlca::TaxLcaError::Io(_)) | Some(taxlca::TaxLcaError::MissingDump { .. }) => 3,
            Some(taxlca::TaxLcaError::Parse(_))
            | Some(taxlca::TaxLcaError::MalformedRecord { .. })
            | Some(taxlca::TaxLcaError::InvalidTree(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let threads = cli.threads.unwrap_or(config.performance.threads);
    let threads = configure_thread_pool(threads)?;
    if cli.verbose > 0 {
        eprintln!("Using {} threads", threads);
    }

    match cli.command {
        Commands::Lca(args) => taxlca::cli::commands::lca::run(args, config),
        Commands::Report(args) => taxlca::cli::commands::report::run(args, config),
        Commands::Config(args) => taxlca::cli::commands::config::run(args),
    }
}
