use crate::classify::{read_records_file, LcaClassifier, TaxonMapping};
use crate::core::config::{parse_rank_list, Config};
use crate::taxonomy::TaxonId;
use crate::utils::parallel::chunk_size_for_parallelism;
use crate::utils::progress::create_progress_bar;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct LcaArgs {
    /// Taxdump directory or `<prefix>` of `<prefix>_nodes.dmp` etc.
    #[arg(short, long)]
    pub taxonomy: Option<PathBuf>,

    /// Target key to taxon id mapping (two columns)
    #[arg(short, long, value_name = "FILE")]
    pub mapping: PathBuf,

    /// Alignment result, one `query<TAB>target` pair per line
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Classification output
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Ranks to report after the LCA, colon separated (e.g. species:genus)
    #[arg(long)]
    pub lca_ranks: Option<String>,

    /// Taxa whose lineages are ignored, comma separated (0 disables an entry)
    #[arg(long, value_delimiter = ',')]
    pub blacklist: Option<Vec<u32>>,

    /// Append the full lineage to each line
    #[arg(long)]
    pub tax_lineage: bool,
}

pub fn run(args: LcaArgs, config: Config) -> Result<()> {
    let mut lca_config = config.lca.clone();
    if let Some(ranks) = &args.lca_ranks {
        lca_config.ranks = parse_rank_list(ranks);
    }
    if let Some(blacklist) = &args.blacklist {
        lca_config.blacklist = blacklist.iter().copied().map(TaxonId).collect();
    }
    lca_config.tax_lineage |= args.tax_lineage;

    let taxonomy = super::load_taxonomy(args.taxonomy.clone(), &config)?;
    let mapping = TaxonMapping::from_file(&args.mapping)
        .with_context(|| format!("Failed to read mapping {}", args.mapping.display()))?;
    let records = read_records_file(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let classifier = LcaClassifier::new(&taxonomy, &mapping, &lca_config)?;
    let chunk_size = match config.performance.chunk_size {
        0 => chunk_size_for_parallelism(records.len(), 0),
        n => n,
    };

    let progress = create_progress_bar(records.len() as u64, "Computing LCA");
    let (lines, summary) = classifier.classify_records_with_progress(&records, chunk_size, &progress);
    progress.finish_and_clear();

    let mut writer = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("Failed to create {}", args.output.display()))?,
    );
    for line in &lines {
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;

    eprintln!(
        "{} Classified {} of {} records -> {}",
        "✓".green().bold(),
        summary.classified,
        summary.records,
        args.output.display()
    );
    if summary.not_found > 0 {
        eprintln!(
            "{} Taxonomy for {} entries not found out of {}",
            "⚠".yellow().bold(),
            summary.not_found,
            summary.found + summary.not_found
        );
    }
    Ok(())
}
