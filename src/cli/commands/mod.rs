pub mod config;
pub mod lca;
pub mod report;

use crate::core::config::Config;
use crate::taxonomy::{DumpFiles, NcbiTaxonomy};
use crate::utils::progress::create_spinner;
use crate::TaxLcaError;
use std::path::PathBuf;

/// Load the taxonomy named on the command line or in the config file
pub(crate) fn load_taxonomy(path: Option<PathBuf>, config: &Config) -> anyhow::Result<NcbiTaxonomy> {
    let path = path
        .or_else(|| config.taxonomy.dump.clone())
        .ok_or_else(|| TaxLcaError::Config("no taxonomy dump given (--taxonomy or [taxonomy] dump)".into()))?;
    let files = DumpFiles::locate(&path)?;

    let spinner = create_spinner("Loading NCBI taxonomy");
    let taxonomy = NcbiTaxonomy::from_dump_files(&files);
    match &taxonomy {
        Ok(t) => spinner.finish_with_message(format!("Loaded {} taxa", t.len())),
        Err(_) => spinner.finish_and_clear(),
    }
    Ok(taxonomy?)
}
