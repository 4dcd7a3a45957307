pub mod classify;
pub mod cli;
pub mod core;
pub mod report;
pub mod taxonomy;
pub mod utils;

pub use crate::taxonomy::{DumpFiles, NcbiTaxonomy, TaxonId, TaxonNode};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxLcaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Taxonomy dump not found: {}", path.display())]
    MissingDump { path: PathBuf },

    #[error("Malformed record in {file} line {line}: expected at least {expected} fields, found {found}")]
    MalformedRecord {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown taxon: {0}")]
    UnknownTaxon(TaxonId),

    #[error("Invalid taxonomy tree: {0}")]
    InvalidTree(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TaxLcaError>;
