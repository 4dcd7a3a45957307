//! Canonical ordering of NCBI rank labels

use crate::{Result, TaxLcaError};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const NO_RANK: &str = "no rank";

/// Recognised ranks from most to least specific. `no rank` sits below all of
/// them.
const ORDERED_RANKS: &[&str] = &[
    "forma",
    "varietas",
    "subspecies",
    "species",
    "species subgroup",
    "species group",
    "subgenus",
    "genus",
    "subtribe",
    "tribe",
    "subfamily",
    "family",
    "superfamily",
    "parvorder",
    "infraorder",
    "suborder",
    "order",
    "superorder",
    "infraclass",
    "subclass",
    "class",
    "superclass",
    "subphylum",
    "phylum",
    "superphylum",
    "subkingdom",
    "kingdom",
    "superkingdom",
];

static RANK_TABLE: Lazy<RankTable> = Lazy::new(RankTable::build);

/// Label → level mapping, built once and shared
#[derive(Debug)]
pub struct RankTable {
    levels: HashMap<&'static str, u8>,
}

impl RankTable {
    fn build() -> Self {
        let mut levels = HashMap::with_capacity(ORDERED_RANKS.len() + 2);
        levels.insert(NO_RANK, 0);
        for (idx, rank) in ORDERED_RANKS.iter().enumerate() {
            levels.insert(*rank, idx as u8 + 1);
        }
        // NCBI renamed superkingdom to domain in 2025 dumps
        let superkingdom = levels["superkingdom"];
        levels.insert("domain", superkingdom);
        Self { levels }
    }

    pub fn global() -> &'static RankTable {
        &RANK_TABLE
    }

    /// Level of `rank`, higher is less specific; `no rank` is 0.
    fn level(&self, rank: &str) -> Option<u8> {
        self.levels.get(rank).copied()
    }

    pub fn is_recognized(&self, rank: &str) -> bool {
        self.level(rank).is_some()
    }

    /// A recognised rank other than `no rank`
    pub fn is_named(&self, rank: &str) -> bool {
        self.level(rank).is_some_and(|level| level > 0)
    }

    /// Reject labels that no node can ever carry.
    pub fn validate<S: AsRef<str>>(&self, ranks: &[S]) -> Result<()> {
        let unknown: Vec<&str> = ranks
            .iter()
            .map(AsRef::as_ref)
            .filter(|rank| !self.is_recognized(rank))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(TaxLcaError::Config(format!(
                "unknown taxonomic rank(s): {}",
                unknown.join(", ")
            )))
        }
    }
}
