//! Per-record LCA classification
//!
//! Each record's target keys are mapped to taxa, blacklisted lineages are
//! dropped, and the survivors are reduced to a single LCA. Records are
//! independent, so they are classified in parallel against one shared
//! taxonomy.

pub mod mapping;
pub mod records;

pub use mapping::TaxonMapping;
pub use records::{read_records, read_records_file, Record};

use crate::core::config::LcaConfig;
use crate::taxonomy::{NcbiTaxonomy, TaxonCounts, TaxonId};
use crate::Result;
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::info;

/// Written for records without a usable LCA
pub const FALLBACK_LINE: &str = "0\tno rank\tunclassified\n";

/// Outcome for one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub taxon: Option<TaxonId>,
    /// Targets with a mapping entry
    pub found: usize,
    /// Targets without a mapping entry
    pub not_found: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub records: usize,
    pub classified: usize,
    pub found: usize,
    pub not_found: usize,
    /// Records per assigned taxon; unclassified records under taxon 0
    pub direct_counts: TaxonCounts,
}

pub struct LcaClassifier<'a> {
    taxonomy: &'a NcbiTaxonomy,
    mapping: &'a TaxonMapping,
    blacklist: Vec<TaxonId>,
    ranks: Vec<String>,
    tax_lineage: bool,
}

impl<'a> LcaClassifier<'a> {
    pub fn new(taxonomy: &'a NcbiTaxonomy, mapping: &'a TaxonMapping, config: &LcaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            taxonomy,
            mapping,
            blacklist: config
                .blacklist
                .iter()
                .copied()
                .filter(|taxon| !taxon.is_unclassified())
                .collect(),
            ranks: config.ranks.clone(),
            tax_lineage: config.tax_lineage,
        })
    }

    /// Whether `taxon` lies at or below any blacklisted taxon
    pub fn is_blacklisted(&self, taxon: TaxonId) -> bool {
        self.blacklist
            .iter()
            .any(|&blocked| self.taxonomy.is_ancestor(blocked, taxon))
    }

    pub fn classify(&self, targets: &[u32]) -> Classification {
        let mut found = 0;
        let mut not_found = 0;
        let mut taxa = Vec::with_capacity(targets.len());

        for &target in targets {
            let Some(taxon) = self.mapping.lookup(target) else {
                not_found += 1;
                continue;
            };
            found += 1;
            if !self.is_blacklisted(taxon) {
                taxa.push(taxon);
            }
        }

        Classification {
            taxon: self.taxonomy.lca(&taxa).map(|node| node.taxon_id),
            found,
            not_found,
        }
    }

    /// `taxid<TAB>rank<TAB>name[<TAB>ranks][<TAB>lineage]\n`, or
    /// [`FALLBACK_LINE`].
    pub fn format(&self, classification: &Classification) -> String {
        let Some(node) = classification
            .taxon
            .and_then(|taxon| self.taxonomy.taxon_node(taxon))
        else {
            return FALLBACK_LINE.to_string();
        };

        let mut line = format!("{}\t{}\t{}", node.taxon_id, node.rank, node.name);
        if !self.ranks.is_empty() {
            line.push('\t');
            line.push_str(&self.taxonomy.at_ranks(node, &self.ranks).join(":"));
        }
        if self.tax_lineage {
            line.push('\t');
            line.push_str(&self.taxonomy.tax_lineage(node));
        }
        line.push('\n');
        line
    }

    /// Classify `records` in parallel. Output lines keep input order and are
    /// prefixed with the record key.
    pub fn classify_records(&self, records: &[Record], chunk_size: usize) -> (Vec<String>, ClassificationSummary) {
        self.classify_records_with_progress(records, chunk_size, &ProgressBar::hidden())
    }

    /// As [`classify_records`](Self::classify_records), advancing `progress`
    /// once per record.
    pub fn classify_records_with_progress(
        &self,
        records: &[Record],
        chunk_size: usize,
        progress: &ProgressBar,
    ) -> (Vec<String>, ClassificationSummary) {
        let results: Vec<(String, Classification)> = records
            .par_iter()
            .with_min_len(chunk_size.max(1))
            .map(|record| {
                let classification = self.classify(&record.targets);
                let line = format!("{}\t{}", record.key, self.format(&classification));
                progress.inc(1);
                (line, classification)
            })
            .collect();

        let mut summary = ClassificationSummary {
            records: records.len(),
            ..Default::default()
        };
        let mut lines = Vec::with_capacity(results.len());
        for (line, classification) in results {
            summary.found += classification.found;
            summary.not_found += classification.not_found;
            let taxon = classification.taxon.unwrap_or(TaxonId::UNCLASSIFIED);
            if classification.taxon.is_some() {
                summary.classified += 1;
            }
            *summary.direct_counts.entry(taxon).or_insert(0) += 1;
            lines.push(line);
        }

        info!(
            "Taxonomy for {} entries not found out of {}",
            summary.not_found,
            summary.found + summary.not_found
        );
        (lines, summary)
    }
}
