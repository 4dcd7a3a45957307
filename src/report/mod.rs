//! Kraken-style clade report built from per-taxon classification counts

use crate::taxonomy::{NcbiTaxonomy, TaxonCounts, TaxonId};
use crate::{Result, TaxLcaError};
use serde::Serialize;
use std::fmt::Write;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CladeRow {
    pub taxon_id: TaxonId,
    pub depth: usize,
    pub clade_count: u64,
    pub direct_count: u64,
    pub rank: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CladeReport {
    pub total: u64,
    pub unclassified: u64,
    /// Pre-order, larger clades first among siblings
    pub rows: Vec<CladeRow>,
}

impl CladeReport {
    /// `direct_counts` may use deprecated ids; taxon 0 counts as
    /// unclassified and unknown ids are dropped.
    pub fn build(taxonomy: &NcbiTaxonomy, direct_counts: &TaxonCounts) -> Self {
        let unclassified = direct_counts
            .get(&TaxonId::UNCLASSIFIED)
            .copied()
            .unwrap_or(0);
        let classified: TaxonCounts = direct_counts
            .iter()
            .filter(|(taxon, _)| !taxon.is_unclassified())
            .map(|(&taxon, &count)| (taxon, count))
            .collect();
        let (direct, _dropped) = taxonomy.canonical_counts(&classified);
        let clades = taxonomy.clade_counts(&direct, TaxonId::ROOT);
        let clade_of = |taxon: &TaxonId| clades.get(taxon).copied().unwrap_or(0);

        let mut rows = Vec::new();
        let mut stack = vec![(taxonomy.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let clade_count = clade_of(&node.taxon_id);
            if clade_count == 0 {
                continue;
            }
            rows.push(CladeRow {
                taxon_id: node.taxon_id,
                depth,
                clade_count,
                direct_count: direct.get(&node.taxon_id).copied().unwrap_or(0),
                rank: node.rank.clone(),
                name: node.name.clone(),
            });

            let mut children: Vec<_> = node
                .children
                .iter()
                .filter(|&child| clade_of(child) > 0)
                .filter_map(|&child| taxonomy.taxon_node(child))
                .collect();
            // popped in reverse, so push smallest first
            children.sort_by(|a, b| {
                clade_of(&a.taxon_id)
                    .cmp(&clade_of(&b.taxon_id))
                    .then(b.taxon_id.cmp(&a.taxon_id))
            });
            stack.extend(children.into_iter().map(|child| (child, depth + 1)));
        }

        Self {
            total: unclassified + clade_of(&TaxonId::ROOT),
            unclassified,
            rows,
        }
    }

    fn percent(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }

    /// `percent, clade, direct, rank, taxid, indented name` per row
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.unclassified > 0 {
            let _ = writeln!(
                out,
                "{:.4}\t{}\t{}\tno rank\t0\tunclassified",
                self.percent(self.unclassified),
                self.unclassified,
                self.unclassified
            );
        }
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:.4}\t{}\t{}\t{}\t{}\t{}{}",
                self.percent(row.clade_count),
                row.clade_count,
                row.direct_count,
                row.rank,
                row.taxon_id,
                "  ".repeat(row.depth),
                row.name
            );
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TaxLcaError::Other(format!("Failed to serialize report: {}", e)))
    }
}

/// Count records per taxon from `lca` output (`query<TAB>taxid<TAB>...`).
pub fn read_classification_counts<R: BufRead>(reader: R, file: &str) -> Result<TaxonCounts> {
    let mut counts = TaxonCounts::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 2 {
            return Err(TaxLcaError::MalformedRecord {
                file: file.to_string(),
                line: idx + 1,
                expected: 2,
                found: columns.len(),
            });
        }
        let taxon = columns[1].trim().parse::<u32>().map_err(|e| {
            TaxLcaError::Parse(format!("{} line {}: taxon '{}': {}", file, idx + 1, columns[1], e))
        })?;
        *counts.entry(TaxonId(taxon)).or_insert(0) += 1;
    }
    Ok(counts)
}
