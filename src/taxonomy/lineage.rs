//! Rank-filtered and full lineage views of a node's ancestor chain

use super::rank::RankTable;
use super::{NcbiTaxonomy, TaxonNode};
use std::collections::BTreeMap;

/// Emitted by [`NcbiTaxonomy::at_ranks`] when no ancestor carries a rank
pub const UNCLASSIFIED: &str = "unclassified";

/// Separator between steps of [`NcbiTaxonomy::tax_lineage`]
pub const LINEAGE_DELIMITER: &str = ";";

/// Walks from a node up to and including the root
pub struct Ancestors<'a> {
    taxonomy: &'a NcbiTaxonomy,
    next: Option<&'a TaxonNode>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TaxonNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.take()?;
        if !node.is_root() {
            self.next = self.taxonomy.taxon_node(node.parent_id);
        }
        Some(node)
    }
}

impl NcbiTaxonomy {
    pub fn ancestors<'a>(&'a self, node: &'a TaxonNode) -> Ancestors<'a> {
        Ancestors {
            taxonomy: self,
            next: Some(node),
        }
    }

    /// For each requested rank, in request order, the closest ancestor of
    /// `node` (itself included) with that rank as `taxid:name`, or
    /// [`UNCLASSIFIED`].
    pub fn at_ranks<S: AsRef<str>>(&self, node: &TaxonNode, ranks: &[S]) -> Vec<String> {
        ranks
            .iter()
            .map(|rank| {
                let rank = rank.as_ref();
                self.ancestors(node)
                    .find(|ancestor| ancestor.rank == rank)
                    .map(|ancestor| format!("{}:{}", ancestor.taxon_id, ancestor.name))
                    .unwrap_or_else(|| UNCLASSIFIED.to_string())
            })
            .collect()
    }

    /// Rank → name for every ancestor with a named rank. The closest
    /// ancestor wins if a rank repeats on the path.
    pub fn all_ranks(&self, node: &TaxonNode) -> BTreeMap<String, String> {
        let ranks = RankTable::global();
        let mut result = BTreeMap::new();
        for ancestor in self.ancestors(node) {
            if ranks.is_named(&ancestor.rank) {
                result
                    .entry(ancestor.rank.clone())
                    .or_insert_with(|| ancestor.name.clone());
            }
        }
        result
    }

    /// `rank:taxid:name` per step from `node` to the root
    pub fn tax_lineage(&self, node: &TaxonNode) -> String {
        self.ancestors(node)
            .map(|n| format!("{}:{}:{}", n.rank, n.taxon_id, n.name))
            .collect::<Vec<_>>()
            .join(LINEAGE_DELIMITER)
    }
}
