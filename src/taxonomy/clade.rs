//! Bottom-up summation of per-taxon counts over subtrees

use super::{NcbiTaxonomy, TaxonId};
use std::collections::HashMap;
use tracing::warn;

pub type TaxonCounts = HashMap<TaxonId, u64>;

impl NcbiTaxonomy {
    /// Cumulative count for every node below (and including) `root`.
    ///
    /// Each node's entry is its own direct count plus the entries of its
    /// children; nodes without a direct count still appear. An unknown
    /// `root` yields an empty map.
    pub fn clade_counts(&self, direct: &TaxonCounts, root: TaxonId) -> TaxonCounts {
        let mut clades = TaxonCounts::new();
        self.clade_counts_into(direct, root, &mut clades);
        clades
    }

    /// As [`clade_counts`](Self::clade_counts), writing into a caller-owned
    /// map. Returns the aggregate at `root`.
    pub fn clade_counts_into(&self, direct: &TaxonCounts, root: TaxonId, clades: &mut TaxonCounts) -> u64 {
        let Some(root_row) = self.node_id(root) else {
            return 0;
        };

        // Post-order with an explicit stack; (row, children already pushed)
        let mut stack = vec![(root_row, false)];
        while let Some((row, expanded)) = stack.pop() {
            let node = self.node(row);
            if expanded {
                let below: u64 = node
                    .children
                    .iter()
                    .map(|child| clades.get(child).copied().unwrap_or(0))
                    .sum();
                let own = direct.get(&node.taxon_id).copied().unwrap_or(0);
                clades.insert(node.taxon_id, own + below);
            } else {
                stack.push((row, true));
                stack.extend(
                    node.children
                        .iter()
                        .filter_map(|&child| self.node_id(child))
                        .map(|child| (child, false)),
                );
            }
        }

        clades
            .get(&self.node(root_row).taxon_id)
            .copied()
            .unwrap_or(0)
    }

    /// Re-key `counts` by current taxon id, merging deprecated ids into their
    /// replacement. Returns the canonical map and the total count that was
    /// dropped because its id is unknown.
    pub fn canonical_counts(&self, counts: &TaxonCounts) -> (TaxonCounts, u64) {
        let mut canonical = TaxonCounts::with_capacity(counts.len());
        let mut dropped = 0u64;
        let mut unknown = 0usize;

        for (&taxon, &count) in counts {
            match self.resolve(taxon) {
                Some(current) => *canonical.entry(current).or_insert(0) += count,
                None => {
                    dropped += count;
                    unknown += 1;
                }
            }
        }

        if unknown > 0 {
            warn!(
                "{} taxa not found in taxonomy, dropping {} counts",
                unknown, dropped
            );
        }
        (canonical, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::test_support::small;

    fn counts(pairs: &[(u32, u64)]) -> TaxonCounts {
        pairs.iter().map(|&(t, c)| (TaxonId(t), c)).collect()
    }

    #[test]
    fn test_clade_counts_leaves_only() {
        let tax = small();
        let clades = tax.clade_counts(&counts(&[(10, 3), (20, 5)]), TaxonId::ROOT);

        assert_eq!(clades[&TaxonId(10)], 3);
        assert_eq!(clades[&TaxonId(20)], 5);
        assert_eq!(clades[&TaxonId(2)], 8);
        assert_eq!(clades[&TaxonId(1)], 8);
        // every visited node has an entry
        assert_eq!(clades[&TaxonId(3)], 0);
        assert_eq!(clades.len(), tax.len());
    }

    #[test]
    fn test_clade_counts_internal_direct_counts() {
        let tax = small();
        let clades = tax.clade_counts(&counts(&[(1, 1), (3, 2), (31, 4), (10, 1)]), TaxonId::ROOT);

        assert_eq!(clades[&TaxonId(31)], 4);
        assert_eq!(clades[&TaxonId(30)], 4);
        assert_eq!(clades[&TaxonId(3)], 6);
        assert_eq!(clades[&TaxonId(1)], 8);
    }

    #[test]
    fn test_clade_counts_subtree_root() {
        let tax = small();
        let mut clades = TaxonCounts::new();
        let total = tax.clade_counts_into(&counts(&[(10, 3), (31, 4)]), TaxonId(3), &mut clades);

        assert_eq!(total, 4);
        assert_eq!(clades.len(), 3);
        assert!(!clades.contains_key(&TaxonId(10)));
    }

    #[test]
    fn test_clade_counts_unknown_root() {
        let tax = small();
        assert!(tax.clade_counts(&counts(&[(10, 3)]), TaxonId(404)).is_empty());
    }

    #[test]
    fn test_canonical_counts() {
        let tax = small();
        let (canonical, dropped) = tax.canonical_counts(&counts(&[(7, 2), (10, 3), (404, 9)]));

        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical[&TaxonId(10)], 5);
        assert_eq!(dropped, 9);
    }
}
