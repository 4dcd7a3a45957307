/// Pairwise and multi-taxon LCA plus ancestor tests on top of the Euler index
use super::{NcbiTaxonomy, TaxonId, TaxonNode};

impl NcbiTaxonomy {
    /// LCA of two taxa, `None` if either id is unknown
    pub fn lca_pair(&self, a: TaxonId, b: TaxonId) -> Option<TaxonId> {
        let a = self.node_id(a)?;
        let b = self.node_id(b)?;
        Some(self.node(self.index().lca(a, b)).taxon_id)
    }

    /// LCA of every id that resolves; unknown ids are skipped.
    ///
    /// Returns `None` when nothing in `taxa` resolves.
    pub fn lca(&self, taxa: &[TaxonId]) -> Option<&TaxonNode> {
        let index = self.index();
        taxa.iter()
            .filter_map(|&taxon| self.node_id(taxon))
            .reduce(|acc, row| index.lca(acc, row))
            .map(|row| self.node(row))
    }

    /// True iff `ancestor` is `child` or lies on `child`'s path to the root.
    /// Unknown ids on either side are never ancestors.
    pub fn is_ancestor(&self, ancestor: TaxonId, child: TaxonId) -> bool {
        match (self.node_id(ancestor), self.node_id(child)) {
            (Some(ancestor), Some(child)) => {
                ancestor == child || self.index().lca(ancestor, child) == ancestor
            }
            _ => false,
        }
    }
}
