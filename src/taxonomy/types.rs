//! Taxonomy identifier and node types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomy ID type - newtype pattern for type safety
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(pub u32);

impl TaxonId {
    pub const UNCLASSIFIED: Self = Self(0);
    pub const ROOT: Self = Self(1);

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    pub fn is_unclassified(&self) -> bool {
        *self == Self::UNCLASSIFIED
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the dense node table.
///
/// `id` is the row number; `parent_id` and `children` refer to other rows
/// by their external taxon identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonNode {
    pub id: usize,
    pub taxon_id: TaxonId,
    pub parent_id: TaxonId,
    pub rank: String,
    pub name: String,
    pub children: Vec<TaxonId>,
}

impl TaxonNode {
    pub fn new(id: usize, taxon_id: TaxonId, parent_id: TaxonId, rank: impl Into<String>) -> Self {
        Self {
            id,
            taxon_id,
            parent_id,
            rank: rank.into(),
            name: String::new(),
            children: Vec::new(),
        }
    }

    /// The root is its own parent.
    pub fn is_root(&self) -> bool {
        self.taxon_id == self.parent_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxon_id_constants() {
        assert!(TaxonId::ROOT.is_root());
        assert!(TaxonId::UNCLASSIFIED.is_unclassified());
        assert_eq!(TaxonId(9606).to_string(), "9606");
    }

    #[test]
    fn test_taxon_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&TaxonId(2)).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn test_root_node_self_loop() {
        let root = TaxonNode::new(0, TaxonId::ROOT, TaxonId::ROOT, "no rank");
        let child = TaxonNode::new(1, TaxonId(2), TaxonId::ROOT, "superkingdom");
        assert!(root.is_root());
        assert!(!child.is_root());
        assert!(child.name.is_empty());
    }
}
