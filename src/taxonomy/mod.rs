//! NCBI taxonomy with constant-time LCA queries
//!
//! Built once from a taxdump (`nodes.dmp`, `names.dmp`, `merged.dmp`) and
//! read-only afterwards, so a single instance can be shared between rayon
//! workers without locking.

pub mod clade;
pub mod dump;
pub mod euler;
pub mod lca;
pub mod lineage;
mod loader;
pub mod rank;
pub mod types;

pub use clade::TaxonCounts;
pub use dump::DumpFiles;
pub use euler::EulerTourIndex;
pub use lineage::{Ancestors, LINEAGE_DELIMITER, UNCLASSIFIED};
pub use rank::RankTable;
pub use types::{TaxonId, TaxonNode};

use crate::{Result, TaxLcaError};
use loader::{NodeTable, NO_ROW};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct NcbiTaxonomy {
    nodes: Vec<TaxonNode>,
    /// taxon id → row, with deprecated ids aliased to their replacement
    rows: Vec<u32>,
    merged: HashMap<TaxonId, TaxonId>,
    index: EulerTourIndex,
}

impl NcbiTaxonomy {
    /// Load the three dump files and build the LCA index.
    pub fn from_dump_files(files: &DumpFiles) -> Result<Self> {
        let open = |path: &Path| -> Result<BufReader<File>> {
            let file = File::open(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TaxLcaError::MissingDump {
                        path: path.to_path_buf(),
                    }
                } else {
                    TaxLcaError::Io(e)
                }
            })?;
            Ok(BufReader::new(file))
        };

        Self::load(
            open(&files.nodes)?,
            &files.nodes.display().to_string(),
            open(&files.names)?,
            &files.names.display().to_string(),
            open(&files.merged)?,
            &files.merged.display().to_string(),
        )
    }

    /// Convenience for a taxdump directory or a `<prefix>_*.dmp` set
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_dump_files(&DumpFiles::locate(path)?)
    }

    /// Build from in-memory or otherwise opened dump sources.
    pub fn from_readers<N, A, M>(nodes: N, names: A, merged: M) -> Result<Self>
    where
        N: BufRead,
        A: BufRead,
        M: BufRead,
    {
        Self::load(
            nodes,
            dump::NODES_FILE,
            names,
            dump::NAMES_FILE,
            merged,
            dump::MERGED_FILE,
        )
    }

    fn load<N, A, M>(
        nodes: N,
        nodes_label: &str,
        names: A,
        names_label: &str,
        merged: M,
        merged_label: &str,
    ) -> Result<Self>
    where
        N: BufRead,
        A: BufRead,
        M: BufRead,
    {
        let mut table = loader::load_nodes(nodes, nodes_label)?;
        info!("Loaded {} taxonomy nodes", table.nodes.len());

        let aliases = loader::load_merged(merged, merged_label, &mut table)?;
        info!("Loaded {} merged taxon ids", aliases);

        let named = loader::load_names(names, names_label, &mut table)?;
        info!("Assigned {} scientific names", named);

        Self::from_table(table)
    }

    fn from_table(table: NodeTable) -> Result<Self> {
        let NodeTable {
            nodes,
            rows,
            merged,
        } = table;

        let root = match rows.get(TaxonId::ROOT.0 as usize) {
            Some(&row) if row != NO_ROW => row as usize,
            _ => {
                return Err(TaxLcaError::InvalidTree(format!(
                    "root taxon {} is missing",
                    TaxonId::ROOT
                )))
            }
        };
        if !nodes[root].is_root() {
            return Err(TaxLcaError::InvalidTree(format!(
                "root taxon {} has parent {}",
                TaxonId::ROOT,
                nodes[root].parent_id
            )));
        }

        let index = EulerTourIndex::build(nodes.len(), root, |row, k| {
            nodes[row]
                .children
                .get(k)
                .map(|child| rows[child.0 as usize] as usize)
        })?;
        info!(
            "Built Euler tour of {} steps with {} sparse-table levels ({:.1} MiB)",
            index.tour_len(),
            index.sparse_levels(),
            index.memory_usage() as f64 / (1024.0 * 1024.0)
        );

        Ok(Self {
            nodes,
            rows,
            merged,
            index,
        })
    }

    /// Row of `taxon_id`, following deprecated ids
    pub fn node_id(&self, taxon_id: TaxonId) -> Option<usize> {
        match self.rows.get(taxon_id.0 as usize) {
            Some(&row) if row != NO_ROW => Some(row as usize),
            _ => None,
        }
    }

    pub fn node_exists(&self, taxon_id: TaxonId) -> bool {
        self.node_id(taxon_id).is_some()
    }

    /// Node for a possibly-invalid, possibly-deprecated id
    pub fn taxon_node(&self, taxon_id: TaxonId) -> Option<&TaxonNode> {
        self.node_id(taxon_id).map(|row| &self.nodes[row])
    }

    /// Node for an id the caller asserts must exist
    pub fn require_node(&self, taxon_id: TaxonId) -> Result<&TaxonNode> {
        self.taxon_node(taxon_id)
            .ok_or(TaxLcaError::UnknownTaxon(taxon_id))
    }

    /// Current id for `taxon_id` after deprecated-id resolution
    pub fn resolve(&self, taxon_id: TaxonId) -> Option<TaxonId> {
        self.taxon_node(taxon_id).map(|node| node.taxon_id)
    }

    /// Replacement id if `taxon_id` was merged into another taxon
    pub fn merged_into(&self, taxon_id: TaxonId) -> Option<TaxonId> {
        self.merged.get(&taxon_id).copied()
    }

    pub fn root(&self) -> &TaxonNode {
        // presence checked at construction
        &self.nodes[self.rows[TaxonId::ROOT.0 as usize] as usize]
    }

    pub fn node(&self, row: usize) -> &TaxonNode {
        &self.nodes[row]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TaxonNode> {
        self.nodes.iter()
    }

    /// Depth below the root, `None` for unknown ids
    pub fn depth(&self, taxon_id: TaxonId) -> Option<u32> {
        self.node_id(taxon_id).map(|row| self.index.depth(row))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }

    pub(crate) fn index(&self) -> &EulerTourIndex {
        &self.index
    }
}
