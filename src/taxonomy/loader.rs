//! Parsing of nodes.dmp, merged.dmp and names.dmp into the dense node table

use crate::taxonomy::dump::{parse_taxon, require_fields, split_dump_line};
use crate::taxonomy::{TaxonId, TaxonNode};
use crate::{Result, TaxLcaError};
use std::collections::HashMap;
use std::io::BufRead;
use tracing::{debug, warn};

/// Marks an identifier slot that maps to no row
pub(crate) const NO_ROW: u32 = u32::MAX;

const SCIENTIFIC_NAME: &str = "scientific name";

/// Identifiers below this are always accepted; full NCBI dumps stay well
/// under it.
const MIN_ID_CAPACITY: u64 = 1 << 24;

/// Largest taxon id the direct-index table may hold for `node_count` nodes.
fn id_capacity(node_count: usize) -> u64 {
    (node_count as u64).saturating_mul(16).max(MIN_ID_CAPACITY)
}

fn check_capacity(taxon_id: TaxonId, node_count: usize, file: &str) -> Result<()> {
    let capacity = id_capacity(node_count);
    if u64::from(taxon_id.0) >= capacity {
        return Err(TaxLcaError::InvalidTree(format!(
            "{}: taxon id {} is out of range for {} nodes (limit {})",
            file, taxon_id, node_count, capacity
        )));
    }
    Ok(())
}

/// Nodes plus the taxon-id → row lookup, before the Euler index exists
#[derive(Debug, Default)]
pub(crate) struct NodeTable {
    pub nodes: Vec<TaxonNode>,
    /// Indexed by taxon id. Deprecated ids point at their replacement's row.
    pub rows: Vec<u32>,
    pub merged: HashMap<TaxonId, TaxonId>,
}

impl NodeTable {
    /// Row for `taxon_id`, following deprecated ids
    pub fn row(&self, taxon_id: TaxonId) -> Option<usize> {
        match self.rows.get(taxon_id.0 as usize) {
            Some(&row) if row != NO_ROW => Some(row as usize),
            _ => None,
        }
    }

    /// Row only if `taxon_id` is itself a loaded node, not an alias
    fn live_row(&self, taxon_id: TaxonId) -> Option<usize> {
        self.row(taxon_id)
            .filter(|&row| self.nodes[row].taxon_id == taxon_id)
    }
}

/// Read `taxon | parent | rank | ...` records and invert parent links into
/// child lists.
pub(crate) fn load_nodes<R: BufRead>(reader: R, file: &str) -> Result<NodeTable> {
    let mut nodes: Vec<TaxonNode> = Vec::new();
    let mut max_taxon = 0u32;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_dump_line(&line);
        require_fields(&fields, 3, file, line_no)?;

        let taxon_id = parse_taxon(fields[0], file, line_no)?;
        let parent_id = parse_taxon(fields[1], file, line_no)?;
        if taxon_id == parent_id && !taxon_id.is_root() {
            return Err(TaxLcaError::InvalidTree(format!(
                "taxon {} is its own parent but is not the root",
                taxon_id
            )));
        }

        max_taxon = max_taxon.max(taxon_id.0);
        nodes.push(TaxonNode::new(
            nodes.len(),
            taxon_id,
            parent_id,
            fields[2].trim(),
        ));
    }

    check_capacity(TaxonId(max_taxon), nodes.len(), file)?;
    let mut rows = vec![NO_ROW; max_taxon as usize + 1];
    for node in &nodes {
        let slot = &mut rows[node.taxon_id.0 as usize];
        if *slot != NO_ROW {
            return Err(TaxLcaError::InvalidTree(format!(
                "{}: taxon {} listed more than once",
                file, node.taxon_id
            )));
        }
        *slot = node.id as u32;
    }

    let mut table = NodeTable {
        nodes,
        rows,
        merged: HashMap::new(),
    };

    for row in 0..table.nodes.len() {
        let (taxon_id, parent_id) = (table.nodes[row].taxon_id, table.nodes[row].parent_id);
        if taxon_id == parent_id {
            continue;
        }
        let parent_row = table.row(parent_id).ok_or_else(|| {
            TaxLcaError::InvalidTree(format!(
                "parent {} of taxon {} is not a known node",
                parent_id, taxon_id
            ))
        })?;
        table.nodes[parent_row].children.push(taxon_id);
    }

    debug!(
        "Parsed {} nodes from {} (max taxon id {})",
        table.nodes.len(),
        file,
        max_taxon
    );
    Ok(table)
}

/// Read `old | new |` pairs. Returns the number of aliases installed.
pub(crate) fn load_merged<R: BufRead>(reader: R, file: &str, table: &mut NodeTable) -> Result<usize> {
    let mut installed = 0;
    let mut skipped = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_dump_line(&line);
        require_fields(&fields, 2, file, line_no)?;

        let old_id = parse_taxon(fields[0], file, line_no)?;
        let new_id = parse_taxon(fields[1], file, line_no)?;

        let Some(new_row) = table.live_row(new_id) else {
            warn!("Merged taxon {} points at unknown taxon {}, skipping", old_id, new_id);
            skipped += 1;
            continue;
        };
        if table.live_row(old_id).is_some() {
            warn!("Merged taxon {} is still a live node, keeping the node", old_id);
            skipped += 1;
            continue;
        }

        let slot = old_id.0 as usize;
        if slot >= table.rows.len() {
            check_capacity(old_id, table.nodes.len(), file)?;
            table.rows.resize(slot + 1, NO_ROW);
        }
        table.rows[slot] = new_row as u32;
        table.merged.insert(old_id, new_id);
        installed += 1;
    }

    debug!("Installed {} merged ids from {} ({} skipped)", installed, file, skipped);
    Ok(installed)
}

/// Read `taxon | name | unique name | class |` rows and attach scientific
/// names. Returns the number of nodes named.
pub(crate) fn load_names<R: BufRead>(reader: R, file: &str, table: &mut NodeTable) -> Result<usize> {
    let mut named = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_dump_line(&line);
        require_fields(&fields, 4, file, line_no)?;

        if fields[3].trim() != SCIENTIFIC_NAME {
            continue;
        }

        let taxon_id = parse_taxon(fields[0], file, line_no)?;
        // names.dmp covers more taxa than a trimmed nodes.dmp
        if let Some(row) = table.live_row(taxon_id) {
            table.nodes[row].name = fields[1].to_string();
            named += 1;
        }
    }

    debug!("Assigned {} scientific names from {}", named, file);
    Ok(named)
}
