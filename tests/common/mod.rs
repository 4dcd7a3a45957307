//! Shared taxdump fixtures for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use taxlca::{NcbiTaxonomy, TaxonId};
use tempfile::TempDir;

/// `(taxon, parent, rank, name)`; the root must be `(1, 1, ..)`
pub type NodeSpec = (u32, u32, &'static str, &'static str);

/// Worked example tree plus a second branch and a blacklisted branch:
///
/// ```text
/// 1 root
/// ├── 2 G (genus) ── 10 A, 20 B (species)
/// ├── 3 F (family) ── 30 H (genus) ── 31 C (species)
/// └── 12908 unclassified sequences ── 40 metagenome
/// ```
pub const SAMPLE_NODES: &[NodeSpec] = &[
    (1, 1, "no rank", "root"),
    (2, 1, "genus", "G"),
    (10, 2, "species", "A"),
    (20, 2, "species", "B"),
    (3, 1, "family", "F"),
    (30, 3, "genus", "H"),
    (31, 30, "species", "C"),
    (12908, 1, "no rank", "unclassified sequences"),
    (40, 12908, "species", "metagenome"),
];

/// `old -> new`
pub const SAMPLE_MERGED: &[(u32, u32)] = &[(7, 10), (99, 31)];

pub fn nodes_dmp(nodes: &[NodeSpec]) -> String {
    let mut out = String::new();
    for (taxon, parent, rank, _) in nodes {
        writeln!(out, "{taxon}\t|\t{parent}\t|\t{rank}\t|\t\t|\t0\t|").unwrap();
    }
    out
}

pub fn names_dmp(nodes: &[NodeSpec]) -> String {
    let mut out = String::new();
    for (taxon, _, _, name) in nodes {
        writeln!(out, "{taxon}\t|\t{name}\t|\t\t|\tscientific name\t|").unwrap();
        writeln!(out, "{taxon}\t|\t{name} alias\t|\t\t|\tsynonym\t|").unwrap();
    }
    out
}

pub fn merged_dmp(merged: &[(u32, u32)]) -> String {
    merged
        .iter()
        .map(|(old, new)| format!("{old}\t|\t{new}\t|\n"))
        .collect()
}

pub fn taxonomy_from(nodes: &[NodeSpec], merged: &[(u32, u32)]) -> NcbiTaxonomy {
    NcbiTaxonomy::from_readers(
        Cursor::new(nodes_dmp(nodes)),
        Cursor::new(names_dmp(nodes)),
        Cursor::new(merged_dmp(merged)),
    )
    .expect("fixture taxonomy should load")
}

pub fn sample_taxonomy() -> NcbiTaxonomy {
    taxonomy_from(SAMPLE_NODES, SAMPLE_MERGED)
}

/// Temporary taxdump directory
pub struct DumpDir {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl DumpDir {
    pub fn new(nodes: &[NodeSpec], merged: &[(u32, u32)]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("taxdump");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("nodes.dmp"), nodes_dmp(nodes)).unwrap();
        fs::write(path.join("names.dmp"), names_dmp(nodes)).unwrap();
        fs::write(path.join("merged.dmp"), merged_dmp(merged)).unwrap();
        DumpDir {
            _temp_dir: temp_dir,
            path,
        }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_NODES, SAMPLE_MERGED)
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Build a random tree of `parents.len() + 1` nodes: node `i + 2` hangs
/// below one of the nodes created before it. Ids are spread out so the
/// direct-index table has holes.
pub fn random_tree(parents: &[usize]) -> (Vec<(u32, u32)>, NcbiTaxonomy) {
    let id = |n: usize| if n == 0 { 1 } else { (n as u32) * 7 + 3 };
    let mut edges = vec![(1u32, 1u32)];
    for (i, &choice) in parents.iter().enumerate() {
        let node = i + 1;
        let parent = choice % node;
        edges.push((id(node), id(parent)));
    }

    let mut nodes = String::new();
    for (taxon, parent) in &edges {
        writeln!(nodes, "{taxon}\t|\t{parent}\t|\tno rank\t|").unwrap();
    }
    let taxonomy = NcbiTaxonomy::from_readers(Cursor::new(nodes), Cursor::new(""), Cursor::new(""))
        .expect("random tree should load");
    (edges, taxonomy)
}

/// Parent-walk LCA for cross-checking the Euler index
pub fn naive_lca(parent: &HashMap<u32, u32>, a: u32, b: u32) -> u32 {
    let mut path = vec![a];
    let mut cur = a;
    while parent[&cur] != cur {
        cur = parent[&cur];
        path.push(cur);
    }
    let mut cur = b;
    while !path.contains(&cur) {
        cur = parent[&cur];
    }
    cur
}

pub fn ids(raw: &[u32]) -> Vec<TaxonId> {
    raw.iter().copied().map(TaxonId).collect()
}
