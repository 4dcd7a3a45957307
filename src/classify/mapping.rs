/// Target key → taxon mapping table
use crate::taxonomy::TaxonId;
use crate::{Result, TaxLcaError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Sorted `(key, taxon)` pairs with binary-search lookup
#[derive(Debug, Clone, Default)]
pub struct TaxonMapping {
    entries: Vec<(u32, TaxonId)>,
}

impl TaxonMapping {
    /// Sorts by key unless already sorted; equal keys keep input order.
    pub fn from_pairs(mut entries: Vec<(u32, TaxonId)>) -> Self {
        if !entries.windows(2).all(|w| w[0].0 <= w[1].0) {
            debug!("Sorting {} mapping entries", entries.len());
            entries.sort_by_key(|&(key, _)| key);
        }
        Self { entries }
    }

    /// Read `key<TAB>taxid` lines; extra columns are ignored.
    pub fn from_reader<R: BufRead>(reader: R, file: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut columns = line.split_whitespace();
            let (Some(key), Some(taxon)) = (columns.next(), columns.next()) else {
                return Err(TaxLcaError::MalformedRecord {
                    file: file.to_string(),
                    line: idx + 1,
                    expected: 2,
                    found: 1,
                });
            };
            let parse = |field: &str| {
                field.parse::<u32>().map_err(|e| {
                    TaxLcaError::Parse(format!("{} line {}: '{}': {}", file, idx + 1, field, e))
                })
            };
            entries.push((parse(key)?, TaxonId(parse(taxon)?)));
        }
        Ok(Self::from_pairs(entries))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader, &path.display().to_string())
    }

    /// First taxon recorded for `key`
    pub fn lookup(&self, key: u32) -> Option<TaxonId> {
        let idx = self.entries.partition_point(|&(k, _)| k < key);
        match self.entries.get(idx) {
            Some(&(k, taxon)) if k == key => Some(taxon),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
