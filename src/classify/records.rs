/// Alignment-result records grouped by query key
use crate::{Result, TaxLcaError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One query and the target keys it matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub targets: Vec<u32>,
}

/// Read `query<TAB>target<TAB>...` lines; consecutive lines with the same
/// query form one record. A line with only a query key yields a record with
/// no targets.
pub fn read_records<R: BufRead>(reader: R, file: &str) -> Result<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut columns = line.split('\t');
        let key = columns.next().unwrap_or_default().trim();
        let target = columns
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u32>().map_err(|e| {
                    TaxLcaError::Parse(format!("{} line {}: target '{}': {}", file, idx + 1, t, e))
                })
            })
            .transpose()?;

        match records.last_mut() {
            Some(record) if record.key == key => record.targets.extend(target),
            _ => records.push(Record {
                key: key.to_string(),
                targets: target.into_iter().collect(),
            }),
        }
    }

    Ok(records)
}

pub fn read_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    read_records(reader, &path.display().to_string())
}
