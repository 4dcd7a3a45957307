//! NCBI taxdump file layout and line splitting

use crate::taxonomy::TaxonId;
use crate::{Result, TaxLcaError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Separator between columns of a `.dmp` file
pub const FIELD_DELIMITER: &str = "\t|\t";

/// Every `.dmp` line ends with this marker
const LINE_TERMINATOR: &str = "\t|";

pub const NODES_FILE: &str = "nodes.dmp";
pub const NAMES_FILE: &str = "names.dmp";
pub const MERGED_FILE: &str = "merged.dmp";

/// Split one dump line into its columns, dropping the trailing `\t|`.
pub fn split_dump_line(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_suffix(LINE_TERMINATOR).unwrap_or(line);
    line.split(FIELD_DELIMITER).collect()
}

pub(crate) fn require_fields(fields: &[&str], expected: usize, file: &str, line: usize) -> Result<()> {
    if fields.len() < expected {
        return Err(TaxLcaError::MalformedRecord {
            file: file.to_string(),
            line,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

pub(crate) fn parse_taxon(field: &str, file: &str, line: usize) -> Result<TaxonId> {
    field.trim().parse::<u32>().map(TaxonId).map_err(|e| {
        TaxLcaError::Parse(format!(
            "{} line {}: invalid taxon id '{}': {}",
            file,
            line,
            field.trim(),
            e
        ))
    })
}

/// Locations of the three dump files a taxonomy is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpFiles {
    pub nodes: PathBuf,
    pub names: PathBuf,
    pub merged: PathBuf,
}

impl DumpFiles {
    /// `nodes.dmp`, `names.dmp` and `merged.dmp` inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            nodes: dir.join(NODES_FILE),
            names: dir.join(NAMES_FILE),
            merged: dir.join(MERGED_FILE),
        }
    }

    /// `<prefix>_nodes.dmp`, `<prefix>_names.dmp` and `<prefix>_merged.dmp`
    pub fn with_prefix<P: AsRef<Path>>(prefix: P) -> Self {
        let prefixed = |suffix: &str| {
            let mut path = OsString::from(prefix.as_ref().as_os_str());
            path.push("_");
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            nodes: prefixed(NODES_FILE),
            names: prefixed(NAMES_FILE),
            merged: prefixed(MERGED_FILE),
        }
    }

    /// Prefer database-prefixed dumps next to `path`, then a plain taxdump
    /// directory at `path`.
    pub fn locate<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let prefixed = Self::with_prefix(path);
        if prefixed.missing().is_none() {
            return Ok(prefixed);
        }

        if path.is_dir() {
            let plain = Self::in_dir(path);
            return match plain.missing() {
                None => Ok(plain),
                Some(missing) => Err(TaxLcaError::MissingDump {
                    path: missing.to_path_buf(),
                }),
            };
        }

        Err(TaxLcaError::MissingDump {
            path: prefixed
                .missing()
                .unwrap_or(prefixed.nodes.as_path())
                .to_path_buf(),
        })
    }

    /// First file that does not exist, if any
    pub fn missing(&self) -> Option<&Path> {
        [&self.nodes, &self.names, &self.merged]
            .into_iter()
            .find(|p| !p.is_file())
            .map(PathBuf::as_path)
    }
}
