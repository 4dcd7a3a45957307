use crate::taxonomy::{RankTable, TaxonId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub lca: LcaConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Taxdump directory, or a prefix for `<prefix>_nodes.dmp` and friends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcaConfig {
    /// Ranks reported after the LCA, in output order
    pub ranks: Vec<String>,
    /// Candidates below any of these taxa are dropped before the LCA
    pub blacklist: Vec<TaxonId>,
    /// Append the full lineage to each classified line
    pub tax_lineage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads (0 = all available)
    pub threads: usize,
    /// Minimum records per rayon job (0 = derive from input size)
    pub chunk_size: usize,
}

impl Default for LcaConfig {
    fn default() -> Self {
        Self {
            ranks: Vec::new(),
            // unclassified sequences, other sequences
            blacklist: vec![TaxonId(12908), TaxonId(28384)],
            tax_lineage: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            chunk_size: 10,
        }
    }
}

impl LcaConfig {
    pub fn validate(&self) -> Result<(), crate::TaxLcaError> {
        RankTable::global().validate(&self.ranks)
    }
}

/// Split a colon-separated rank list such as `species:genus:family`
pub fn parse_rank_list(ranks: &str) -> Vec<String> {
    ranks
        .split(':')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::TaxLcaError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::TaxLcaError::Config(format!("Failed to parse config: {}", e)))?;
    config.lca.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::TaxLcaError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::TaxLcaError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaxLcaError;
    use tempfile::TempDir;

    #[test]
    fn test_default_blacklist() {
        let config = default_config();
        assert_eq!(config.lca.blacklist, vec![TaxonId(12908), TaxonId(28384)]);
        assert!(config.lca.ranks.is_empty());
        assert_eq!(config.performance.threads, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taxlca.toml");

        let mut config = Config::default();
        config.taxonomy.dump = Some(PathBuf::from("/data/taxdump"));
        config.lca.ranks = vec!["species".into(), "genus".into()];
        config.lca.tax_lineage = true;
        save_config(&path, &config).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taxlca.toml");
        std::fs::write(&path, "[lca]\nranks = [\"family\"]\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.lca.ranks, vec!["family".to_string()]);
        assert_eq!(config.lca.blacklist, LcaConfig::default().blacklist);
        assert_eq!(config.performance.chunk_size, 10);
    }

    #[test]
    fn test_unknown_rank_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taxlca.toml");
        std::fs::write(&path, "[lca]\nranks = [\"specie\"]\n").unwrap();

        assert!(matches!(load_config(&path), Err(TaxLcaError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taxlca.toml");
        std::fs::write(&path, "[lca\n").unwrap();

        assert!(matches!(load_config(&path), Err(TaxLcaError::Config(_))));
    }

    #[test]
    fn test_parse_rank_list() {
        assert_eq!(parse_rank_list("species:genus"), vec!["species", "genus"]);
        assert!(parse_rank_list("").is_empty());
        assert_eq!(parse_rank_list(" family :"), vec!["family"]);
    }
}
