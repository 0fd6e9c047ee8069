//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use govern_governance::GovernanceConfig;

use crate::NodeError;

/// Where hook state is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process map, gone when the process exits.
    #[default]
    Memory,
    /// LMDB environment under `data_dir`.
    Lmdb,
}

impl std::str::FromStr for StorageBackend {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "lmdb" => Ok(StorageBackend::Lmdb),
            other => Err(NodeError::Config(format!("unknown storage backend: {other}"))),
        }
    }
}

/// Configuration for the ledger host.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for the LMDB backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Hook state backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// How many generations of emitted transactions one submission may
    /// trigger. A hook emitting past this depth is rolled back.
    #[serde(default = "default_max_emission_depth")]
    pub max_emission_depth: u32,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Governance hook settings shared by every table on this ledger.
    #[serde(default)]
    pub governance: GovernanceConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./govern_data")
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_max_emission_depth() -> u32 {
    4
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::default(),
            lmdb_map_size: default_lmdb_map_size(),
            max_emission_depth: default_max_emission_depth(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            governance: GovernanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govern_governance::{SeatZeroPolicy, ThresholdPolicy};

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.lmdb_map_size, config.lmdb_map_size);
        assert_eq!(parsed.max_emission_depth, config.max_emission_depth);
        assert_eq!(parsed.governance, config.governance);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.max_emission_depth, 4);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.governance, GovernanceConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            backend = "lmdb"
            data_dir = "/var/lib/govern"

            [governance]
            threshold = "supermajority"
            seat_zero = "require-occupied"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.backend, StorageBackend::Lmdb);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/govern"));
        assert_eq!(config.governance.threshold, ThresholdPolicy::Supermajority);
        assert_eq!(config.governance.seat_zero, SeatZeroPolicy::RequireOccupied);
        assert_eq!(config.governance.rescue_payment_cap_drops, 1); // default
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(NodeConfig::from_toml_str(r#"backend = "rocksdb""#).is_err());
        assert!(matches!(
            "rocksdb".parse::<StorageBackend>(),
            Err(NodeError::Config(_))
        ));
        assert_eq!("LMDB".parse::<StorageBackend>().unwrap(), StorageBackend::Lmdb);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
