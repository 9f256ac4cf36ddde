//! Configuration module for ReelSync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, saving, defaults, and a readiness check used by the
//! CLI before touching the network.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for ReelSync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Object store connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Access key ID for the bucket.
    pub access_key_id: String,
    /// Secret access key for the bucket.
    pub secret_access_key: String,
    /// Region name; empty means the adapter's default.
    pub region: String,
    /// Custom endpoint URL for S3-compatible stores (R2, MinIO, ...).
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by some compatible stores).
    pub force_path_style: bool,
    /// Name of the bucket to mirror.
    pub bucket: String,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root directory the group folders are mirrored under.
    pub target_root: PathBuf,
    /// Whether `.mp4` files take part in mapping and transfer.
    pub include_mp4: bool,
    /// How remote keys are renamed into local file names.
    pub strategy: MappingStrategy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            target_root: PathBuf::new(),
            include_mp4: true,
            strategy: MappingStrategy::Structured,
        }
    }
}

/// Mapping strategy selector.
///
/// `Structured` renames files from metadata in a CSV sidecar found in the
/// group; `Passthrough` keeps remote names as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingStrategy {
    Structured,
    Passthrough,
}

impl Display for MappingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MappingStrategy::Structured => write!(f, "structured"),
            MappingStrategy::Passthrough => write!(f, "passthrough"),
        }
    }
}

impl std::str::FromStr for MappingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structured" => Ok(MappingStrategy::Structured),
            "passthrough" => Ok(MappingStrategy::Passthrough),
            other => Err(format!(
                "unknown mapping strategy '{other}' (expected 'structured' or 'passthrough')"
            )),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Save configuration as YAML to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/reelsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("reelsync")
            .join("config.yaml")
    }

    /// Checks that the settings required before any remote operation are
    /// present: a bucket name and a target root.
    pub fn ensure_ready(&self) -> anyhow::Result<()> {
        if self.store.bucket.trim().is_empty() {
            anyhow::bail!("No bucket configured. Run 'reelsync config set bucket <name>' first.");
        }
        if self.sync.target_root.as_os_str().is_empty() {
            anyhow::bail!(
                "No target path configured. Run 'reelsync config set target-root <path>' first."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sync.include_mp4);
        assert_eq!(config.sync.strategy, MappingStrategy::Structured);
        assert_eq!(config.logging.level, "info");
        assert!(config.store.endpoint_url.is_none());
    }

    #[test]
    fn test_roundtrip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.store.bucket = "deliveries".to_string();
        config.sync.target_root = PathBuf::from("/srv/library");
        config.sync.strategy = MappingStrategy::Passthrough;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.store.bucket, "deliveries");
        assert_eq!(loaded.sync.strategy, MappingStrategy::Passthrough);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/reelsync.yaml"));
        assert!(config.store.bucket.is_empty());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "structured".parse::<MappingStrategy>().unwrap(),
            MappingStrategy::Structured
        );
        assert_eq!(
            "Passthrough".parse::<MappingStrategy>().unwrap(),
            MappingStrategy::Passthrough
        );
        assert!("csv".parse::<MappingStrategy>().is_err());
    }

    #[test]
    fn test_ensure_ready_requires_bucket_and_target() {
        let mut config = Config::default();
        assert!(config.ensure_ready().is_err());

        config.store.bucket = "deliveries".to_string();
        assert!(config.ensure_ready().is_err());

        config.sync.target_root = PathBuf::from("/srv/library");
        assert!(config.ensure_ready().is_ok());
    }
}
