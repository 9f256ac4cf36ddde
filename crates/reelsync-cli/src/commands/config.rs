//! Config command - view and edit configuration
//!
//! `reelsync config show` prints the active configuration (secret masked),
//! `reelsync config path` prints where it lives, and `reelsync config set`
//! updates one setting and saves the file.
//!
//! Changing the mapping strategy is refused while any group is recorded
//! complete: the ledger's entries were produced under the old naming scheme
//! and would silently mismatch the new one.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;

use reelsync_core::config::{Config, MappingStrategy};

use crate::commands::open_ledger;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set one configuration value
    Set {
        /// Setting name: target-root, bucket, region, endpoint-url,
        /// access-key-id, secret-access-key, force-path-style,
        /// include-mp4, strategy, log-level
        key: String,
        /// New value
        value: String,
    },
}

impl ConfigCommand {
    pub async fn execute(&self, format: OutputFormat, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        match self {
            ConfigCommand::Path => {
                formatter.info(&config_path.display().to_string());
                Ok(())
            }
            ConfigCommand::Show => {
                let mut config = Config::load_or_default(config_path);
                if !config.store.secret_access_key.is_empty() {
                    config.store.secret_access_key = "********".to_string();
                }
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::to_value(&config)?);
                } else {
                    formatter.info(&serde_yaml::to_string(&config)?);
                }
                Ok(())
            }
            ConfigCommand::Set { key, value } => {
                let mut config = Config::load_or_default(config_path);

                match key.as_str() {
                    "target-root" => config.sync.target_root = PathBuf::from(value),
                    "bucket" => config.store.bucket = value.trim().to_string(),
                    "region" => config.store.region = value.trim().to_string(),
                    "endpoint-url" => {
                        let trimmed = value.trim();
                        config.store.endpoint_url = if trimmed.is_empty() {
                            None
                        } else {
                            Some(trimmed.to_string())
                        };
                    }
                    "access-key-id" => config.store.access_key_id = value.trim().to_string(),
                    "secret-access-key" => {
                        config.store.secret_access_key = value.trim().to_string()
                    }
                    "force-path-style" => match value.parse::<bool>() {
                        Ok(flag) => config.store.force_path_style = flag,
                        Err(_) => {
                            formatter.error("force-path-style expects 'true' or 'false'");
                            return Ok(());
                        }
                    },
                    "include-mp4" => match value.parse::<bool>() {
                        Ok(flag) => config.sync.include_mp4 = flag,
                        Err(_) => {
                            formatter.error("include-mp4 expects 'true' or 'false'");
                            return Ok(());
                        }
                    },
                    "strategy" => {
                        let strategy: MappingStrategy = match value.parse() {
                            Ok(strategy) => strategy,
                            Err(err) => {
                                formatter.error(&err);
                                return Ok(());
                            }
                        };

                        // Completed groups were named under the current
                        // strategy; switching would orphan them
                        let ledger = open_ledger().await?;
                        if ledger.count().await > 0 && strategy != config.sync.strategy {
                            formatter.error(
                                "Cannot change the mapping strategy while groups are recorded \
                                 complete. Clear them first with 'reelsync clear'.",
                            );
                            return Ok(());
                        }
                        config.sync.strategy = strategy;
                    }
                    "log-level" => config.logging.level = value.trim().to_string(),
                    other => {
                        formatter.error(&format!("Unknown setting: {other}"));
                        return Ok(());
                    }
                }

                config.save(config_path)?;
                formatter.success(&format!("Set {key}"));
                Ok(())
            }
        }
    }
}
