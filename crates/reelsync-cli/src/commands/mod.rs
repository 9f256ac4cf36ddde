//! CLI command implementations

pub mod clear;
pub mod config;
pub mod groups;
pub mod sync;

use std::sync::Arc;

use anyhow::{Context, Result};

use reelsync_core::config::Config;
use reelsync_core::ports::ledger::CompletionLedger;
use reelsync_core::ports::object_store::ObjectStore;
use reelsync_ledger::FileLedger;
use reelsync_store::S3ObjectStore;

/// Opens the completion ledger at its default location
pub async fn open_ledger() -> Result<Arc<dyn CompletionLedger>> {
    let ledger = FileLedger::open(FileLedger::default_path())
        .await
        .context("Failed to open completion ledger")?;
    Ok(Arc::new(ledger))
}

/// Builds the object store adapter from the configuration
pub fn open_store(config: &Config) -> Arc<dyn ObjectStore> {
    Arc::new(S3ObjectStore::new(&config.store))
}
