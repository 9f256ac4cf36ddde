//! ReelSync Engine - refresh and sync orchestration
//!
//! Drives the two background passes of a session:
//!
//! 1. **Refresh** - enumerate top-level groups, consult the completion
//!    ledger, and resolve each group's file mappings.
//! 2. **Sync** - per selected group, re-list live objects and transfer every
//!    mapped object that is not already present locally.
//!
//! Both passes run inside worker tasks and communicate with the consumer
//! exclusively through the [`events`] channel; nothing here blocks the
//! presentation side.
//!
//! ## Modules
//!
//! - [`engine`] - The per-group transfer loop and terminal status derivation
//! - [`refresh`] - Group discovery and mapping resolution
//! - [`events`] - Typed progress/status/log event channel
//! - [`cancel`] - Cooperative per-group stop flags

pub mod cancel;
pub mod engine;
pub mod events;
pub mod refresh;

use std::path::PathBuf;

use thiserror::Error;

use reelsync_core::config::{Config, MappingStrategy};
use reelsync_core::ports::object_store::StoreError;

/// Errors that abort a whole engine pass
///
/// Per-group and per-object failures never surface here; they are logged
/// and isolated so sibling groups keep running.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The store rejected or failed the top-level group enumeration
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Immutable settings for one refresh/sync session
///
/// Constructed once from the configuration when a session starts, then
/// passed into the refresh task and the engine; replaces any notion of
/// global mutable settings.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Root directory the group folders are mirrored under
    pub target_root: PathBuf,
    /// Whether `.mp4` files take part in mapping and transfer
    pub include_mp4: bool,
    /// Selected mapping strategy
    pub strategy: MappingStrategy,
}

impl SessionContext {
    /// Snapshots the relevant settings from the configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_root: config.sync.target_root.clone(),
            include_mp4: config.sync.include_mp4,
            strategy: config.sync.strategy,
        }
    }
}
