//! JSON-file implementation of the completion ledger
//!
//! The document is loaded once at open and kept in memory; every mutation
//! rewrites the whole file. A missing or unreadable document degrades to an
//! empty ledger so a damaged status file never blocks a refresh.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use reelsync_core::domain::newtypes::GroupPrefix;
use reelsync_core::ports::ledger::CompletionLedger;

use crate::LedgerError;

/// File-backed completion ledger
pub struct FileLedger {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, bool>>,
}

impl FileLedger {
    /// Opens the ledger at `path`, loading any existing document
    ///
    /// A missing file yields an empty ledger; a corrupt one is logged and
    /// treated as empty rather than failing the refresh.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, bool>>(&content) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), %err, "Corrupt ledger document, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(LedgerError::Io(format!(
                    "read {}: {err}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), groups = entries.len(), "Ledger opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Platform-appropriate default path for the ledger document.
    ///
    /// Typically `$XDG_DATA_HOME/reelsync/ledger.json` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("reelsync")
            .join("ledger.json")
    }

    /// Rewrites the whole document from the given snapshot
    async fn persist(&self, snapshot: &BTreeMap<String, bool>) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::Io(format!("create {}: {e}", parent.display())))?;
        }

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| LedgerError::Io(format!("write {}: {e}", self.path.display())))?;

        Ok(())
    }

    /// The path of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CompletionLedger for FileLedger {
    async fn is_complete(&self, prefix: &GroupPrefix) -> bool {
        self.entries.lock().await.contains_key(prefix.as_str())
    }

    async fn mark_complete(&self, prefix: &GroupPrefix) -> anyhow::Result<()> {
        let snapshot = {
            let mut entries = self.entries.lock().await;
            entries.insert(prefix.as_str().to_string(), true);
            entries.clone()
        };
        self.persist(&snapshot).await?;
        debug!(prefix = %prefix, "Group recorded complete");
        Ok(())
    }

    async fn clear(&self, prefix: &GroupPrefix) -> anyhow::Result<()> {
        let snapshot = {
            let mut entries = self.entries.lock().await;
            entries.remove(prefix.as_str());
            entries.clone()
        };
        self.persist(&snapshot).await?;
        debug!(prefix = %prefix, "Group completion cleared");
        Ok(())
    }

    async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
