//! Completion ledger port (driven/secondary port)
//!
//! The ledger is the durable record of which groups have been fully synced.
//! Presence of a prefix means "treat this group as completed on future
//! refreshes"; no partial counts are ever stored.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific and
//!   don't need domain-level classification; the orchestrator only logs them.
//! - Mutations flip whole groups: a prefix is either recorded complete or
//!   absent. A single active orchestrator instance is assumed.

use crate::domain::newtypes::GroupPrefix;

/// Port trait for the durable per-group completion record
#[async_trait::async_trait]
pub trait CompletionLedger: Send + Sync {
    /// Whether this group is recorded as fully synced
    async fn is_complete(&self, prefix: &GroupPrefix) -> bool;

    /// Records the group as fully synced
    async fn mark_complete(&self, prefix: &GroupPrefix) -> anyhow::Result<()>;

    /// Removes the group's completion record so it syncs from scratch
    async fn clear(&self, prefix: &GroupPrefix) -> anyhow::Result<()>;

    /// Number of groups currently recorded complete
    async fn count(&self) -> usize;
}
