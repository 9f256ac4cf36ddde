//! Sync group state and status machine
//!
//! A [`SyncGroup`] is the in-memory state for one remote group over the
//! lifetime of a session: its mappings, counters and current [`GroupStatus`].
//! It is created on refresh and mutated only by the sync orchestrator;
//! consumers observe it through the event channel.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::mapping::MappingSet;
use super::newtypes::GroupPrefix;

// ============================================================================
// GroupStatus
// ============================================================================

/// Lifecycle status of a sync group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    /// Queued for sync, nothing transferred yet
    Pending,
    /// Transfer loop is running for this group
    Downloading,
    /// Every matched object is present locally
    Completed,
    /// Some objects transferred, some failed
    Partial,
    /// A full pass produced no transfers
    Skipped,
    /// Cancellation interrupted the group
    Stopped,
}

impl GroupStatus {
    /// Stable lowercase name, matching the serialized form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Pending => "pending",
            GroupStatus::Downloading => "downloading",
            GroupStatus::Completed => "completed",
            GroupStatus::Partial => "partial",
            GroupStatus::Skipped => "skipped",
            GroupStatus::Stopped => "stopped",
        }
    }

    /// Whether this status ends a group's sync run
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GroupStatus::Pending | GroupStatus::Downloading)
    }
}

impl Display for GroupStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SyncGroup
// ============================================================================

/// In-memory state of one remote group during a session
///
/// The `downloaded <= total` invariant is enforced by
/// [`record_download`](SyncGroup::record_download); the counter never
/// regresses within a run except through an explicit
/// [`reset_for_sync`](SyncGroup::reset_for_sync).
#[derive(Debug, Clone)]
pub struct SyncGroup {
    prefix: GroupPrefix,
    local_name: String,
    mappings: MappingSet,
    total: u64,
    downloaded: u64,
    data_parsed: bool,
    status: GroupStatus,
}

impl SyncGroup {
    /// Creates a fresh group from a refresh pass
    #[must_use]
    pub fn new(
        prefix: GroupPrefix,
        local_name: impl Into<String>,
        mappings: MappingSet,
        total: u64,
        data_parsed: bool,
    ) -> Self {
        Self {
            prefix,
            local_name: local_name.into(),
            mappings,
            total,
            downloaded: 0,
            data_parsed,
            status: GroupStatus::Pending,
        }
    }

    /// Creates a group already recorded complete in the ledger
    ///
    /// The ledger stores presence only, so no counts are available without
    /// re-listing; the group is materialized with `downloaded == total == 0`
    /// and forced to `Completed`.
    #[must_use]
    pub fn completed(prefix: GroupPrefix) -> Self {
        let local_name = prefix.display_name().to_string();
        Self {
            prefix,
            local_name,
            mappings: MappingSet::new(),
            total: 0,
            downloaded: 0,
            data_parsed: false,
            status: GroupStatus::Completed,
        }
    }

    /// The group's remote prefix
    #[must_use]
    pub fn prefix(&self) -> &GroupPrefix {
        &self.prefix
    }

    /// The local folder name objects are placed under
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The group's file mappings
    #[must_use]
    pub fn mappings(&self) -> &MappingSet {
        &self.mappings
    }

    /// Number of objects this group is expected to place locally
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of objects present locally so far this run
    #[must_use]
    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Whether sidecar metadata was successfully parsed on refresh
    #[must_use]
    pub fn data_parsed(&self) -> bool {
        self.data_parsed
    }

    /// Current lifecycle status
    #[must_use]
    pub fn status(&self) -> GroupStatus {
        self.status
    }

    /// Sets the lifecycle status
    pub fn set_status(&mut self, status: GroupStatus) {
        self.status = status;
    }

    /// Records one object as present locally and returns the new count
    ///
    /// # Errors
    /// Returns [`DomainError::ProgressOverflow`] if the counter would
    /// exceed the group total.
    pub fn record_download(&mut self) -> Result<u64, DomainError> {
        if self.downloaded >= self.total {
            return Err(DomainError::ProgressOverflow {
                downloaded: self.downloaded + 1,
                total: self.total,
            });
        }
        self.downloaded += 1;
        Ok(self.downloaded)
    }

    /// Whether every expected object is present locally
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.downloaded == self.total
    }

    /// Resets counters ahead of a new sync run
    pub fn reset_for_sync(&mut self) {
        self.downloaded = 0;
        self.status = GroupStatus::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(total: u64) -> SyncGroup {
        SyncGroup::new(
            GroupPrefix::new("showA/").unwrap(),
            "showA",
            MappingSet::new(),
            total,
            false,
        )
    }

    #[test]
    fn test_new_group_is_pending() {
        let g = group(3);
        assert_eq!(g.status(), GroupStatus::Pending);
        assert_eq!(g.downloaded(), 0);
        assert_eq!(g.total(), 3);
    }

    #[test]
    fn test_record_download_increments() {
        let mut g = group(2);
        assert_eq!(g.record_download().unwrap(), 1);
        assert_eq!(g.record_download().unwrap(), 2);
        assert!(g.is_complete());
    }

    #[test]
    fn test_record_download_never_exceeds_total() {
        let mut g = group(1);
        g.record_download().unwrap();
        assert!(matches!(
            g.record_download(),
            Err(DomainError::ProgressOverflow { .. })
        ));
        assert_eq!(g.downloaded(), 1);
    }

    #[test]
    fn test_completed_group_satisfies_invariant() {
        let g = SyncGroup::completed(GroupPrefix::new("done/").unwrap());
        assert_eq!(g.status(), GroupStatus::Completed);
        assert_eq!(g.downloaded(), g.total());
        assert_eq!(g.local_name(), "done");
    }

    #[test]
    fn test_reset_for_sync() {
        let mut g = group(2);
        g.record_download().unwrap();
        g.set_status(GroupStatus::Partial);
        g.reset_for_sync();
        assert_eq!(g.downloaded(), 0);
        assert_eq!(g.status(), GroupStatus::Pending);
    }

    #[test]
    fn test_status_terminal_classification() {
        assert!(!GroupStatus::Pending.is_terminal());
        assert!(!GroupStatus::Downloading.is_terminal());
        assert!(GroupStatus::Completed.is_terminal());
        assert!(GroupStatus::Partial.is_terminal());
        assert!(GroupStatus::Skipped.is_terminal());
        assert!(GroupStatus::Stopped.is_terminal());
    }

    #[test]
    fn test_status_serde_roundtrip() {
        let json = serde_json::to_string(&GroupStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
        let back: GroupStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GroupStatus::Partial);
    }
}
