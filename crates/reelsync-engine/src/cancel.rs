//! Cooperative cancellation
//!
//! A stop request may target one group or every in-flight group. The
//! orchestrator checks the flags before starting each group and before each
//! object; once a group's flag is set, the remainder of its objects are
//! abandoned while unaffected groups continue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use reelsync_core::domain::newtypes::GroupPrefix;

/// Shared registry of per-group stop flags plus a stop-all switch
///
/// Cheap to clone; all clones observe the same flags.
#[derive(Debug, Clone, Default)]
pub struct StopFlags {
    flags: Arc<DashMap<String, Arc<AtomicBool>>>,
    all: Arc<AtomicBool>,
}

impl StopFlags {
    /// Creates a registry with nothing flagged
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop for one group
    pub fn request_stop(&self, prefix: &GroupPrefix) {
        self.flags
            .entry(prefix.as_str().to_string())
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .store(true, Ordering::Release);
    }

    /// Requests a stop for every in-flight group
    pub fn request_stop_all(&self) {
        self.all.store(true, Ordering::Release);
    }

    /// Whether this group should stop (its own flag or the all-groups flag)
    #[must_use]
    pub fn is_stopped(&self, prefix: &GroupPrefix) -> bool {
        if self.all.load(Ordering::Acquire) {
            return true;
        }
        self.flags
            .get(prefix.as_str())
            .map(|flag| flag.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Clears all flags ahead of a new run
    pub fn reset(&self) {
        self.flags.clear();
        self.all.store(false, Ordering::Release);
    }
}
