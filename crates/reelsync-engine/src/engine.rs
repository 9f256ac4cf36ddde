//! Group sync engine
//!
//! Runs the transfer loop for a batch of groups. Failures are isolated at
//! the smallest unit: a failed object skips to the next object, a failed
//! group reaches a terminal status and the next group starts. Every counter
//! increment and status transition is emitted on the event channel the
//! moment it happens.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use reelsync_core::domain::filter::is_syncable_object;
use reelsync_core::domain::group::{GroupStatus, SyncGroup};
use reelsync_core::ports::ledger::CompletionLedger;
use reelsync_core::ports::object_store::ObjectStore;

use crate::cancel::StopFlags;
use crate::events::EventSender;
use crate::SessionContext;

// ============================================================================
// SyncSummary
// ============================================================================

/// Summary of one engine batch
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Groups that reached `Completed`
    pub completed: u32,
    /// Groups that reached `Partial`
    pub partial: u32,
    /// Groups that reached `Skipped`
    pub skipped: u32,
    /// Groups that were stopped by cancellation
    pub stopped: u32,
    /// Non-fatal errors collected along the way
    pub errors: Vec<String>,
    /// Wall-clock duration of the batch in milliseconds
    pub duration_ms: u64,
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Drives the per-group transfer loop
///
/// ## Dependencies
///
/// - `store`: remote listings and transfers
/// - `ledger`: durable completion record, written once per finished group
/// - `ctx`: immutable session settings (target root, mp4 flag, strategy)
/// - `events`: sole producer side of the progress channel
/// - `stops`: cooperative cancellation flags shared with the consumer
pub struct SyncEngine {
    store: Arc<dyn ObjectStore>,
    ledger: Arc<dyn CompletionLedger>,
    ctx: SessionContext,
    events: EventSender,
    stops: StopFlags,
}

impl SyncEngine {
    /// Creates an engine for one session
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn CompletionLedger>,
        ctx: SessionContext,
        events: EventSender,
        stops: StopFlags,
    ) -> Self {
        Self {
            store,
            ledger,
            ctx,
            events,
            stops,
        }
    }

    /// Syncs a batch of groups in the order given
    ///
    /// Counters are reset and a `Pending` status announced for every group
    /// first, then groups are processed one at a time. Always returns a
    /// summary; per-group failures never abort the batch.
    pub async fn sync(&self, groups: &mut [SyncGroup]) -> SyncSummary {
        let start = Instant::now();
        let mut summary = SyncSummary::default();

        info!(groups = groups.len(), "Sync batch starting");

        // Announce the batch before any transfer begins
        for group in groups.iter_mut() {
            group.reset_for_sync();
            self.events.log(format!("[{}] Pending.", group.prefix()));
            self.events.status(group.prefix(), GroupStatus::Pending);
        }

        for group in groups.iter_mut() {
            self.sync_group(group, &mut summary).await;
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        self.events.log("All sync tasks completed.".to_string());
        self.events.done();

        info!(
            completed = summary.completed,
            partial = summary.partial,
            skipped = summary.skipped,
            stopped = summary.stopped,
            errors = summary.errors.len(),
            duration_ms = summary.duration_ms,
            "Sync batch finished"
        );

        summary
    }

    /// Runs one group to a terminal status
    async fn sync_group(&self, group: &mut SyncGroup, summary: &mut SyncSummary) {
        let prefix = group.prefix().clone();

        if self.stops.is_stopped(&prefix) {
            self.events.log(format!("[{prefix}] Stopped."));
            self.set_status(group, GroupStatus::Stopped);
            summary.stopped += 1;
            return;
        }

        if group.total() == 0 {
            self.events.log(format!("[{prefix}] no files to download."));
            return;
        }

        // Live listing at sync time so remote changes since refresh are
        // picked up for object existence (mappings are not regenerated)
        let keys = match self.store.list_objects(&prefix).await {
            Ok(keys) => keys,
            Err(err) => {
                let msg = format!("[{prefix}] failed to list objects: {err}");
                warn!(%msg);
                self.events.log(msg.clone());
                summary.errors.push(msg);
                self.set_status(group, GroupStatus::Skipped);
                summary.skipped += 1;
                return;
            }
        };

        self.set_status(group, GroupStatus::Downloading);

        for key in &keys {
            if self.stops.is_stopped(&prefix) {
                self.events.log(format!("[{prefix}] Stopped."));
                self.set_status(group, GroupStatus::Stopped);
                summary.stopped += 1;
                return;
            }

            if !is_syncable_object(key, &prefix, self.ctx.include_mp4) {
                continue;
            }

            let relative = prefix.relative_of(key);
            // Unmapped keys are skipped silently: not downloaded, not
            // counted, total untouched
            let Some(mapping) = group.mappings().get(relative) else {
                continue;
            };

            let dest = destination_path(&self.ctx.target_root, group.local_name(), &mapping.new);

            if let Some(parent) = dest.parent() {
                if let Err(err) = tokio::fs::create_dir_all(parent).await {
                    let msg = format!(
                        "[{prefix}] failed to create directory {}: {err}",
                        parent.display()
                    );
                    warn!(%msg);
                    self.events.log(msg.clone());
                    summary.errors.push(msg);
                    continue;
                }
            }

            let already_present = tokio::fs::try_exists(&dest).await.unwrap_or(false);
            if already_present {
                self.events
                    .log(format!("Skipped, already present: {}", dest.display()));
            } else {
                self.events
                    .log(format!("Download start for: {}", dest.display()));
                if let Err(err) = self.store.download_object(key, &dest).await {
                    let msg = format!("[{prefix}] failed to download {key}: {err}");
                    warn!(%msg);
                    self.events.log(msg.clone());
                    summary.errors.push(msg);
                    continue;
                }
            }

            match group.record_download() {
                Ok(downloaded) => self.events.progress(&prefix, downloaded),
                Err(err) => {
                    // A matched object beyond the expected total; count it
                    // as an error rather than let the invariant break
                    let msg = format!("[{prefix}] {err}");
                    warn!(%msg);
                    summary.errors.push(msg);
                }
            }
        }

        self.finish_group(group, summary).await;
    }

    /// Derives and emits the terminal status after a full pass
    async fn finish_group(&self, group: &mut SyncGroup, summary: &mut SyncSummary) {
        let prefix = group.prefix().clone();

        if group.is_complete() {
            self.set_status(group, GroupStatus::Completed);
            self.events.log(format!("[{prefix}] Completed."));
            summary.completed += 1;

            if let Err(err) = self.ledger.mark_complete(&prefix).await {
                let msg = format!("[{prefix}] failed to record completion: {err}");
                warn!(%msg);
                self.events.log(msg.clone());
                summary.errors.push(msg);
            }
        } else if self.stops.is_stopped(&prefix) {
            self.events.log(format!("[{prefix}] Stopped."));
            self.set_status(group, GroupStatus::Stopped);
            summary.stopped += 1;
        } else if group.downloaded() > 0 {
            self.events.log(format!("[{prefix}] Partial done."));
            self.set_status(group, GroupStatus::Partial);
            summary.partial += 1;
        } else {
            self.events.log(format!("[{prefix}] Skipped."));
            self.set_status(group, GroupStatus::Skipped);
            summary.skipped += 1;
        }
    }

    fn set_status(&self, group: &mut SyncGroup, status: GroupStatus) {
        group.set_status(status);
        self.events.status(group.prefix(), status);
        debug!(prefix = %group.prefix(), %status, "Status transition");
    }
}

/// Joins the target root, the group's local folder and a mapping's relative
/// destination, normalizing `/` separators for the local platform
fn destination_path(root: &Path, local_name: &str, relative: &str) -> PathBuf {
    let mut path = root.join(local_name);
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}
