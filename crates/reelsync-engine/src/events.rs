//! Progress event channel
//!
//! The orchestrator is the sole producer and the presentation layer the sole
//! consumer of a [`SyncEvent`] stream. Events are emitted immediately, never
//! batched; the channel is unbounded so a slow consumer can never stall a
//! transfer.

use tokio::sync::mpsc;
use tracing::debug;

use reelsync_core::domain::group::GroupStatus;
use reelsync_core::domain::newtypes::GroupPrefix;

/// One event on the orchestrator-to-consumer stream
///
/// All updates are keyed by group prefix; no ordering is guaranteed across
/// groups. Within one group, `Progress` counts are non-decreasing until a
/// terminal `Status` arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The group's downloaded counter advanced
    Progress { prefix: String, downloaded: u64 },
    /// The group transitioned to a new status
    Status { prefix: String, status: GroupStatus },
    /// A human-readable log line
    Log(String),
    /// The worker finished its batch
    Done,
}

/// Producer half of the event channel
///
/// Sends never block. A dropped consumer is tolerated: the orchestrator
/// keeps running to its terminal states and the events go nowhere.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl EventSender {
    /// Emits a progress increment for a group
    pub fn progress(&self, prefix: &GroupPrefix, downloaded: u64) {
        self.send(SyncEvent::Progress {
            prefix: prefix.as_str().to_string(),
            downloaded,
        });
    }

    /// Emits a status transition for a group
    pub fn status(&self, prefix: &GroupPrefix, status: GroupStatus) {
        self.send(SyncEvent::Status {
            prefix: prefix.as_str().to_string(),
            status,
        });
    }

    /// Emits a log line
    pub fn log(&self, message: impl Into<String>) {
        self.send(SyncEvent::Log(message.into()));
    }

    /// Signals that the worker finished its batch
    pub fn done(&self) {
        self.send(SyncEvent::Done);
    }

    fn send(&self, event: SyncEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event consumer dropped, discarding event");
        }
    }
}

/// Creates the event channel: one sender for the orchestrator, one receiver
/// for the consumer
#[must_use]
pub fn channel() -> (EventSender, mpsc::UnboundedReceiver<SyncEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}
