//! Group refresh - discovery and mapping resolution
//!
//! Enumerates the bucket's top-level groups and builds a [`SyncGroup`] for
//! each. Groups recorded in the completion ledger are materialized as
//! `Completed` without touching the network again; everything else gets a
//! live listing and, under the structured strategy, a sidecar fetch.
//!
//! A failure for one group is logged and that group is left out of the
//! result; only the top-level enumeration aborts the whole refresh.

use std::sync::Arc;

use tracing::{info, warn};

use reelsync_core::domain::group::SyncGroup;
use reelsync_core::domain::newtypes::GroupPrefix;
use reelsync_core::ports::ledger::CompletionLedger;
use reelsync_core::ports::object_store::{ObjectStore, StoreError};
use reelsync_core::config::MappingStrategy;
use reelsync_mapping::resolver::{locate_sidecar, passthrough_plan, structured_plan, GroupPlan};
use reelsync_mapping::sidecar::{parse_rows, SidecarRow};

use crate::events::EventSender;
use crate::{EngineError, SessionContext};

/// Discovers all top-level groups and resolves their mappings
///
/// # Errors
/// Returns [`EngineError::Store`] when the top-level enumeration fails;
/// credential rejections arrive as `StoreError::Credentials` for the caller
/// to surface as a blocking error.
pub async fn refresh_groups(
    store: &Arc<dyn ObjectStore>,
    ledger: &Arc<dyn CompletionLedger>,
    ctx: &SessionContext,
    events: &EventSender,
) -> Result<Vec<SyncGroup>, EngineError> {
    let prefixes = store.list_groups().await?;
    info!(groups = prefixes.len(), "Enumerated top-level groups");

    let mut groups = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        if ledger.is_complete(&prefix).await {
            // Already fully synced: no listing, no sidecar fetch
            groups.push(SyncGroup::completed(prefix));
            continue;
        }

        match resolve_group(store.as_ref(), ctx, &prefix, events).await {
            Ok(plan) => groups.push(SyncGroup::new(
                plan.prefix,
                plan.local_name,
                plan.mappings,
                plan.total,
                plan.data_parsed,
            )),
            Err(err) => {
                warn!(prefix = %prefix, %err, "Failed to collect group info");
                events.log(format!("[{prefix}] error collecting info: {err}"));
            }
        }
    }

    events.log(format!("Refreshed list: {} folders.", groups.len()));
    Ok(groups)
}

/// Builds the mapping plan for one group under the session's strategy
async fn resolve_group(
    store: &dyn ObjectStore,
    ctx: &SessionContext,
    prefix: &GroupPrefix,
    events: &EventSender,
) -> Result<GroupPlan, StoreError> {
    let keys = store.list_objects(prefix).await?;

    match ctx.strategy {
        MappingStrategy::Passthrough => Ok(passthrough_plan(prefix, &keys, ctx.include_mp4)),
        MappingStrategy::Structured => {
            let rows = fetch_sidecar_rows(store, prefix, &keys, events).await;
            Ok(structured_plan(prefix, &keys, &rows, ctx.include_mp4))
        }
    }
}

/// Fetches and parses the group's sidecar, if any
///
/// Fetch and parse failures degrade to an empty row set so the group still
/// appears with raw-count totals instead of disappearing from the list.
async fn fetch_sidecar_rows(
    store: &dyn ObjectStore,
    prefix: &GroupPrefix,
    keys: &[reelsync_core::domain::newtypes::ObjectKey],
    events: &EventSender,
) -> Vec<SidecarRow> {
    let Some(sidecar_key) = locate_sidecar(prefix, keys) else {
        return Vec::new();
    };

    let bytes = match store.fetch_object(sidecar_key).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(prefix = %prefix, key = %sidecar_key, %err, "Sidecar fetch failed");
            events.log(format!("[{prefix}] sidecar fetch error: {err}"));
            return Vec::new();
        }
    };

    match parse_rows(&bytes) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(prefix = %prefix, key = %sidecar_key, %err, "Sidecar parse failed");
            events.log(format!("[{prefix}] sidecar parse error: {err}"));
            Vec::new()
        }
    }
}
