//! Sync command - run the sync engine for all or selected groups
//!
//! Provides the `reelsync sync` CLI command which:
//! 1. Refreshes the group list (ledger-gated)
//! 2. Selects the pending groups, or exactly the requested prefixes
//! 3. Runs the engine in a worker task and drains the event channel on a
//!    fixed interval, rendering progress as it happens
//! 4. Requests a cooperative stop of every in-flight group on Ctrl-C

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use reelsync_core::config::Config;
use reelsync_core::domain::group::{GroupStatus, SyncGroup};
use reelsync_engine::cancel::StopFlags;
use reelsync_engine::engine::{SyncEngine, SyncSummary};
use reelsync_engine::events::{channel, SyncEvent};
use reelsync_engine::refresh::refresh_groups;
use reelsync_engine::{EngineError, SessionContext};

use crate::commands::{open_ledger, open_store};
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// How often the consumer drains the worker's event channel
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Sync only this group prefix (repeatable); default is every group
    /// not yet recorded complete
    #[arg(long = "prefix")]
    pub prefixes: Vec<String>,
}

impl SyncCommand {
    pub async fn execute(&self, format: OutputFormat, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = Config::load_or_default(config_path);
        if let Err(err) = config.ensure_ready() {
            formatter.error(&err.to_string());
            return Ok(());
        }

        let store = open_store(&config);
        let ledger = open_ledger().await?;
        let ctx = SessionContext::from_config(&config);

        // Step 1: refresh the group list
        let (refresh_events, mut refresh_rx) = channel();
        let groups = match refresh_groups(&store, &ledger, &ctx, &refresh_events).await {
            Ok(groups) => groups,
            Err(EngineError::Store(err)) if err.is_credentials() => {
                formatter.error(&format!("Invalid or missing credentials: {err}"));
                return Ok(());
            }
            Err(err) => {
                formatter.error(&format!("Failed to refresh groups: {err}"));
                return Ok(());
            }
        };
        while let Ok(event) = refresh_rx.try_recv() {
            if let SyncEvent::Log(message) = event {
                formatter.log_line(&message);
            }
        }

        // Step 2: select the batch
        let selected = self.select_groups(groups, formatter.as_ref());
        if selected.is_empty() {
            formatter.success("Nothing to sync.");
            return Ok(());
        }
        formatter.info(&format!("Syncing {} group(s)...", selected.len()));

        let totals: HashMap<String, u64> = selected
            .iter()
            .map(|g| (g.prefix().as_str().to_string(), g.total()))
            .collect();

        // Step 3: run the engine in a worker task
        let stops = StopFlags::new();
        let (events, mut rx) = channel();
        let engine = SyncEngine::new(store, ledger, ctx, events, stops.clone());

        let ctrlc_stops = stops.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, requesting stop for all groups");
                ctrlc_stops.request_stop_all();
            }
        });

        let worker = tokio::spawn(async move {
            let mut batch = selected;
            let summary = engine.sync(&mut batch).await;
            (summary, batch)
        });

        // Step 4: fixed-interval drain of the event channel
        let mut ticker = tokio::time::interval(DRAIN_INTERVAL);
        let mut done = false;
        while !done {
            ticker.tick().await;
            while let Ok(event) = rx.try_recv() {
                if matches!(event, SyncEvent::Done) {
                    done = true;
                }
                render_event(&event, &totals, formatter.as_ref());
            }
            if worker.is_finished() {
                done = true;
            }
        }
        while let Ok(event) = rx.try_recv() {
            render_event(&event, &totals, formatter.as_ref());
        }

        let (summary, batch) = worker.await.context("Sync worker panicked")?;
        render_summary(format, &summary, &batch, formatter.as_ref());

        Ok(())
    }

    /// Picks the batch: explicit prefixes when given (even if already
    /// completed), otherwise every group not recorded complete
    fn select_groups(
        &self,
        groups: Vec<SyncGroup>,
        formatter: &dyn OutputFormatter,
    ) -> Vec<SyncGroup> {
        if self.prefixes.is_empty() {
            return groups
                .into_iter()
                .filter(|g| g.status() != GroupStatus::Completed)
                .collect();
        }

        let mut selected = Vec::new();
        for requested in &self.prefixes {
            let normalized = if requested.ends_with('/') {
                requested.clone()
            } else {
                format!("{requested}/")
            };
            match groups.iter().find(|g| g.prefix().as_str() == normalized) {
                Some(group) => selected.push(group.clone()),
                None => formatter.warn(&format!("No such group: {normalized}")),
            }
        }
        selected
    }
}

fn render_event(
    event: &SyncEvent,
    totals: &HashMap<String, u64>,
    formatter: &dyn OutputFormatter,
) {
    match event {
        SyncEvent::Progress { prefix, downloaded } => {
            let total = totals.get(prefix).copied().unwrap_or(0);
            formatter.info(&format!("[{prefix}] {downloaded}/{total}"));
        }
        SyncEvent::Status { prefix, status } => {
            formatter.info(&format!("[{prefix}] status: {status}"));
        }
        SyncEvent::Log(message) => formatter.log_line(message),
        SyncEvent::Done => {}
    }
}

fn render_summary(
    format: OutputFormat,
    summary: &SyncSummary,
    groups: &[SyncGroup],
    formatter: &dyn OutputFormatter,
) {
    if matches!(format, OutputFormat::Json) {
        let json = serde_json::json!({
            "completed": summary.completed,
            "partial": summary.partial,
            "skipped": summary.skipped,
            "stopped": summary.stopped,
            "errors": summary.errors,
            "duration_ms": summary.duration_ms,
            "groups": groups.iter().map(|g| serde_json::json!({
                "prefix": g.prefix().as_str(),
                "downloaded": g.downloaded(),
                "total": g.total(),
                "status": g.status().as_str(),
            })).collect::<Vec<_>>(),
        });
        formatter.print_json(&json);
        return;
    }

    let duration_display = if summary.duration_ms >= 1000 {
        format!("{:.1}s", summary.duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", summary.duration_ms)
    };
    formatter.success(&format!("Sync finished in {duration_display}"));

    for group in groups {
        formatter.info(&format!(
            "{:<40} {:>12}  {}",
            group.prefix().as_str(),
            format!("{}/{}", group.downloaded(), group.total()),
            group.status()
        ));
    }

    if !summary.errors.is_empty() {
        formatter.error(&format!(
            "{} error{} occurred:",
            summary.errors.len(),
            if summary.errors.len() == 1 { "" } else { "s" }
        ));
        for err in &summary.errors {
            formatter.info(&format!("  - {err}"));
        }
    }
}
