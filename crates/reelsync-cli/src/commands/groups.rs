//! Groups command - list remote groups and their sync state
//!
//! Provides the `reelsync groups` CLI command which:
//! 1. Loads configuration and opens the ledger
//! 2. Enumerates top-level groups and resolves their mappings
//! 3. Renders prefix, local folder name, progress and status per group
//!
//! This doubles as the credentials test: a rejected key pair is surfaced
//! as a blocking error rather than a log line.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use reelsync_core::config::Config;
use reelsync_core::domain::group::{GroupStatus, SyncGroup};
use reelsync_engine::events::{channel, SyncEvent};
use reelsync_engine::refresh::refresh_groups;
use reelsync_engine::{EngineError, SessionContext};

use crate::commands::{open_ledger, open_store};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct GroupsCommand {}

impl GroupsCommand {
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
        let (events, mut rx) = channel();

        let result = refresh_groups(&store, &ledger, &ctx, &events).await;

        // The refresh worker only emits log lines; surface them after the run
        while let Ok(event) = rx.try_recv() {
            if let SyncEvent::Log(message) = event {
                formatter.log_line(&message);
            }
        }

        let groups = match result {
            Ok(groups) => groups,
            Err(EngineError::Store(err)) if err.is_credentials() => {
                formatter.error(&format!("Invalid or missing credentials: {err}"));
                return Ok(());
            }
            Err(err) => {
                formatter.error(&format!("Failed to list groups: {err}"));
                return Ok(());
            }
        };

        if groups.is_empty() {
            formatter.warn(
                "No top-level groups found (bucket might have objects at root or be empty).",
            );
            return Ok(());
        }

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::Value::Array(groups.iter().map(group_json).collect());
            formatter.print_json(&json);
        } else {
            formatter.info(&format!(
                "{:<40} {:<32} {:>12}  {}",
                "Group (prefix)", "Local folder", "Progress", "Status"
            ));
            for group in &groups {
                formatter.info(&format!(
                    "{:<40} {:<32} {:>12}  {}",
                    group.prefix().as_str(),
                    group.local_name(),
                    progress_cell(group),
                    group.status()
                ));
            }
            formatter.success(&format!("{} groups in bucket '{}'", groups.len(), config.store.bucket));
        }

        Ok(())
    }
}

/// Progress column: completed groups from the ledger carry no counts
fn progress_cell(group: &SyncGroup) -> String {
    if group.status() == GroupStatus::Completed && group.total() == 0 {
        "synced".to_string()
    } else {
        format!("{}/{}", group.downloaded(), group.total())
    }
}

fn group_json(group: &SyncGroup) -> serde_json::Value {
    serde_json::json!({
        "prefix": group.prefix().as_str(),
        "local_name": group.local_name(),
        "downloaded": group.downloaded(),
        "total": group.total(),
        "data_parsed": group.data_parsed(),
        "status": group.status().as_str(),
    })
}
