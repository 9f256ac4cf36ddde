//! Clear command - remove a group's completion record
//!
//! `reelsync clear --prefix showA/` drops the group from the ledger so the
//! next refresh re-lists it and the next sync transfers from scratch
//! (existing local files still count through the idempotency rule).

use std::path::Path;

use anyhow::Result;
use clap::Args;

use reelsync_core::domain::newtypes::GroupPrefix;

use crate::commands::open_ledger;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ClearCommand {
    /// The group prefix to clear
    #[arg(long)]
    pub prefix: String,
}

impl ClearCommand {
    pub async fn execute(&self, format: OutputFormat, _config_path: &Path) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let normalized = if self.prefix.ends_with('/') {
            self.prefix.clone()
        } else {
            format!("{}/", self.prefix)
        };

        let prefix = match GroupPrefix::new(normalized) {
            Ok(prefix) => prefix,
            Err(err) => {
                formatter.error(&err.to_string());
                return Ok(());
            }
        };

        let ledger = open_ledger().await?;
        if !ledger.is_complete(&prefix).await {
            formatter.warn(&format!("Group {prefix} is not recorded complete."));
            return Ok(());
        }

        ledger.clear(&prefix).await?;
        formatter.success(&format!("Cleared completion record for {prefix}"));
        Ok(())
    }
}
