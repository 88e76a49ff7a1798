//! History command implementation.
//!
//! `icaclean history` shows recorded pipeline runs, most recent first.

use crate::cli::args::HistoryArgs;
use crate::error::{IcacleanError, Result};
use crate::state::{HistoryStore, RunRecord, RunStatus};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The history command implementation.
pub struct HistoryCommand {
    args: HistoryArgs,
}

impl HistoryCommand {
    pub fn new(args: HistoryArgs) -> Self {
        Self { args }
    }

    fn render_record(&self, ctx: &CommandContext, record: &RunRecord) -> String {
        let status = match record.status {
            RunStatus::Success => ctx.theme.success.apply_to("ok ").to_string(),
            RunStatus::Failed => ctx.theme.error.apply_to("fail").to_string(),
        };
        let stages: Vec<&str> = record.stages.iter().map(|s| s.name.as_str()).collect();
        format!(
            "{}  {:<9} {}  {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.command,
            status,
            ctx.theme.dim.apply_to(format!("{}ms", record.duration_ms)),
            ctx.theme.dim.apply_to(stages.join(", "))
        )
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let store = HistoryStore::load(&ctx.root);
        let recent: Vec<&RunRecord> = store
            .records()
            .iter()
            .rev()
            .take(self.args.limit)
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&recent)
                .map_err(|e| IcacleanError::Other(e.into()))?;
            ctx.output.result(&json);
            return Ok(CommandResult::success());
        }

        if recent.is_empty() {
            ctx.output.println("No runs recorded.");
            return Ok(CommandResult::success());
        }

        for record in recent {
            ctx.output.result(&self.render_record(ctx, record));
        }

        Ok(CommandResult::success())
    }
}
