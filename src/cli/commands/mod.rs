//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a
//! uniform interface for executing commands and reporting results.
//! Commands are routed by [`CommandDispatcher`]; shared execution state
//! (install root, output writer, dry-run flag) lives in
//! [`CommandContext`].

pub mod apply;
pub mod check;
pub mod classify;
pub mod completions;
pub mod dispatcher;
pub mod extract;
pub mod history;
pub mod prepare;
pub mod run;
pub mod version;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};

use std::path::Path;

use crate::error::Result;
use crate::stages::Stage;
use crate::state::{HistoryStore, RunRecordBuilder};

/// Execute planned stages in order, recording history.
///
/// Shared by every pipeline command. Dry runs print plans and record
/// nothing; real runs append a history record whether they succeed or
/// fail.
pub(crate) fn execute_stages(
    ctx: &CommandContext,
    command_name: &str,
    dataset: &Path,
    stages: &[Stage],
) -> Result<CommandResult> {
    let executor = ctx.executor();
    let mut builder = RunRecordBuilder::start(command_name, dataset);

    for stage in stages {
        match executor.run_stage(stage) {
            Ok(outcome) => builder.stage(&outcome),
            Err(e) => {
                if !ctx.dry_run {
                    HistoryStore::record_best_effort(
                        &ctx.root,
                        builder.finish_failed(&e.to_string()),
                    );
                }
                return Err(e);
            }
        }
    }

    if ctx.dry_run {
        ctx.output.println(&format!(
            "{} (dry-run mode, nothing executed)",
            ctx.theme.dim.apply_to("Planned only")
        ));
    } else {
        HistoryStore::record_best_effort(&ctx.root, builder.finish_success());
        ctx.output
            .println(&ctx.theme.format_success(&format!("{} complete", command_name)));
    }

    Ok(CommandResult::success())
}
