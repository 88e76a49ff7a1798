//! Check command implementation.
//!
//! `icaclean check` probes every external tool the pipeline can invoke
//! and reports what resolved where. Missing required tools make the
//! command fail so batch scripts can gate on it.

use crate::cli::args::CheckArgs;
use crate::detection::{missing_required, probe_all, ToolStatus};
use crate::error::Result;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    #[allow(dead_code)]
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    fn render_status(&self, ctx: &CommandContext, status: &ToolStatus) -> String {
        let name = format!("{:<12}", status.tool.to_string());
        match &status.path {
            Some(path) => {
                let version = status
                    .version
                    .as_deref()
                    .map(|v| format!(" ({})", v))
                    .unwrap_or_default();
                ctx.theme.format_success(&format!(
                    "{} {}{}",
                    name,
                    ctx.theme.dim.apply_to(path.display().to_string()),
                    version
                ))
            }
            None if status.required => ctx.theme.format_error(&format!("{} not found", name)),
            None => ctx
                .theme
                .format_skipped(&format!("{} not found (optional)", name)),
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let statuses = probe_all(&settings);

        ctx.output.println(&format!(
            "{} (matlab mode: {})",
            ctx.theme.highlight.apply_to("External tools"),
            settings.matlab_mode
        ));
        for status in &statuses {
            ctx.output.println(&self.render_status(ctx, status));
        }

        if missing_required(&statuses) {
            ctx.output.println("");
            ctx.output.println(
                "Required tools are missing. Set fsl_dir in .icaclean/settings.yml or FSLDIR.",
            );
            return Ok(CommandResult::failure(1));
        }

        Ok(CommandResult::success())
    }
}
