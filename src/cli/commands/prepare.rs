//! Prepare command implementation.
//!
//! `icaclean prepare` takes one or more 4D runs through highpass
//! filtering, merges multi-run input, installs the result in a fresh
//! ICA-directory layout, and runs melodic.

use crate::cli::args::PrepareArgs;
use crate::error::Result;
use crate::stages::prepare_stages;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::execute_stages;

/// The prepare command implementation.
pub struct PrepareCommand {
    args: PrepareArgs,
}

impl PrepareCommand {
    pub fn new(args: PrepareArgs) -> Self {
        Self { args }
    }
}

impl Command for PrepareCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let sigma = self.args.highpass.unwrap_or(settings.highpass_sigma);

        let stages = prepare_stages(
            &settings,
            ctx.dry_run,
            &self.args.inputs,
            &self.args.out,
            self.args.tr,
            sigma,
        )?;

        execute_stages(ctx, "prepare", &self.args.out, &stages)
    }
}
