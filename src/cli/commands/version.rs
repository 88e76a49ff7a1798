//! Version command implementation.
//!
//! `icaclean version` resolves the install version from the files under
//! `versioning/` plus repository metadata, and prints either the version
//! string alone (`--short`) or the full report.

use crate::cli::args::VersionArgs;
use crate::error::Result;
use crate::version::{resolve, GitMetadata, ResolverConfig};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The version command implementation.
pub struct VersionCommand {
    args: VersionArgs,
}

impl VersionCommand {
    pub fn new(args: VersionArgs) -> Self {
        Self { args }
    }
}

impl Command for VersionCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let config =
            ResolverConfig::new(&ctx.root).with_hide_candidate(self.args.hide_rc.clone());
        let resolved = resolve(&config, &GitMetadata::new())?;

        if self.args.short {
            ctx.output.result(&resolved.display_string());
        } else {
            ctx.output.result(resolved.report(&ctx.theme).trim_end());
        }

        Ok(CommandResult::success())
    }
}
