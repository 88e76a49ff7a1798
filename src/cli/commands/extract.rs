//! Extract command implementation.
//!
//! `icaclean extract` runs feature extraction over a prepared ICA
//! directory.

use crate::cli::args::ExtractArgs;
use crate::error::Result;
use crate::naming::IcaDir;
use crate::stages::features_stage;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::execute_stages;

/// The extract command implementation.
pub struct ExtractCommand {
    args: ExtractArgs,
}

impl ExtractCommand {
    pub fn new(args: ExtractArgs) -> Self {
        Self { args }
    }
}

impl Command for ExtractCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let ica = IcaDir::open(&self.args.ica_dir)?;

        let stage = features_stage(&settings, ctx.dry_run, &ica)?;
        execute_stages(ctx, "extract", ica.root(), &[stage])
    }
}
