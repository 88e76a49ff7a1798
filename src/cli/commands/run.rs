//! Run command implementation.
//!
//! `icaclean run` chains the full pipeline over a prepared ICA
//! directory: extract features, classify them, apply cleanup. The later
//! stages consume files the earlier ones produce, so only the inputs
//! that must exist before anything runs are validated up front.

use std::path::Path;

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::naming::{training_stem, IcaDir};
use crate::stages::{apply_stages, classify_stage, features_stage, CleanupOptions, Stage};

use super::classify::{effective_threshold, effective_training};
use super::dispatcher::{Command, CommandContext, CommandResult};
use super::execute_stages;

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }
}

impl Command for RunCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let ica = IcaDir::open(&self.args.ica_dir)?;

        let training = effective_training(ctx, &settings, self.args.training.as_deref())?;
        let threshold = effective_threshold(self.args.threshold, &settings);
        let labels = ica.label_file(&training_stem(&training), threshold);

        let opts = CleanupOptions {
            aggressive: self.args.aggressive,
            motion: self.args.motion,
            motion_highpass: self.args.motion_highpass,
            cifti: self.args.cifti,
        };

        let mut stages: Vec<Stage> = Vec::new();
        stages.push(features_stage(&settings, ctx.dry_run, &ica)?);
        stages.push(classify_stage(
            &settings,
            ctx.dry_run,
            &ica,
            Path::new(&training),
            threshold,
        )?);
        stages.extend(apply_stages(&settings, ctx.dry_run, &ica, &labels, &opts)?);

        execute_stages(ctx, "run", ica.root(), &stages)
    }
}
