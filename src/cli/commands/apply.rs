//! Apply command implementation.
//!
//! `icaclean apply` regresses labelled noise components out of the
//! functional image and installs the denoised outputs under their
//! canonical names.

use std::path::PathBuf;

use crate::cli::args::ApplyArgs;
use crate::error::{IcacleanError, Result};
use crate::naming::{training_stem, IcaDir};
use crate::stages::{apply_stages, CleanupOptions};

use super::classify::{effective_threshold, effective_training};
use super::dispatcher::{Command, CommandContext, CommandResult};
use super::execute_stages;

/// The apply command implementation.
pub struct ApplyCommand {
    args: ApplyArgs,
}

impl ApplyCommand {
    pub fn new(args: ApplyArgs) -> Self {
        Self { args }
    }

    /// Label file to clean against: explicit flag, else the name derived
    /// from training and threshold.
    fn label_file(
        &self,
        ctx: &CommandContext,
        settings: &crate::settings::Settings,
        ica: &IcaDir,
    ) -> Result<PathBuf> {
        if let Some(labels) = &self.args.labels {
            return Ok(labels.clone());
        }
        let training = effective_training(ctx, settings, self.args.training.as_deref())?;
        let threshold = effective_threshold(self.args.threshold, settings);
        Ok(ica.label_file(&training_stem(&training), threshold))
    }
}

impl Command for ApplyCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let ica = IcaDir::open(&self.args.ica_dir)?;

        let labels = self.label_file(ctx, &settings, &ica)?;
        if !labels.is_file() {
            return Err(IcacleanError::InvalidInput {
                message: format!("label file {} does not exist", labels.display()),
            });
        }

        let opts = CleanupOptions {
            aggressive: self.args.aggressive,
            motion: self.args.motion,
            motion_highpass: self.args.motion_highpass,
            cifti: self.args.cifti,
        };

        let stages = apply_stages(&settings, ctx.dry_run, &ica, &labels, &opts)?;
        execute_stages(ctx, "apply", ica.root(), &stages)
    }
}
