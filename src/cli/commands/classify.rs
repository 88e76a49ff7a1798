//! Classify command implementation.
//!
//! `icaclean classify` labels the components of an ICA directory whose
//! features have already been extracted.

use std::path::Path;

use crate::cli::args::ClassifyArgs;
use crate::error::Result;
use crate::naming::IcaDir;
use crate::settings::Settings;
use crate::stages::{classify_stage, resolve_training};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::execute_stages;

/// The classify command implementation.
pub struct ClassifyCommand {
    args: ClassifyArgs,
}

impl ClassifyCommand {
    pub fn new(args: ClassifyArgs) -> Self {
        Self { args }
    }
}

/// Pick the classification threshold: explicit flag, else settings.
pub(crate) fn effective_threshold(explicit: Option<u32>, settings: &Settings) -> u32 {
    explicit.unwrap_or(settings.default_threshold)
}

/// Resolve training data for a command, logging the choice.
pub(crate) fn effective_training(
    ctx: &CommandContext,
    settings: &Settings,
    explicit: Option<&str>,
) -> Result<std::path::PathBuf> {
    let training = resolve_training(&ctx.root, settings, explicit)?;
    tracing::debug!(training = %training.display(), "resolved training file");
    Ok(training)
}

impl Command for ClassifyCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult> {
        let settings = ctx.settings()?;
        let ica = IcaDir::open(&self.args.ica_dir)?;
        ica.require_features()?;

        let training = effective_training(ctx, &settings, self.args.training.as_deref())?;
        let threshold = effective_threshold(self.args.threshold, &settings);

        let stage = classify_stage(
            &settings,
            ctx.dry_run,
            &ica,
            Path::new(&training),
            threshold,
        )?;
        execute_stages(ctx, "classify", ica.root(), &[stage])
    }
}
