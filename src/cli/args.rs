//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// icaclean - ICA-based fMRI denoising pipeline driver.
#[derive(Debug, Parser)]
#[command(name = "icaclean")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Install root (overrides current directory)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Show verbose output, including captured tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print planned commands and file operations without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the install version
    Version(VersionArgs),

    /// Check that the external tools the pipeline needs are available
    Check(CheckArgs),

    /// Highpass-filter input run(s) and decompose with melodic
    Prepare(PrepareArgs),

    /// Extract component features from a prepared ICA directory
    Extract(ExtractArgs),

    /// Classify components against a training file
    Classify(ClassifyArgs),

    /// Apply cleanup for labelled components
    Apply(ApplyArgs),

    /// Full pipeline: extract, classify, apply
    Run(RunArgs),

    /// Show recorded pipeline runs
    History(HistoryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `version` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VersionArgs {
    /// Print the version string alone
    #[arg(long)]
    pub short: bool,

    /// Present a release candidate as final (must equal the base version)
    #[arg(long, env = "ICACLEAN_HIDE_RC", hide = true)]
    pub hide_rc: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {}

/// Arguments for the `prepare` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PrepareArgs {
    /// Input 4D image(s); multiple runs are merged after filtering
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output ICA directory to create
    #[arg(short, long)]
    pub out: PathBuf,

    /// Repetition time in seconds
    #[arg(long)]
    pub tr: f64,

    /// Highpass sigma in seconds (overrides settings)
    #[arg(long, value_name = "SIGMA")]
    pub highpass: Option<f64>,
}

/// Arguments for the `extract` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ExtractArgs {
    /// Prepared ICA directory
    pub ica_dir: PathBuf,
}

/// Arguments for the `classify` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ClassifyArgs {
    /// ICA directory with extracted features
    pub ica_dir: PathBuf,

    /// Training file: a path, or a name under training_files/
    #[arg(short, long)]
    pub training: Option<String>,

    /// Classification threshold, 0-100
    #[arg(long)]
    pub threshold: Option<u32>,
}

/// Arguments for the `apply` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ApplyArgs {
    /// ICA directory with a component label file
    pub ica_dir: PathBuf,

    /// Label file (default: derived from training and threshold)
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Training file the labels came from (names the default label file)
    #[arg(short, long)]
    pub training: Option<String>,

    /// Threshold the labels came from (names the default label file)
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Regress out the full noise-component timecourses
    #[arg(short = 'A', long)]
    pub aggressive: bool,

    /// Also regress motion confounds
    #[arg(short = 'm', long)]
    pub motion: bool,

    /// Highpass the motion confounds first, sigma in seconds
    #[arg(long, value_name = "SIGMA")]
    pub motion_highpass: Option<f64>,

    /// Export the denoised image to CIFTI
    #[arg(long)]
    pub cifti: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Prepared ICA directory
    pub ica_dir: PathBuf,

    /// Training file: a path, or a name under training_files/
    #[arg(short, long)]
    pub training: Option<String>,

    /// Classification threshold, 0-100
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Regress out the full noise-component timecourses
    #[arg(short = 'A', long)]
    pub aggressive: bool,

    /// Also regress motion confounds
    #[arg(short = 'm', long)]
    pub motion: bool,

    /// Highpass the motion confounds first, sigma in seconds
    #[arg(long, value_name = "SIGMA")]
    pub motion_highpass: Option<f64>,

    /// Export the denoised image to CIFTI
    #[arg(long)]
    pub cifti: bool,
}

/// Arguments for the `history` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HistoryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show at most this many runs
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
