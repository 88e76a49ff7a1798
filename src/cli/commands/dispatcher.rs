//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for shared execution state
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::settings::{load_settings, EnvOverrides, Settings};
use crate::stages::Executor;
use crate::ui::{Output, OutputMode, Theme};

/// Shared state every command executes against.
pub struct CommandContext {
    /// Install root.
    pub root: PathBuf,
    /// Verbosity-gated writer.
    pub output: Output,
    /// Terminal styling.
    pub theme: Theme,
    /// Plan-only mode.
    pub dry_run: bool,
}

impl CommandContext {
    pub fn new(root: PathBuf, mode: OutputMode, dry_run: bool) -> Self {
        Self {
            root,
            output: Output::new(mode),
            theme: Theme::for_terminal(),
            dry_run,
        }
    }

    /// Load settings for the install root.
    pub fn settings(&self) -> Result<Settings> {
        load_settings(&self.root, &EnvOverrides::from_env())
    }

    /// Stage executor bound to this context.
    pub fn executor(&self) -> Executor<'_> {
        Executor::new(&self.output, self.theme.clone(), self.dry_run)
    }
}

/// Trait for command implementations.
pub trait Command {
    /// Execute the command against the shared context.
    fn execute(&self, ctx: &CommandContext) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI subcommands to their implementations.
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Route the parsed CLI to the matching command and execute it.
    pub fn dispatch(&self, cli: &Cli, ctx: &CommandContext) -> Result<CommandResult> {
        match &cli.command {
            Commands::Version(args) => {
                super::version::VersionCommand::new(args.clone()).execute(ctx)
            }
            Commands::Check(args) => super::check::CheckCommand::new(args.clone()).execute(ctx),
            Commands::Prepare(args) => {
                super::prepare::PrepareCommand::new(args.clone()).execute(ctx)
            }
            Commands::Extract(args) => {
                super::extract::ExtractCommand::new(args.clone()).execute(ctx)
            }
            Commands::Classify(args) => {
                super::classify::ClassifyCommand::new(args.clone()).execute(ctx)
            }
            Commands::Apply(args) => super::apply::ApplyCommand::new(args.clone()).execute(ctx),
            Commands::Run(args) => super::run::RunCommand::new(args.clone()).execute(ctx),
            Commands::History(args) => {
                super::history::HistoryCommand::new(args.clone()).execute(ctx)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ctx)
            }
        }
    }
}
