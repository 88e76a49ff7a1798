//! Command-line interface.
//!
//! This module provides the CLI argument parsing using clap's derive
//! macros and the command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations and dispatch

pub mod args;
pub mod commands;

pub use args::{
    ApplyArgs, CheckArgs, ClassifyArgs, Cli, Commands, CompletionsArgs, ExtractArgs, HistoryArgs,
    PrepareArgs, RunArgs, VersionArgs,
};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
