//! Error types for icaclean operations.
//!
//! This module defines [`IcacleanError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `IcacleanError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `IcacleanError::Other`) for unexpected errors
//! - Every error is fatal: reported on stderr with a non-zero exit, never
//!   retried, never recovered within the process

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for icaclean operations.
#[derive(Debug, Error)]
pub enum IcacleanError {
    /// Required version file missing from the install.
    #[error("Version file not found: {path}")]
    VersionFileMissing { path: PathBuf },

    /// A version marker file disagrees with the base version.
    #[error("Version marker {marker} contains '{found}', expected '{expected}'")]
    VersionMismatch {
        marker: PathBuf,
        expected: String,
        found: String,
    },

    /// Release and candidate markers are both present.
    #[error("Install carries both a release and a candidate marker")]
    MarkerConflict,

    /// The hide-candidate override does not match the base version.
    #[error("Hide-candidate override is '{found}', expected '{expected}'")]
    OverrideMismatch { expected: String, found: String },

    /// Failed to parse the settings file.
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// Settings are structurally valid but carry unusable values.
    #[error("Invalid settings: {message}")]
    SettingsInvalid { message: String },

    /// Pipeline input is missing or malformed.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A required external tool could not be resolved.
    #[error("Missing tool '{tool}': {message}")]
    ToolMissing { tool: String, message: String },

    /// External program exited non-zero or failed to launch.
    #[error("Command failed with exit code {code:?}: {program}")]
    CommandFailed { program: String, code: Option<i32> },

    /// A pipeline stage failed.
    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for icaclean operations.
pub type Result<T> = std::result::Result<T, IcacleanError>;
