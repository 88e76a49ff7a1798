//! icaclean - ICA-based fMRI denoising pipeline driver.
//!
//! icaclean sequences external neuroimaging tools (FSL's `melodic`,
//! `fslmaths` and `fslmerge`, Connectome Workbench's `wb_command`, and a
//! MATLAB/Octave numerical worker) into the fixed stage order of an
//! ICA-denoising pipeline. The crate itself performs no numerical work:
//! it validates inputs, encodes the pipeline's file-naming contract,
//! launches the tools, relocates their outputs, and resolves the
//! install's version string.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - External tool resolution and preflight probing
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Child-process invocation
//! - [`naming`] - Pipeline file-naming conventions and input validation
//! - [`settings`] - Settings file loading and environment overrides
//! - [`stages`] - Stage planning and sequential execution
//! - [`state`] - Run identifiers and history recording
//! - [`ui`] - Terminal output, theming, and spinners
//! - [`version`] - Install version resolution
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use icaclean::naming::training_stem;
//!
//! // Label files are named after the training data that produced them
//! let stem = training_stem(Path::new("/opt/training_files/Standard.RData"));
//! assert_eq!(stem, "Standard");
//! ```

pub mod cli;
pub mod detection;
pub mod error;
pub mod exec;
pub mod naming;
pub mod settings;
pub mod stages;
pub mod state;
pub mod ui;
pub mod version;

pub use error::{IcacleanError, Result};
