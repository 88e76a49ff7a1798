//! Terminal output components.
//!
//! This module provides:
//! - [`OutputMode`] and [`Output`] for verbosity-gated printing
//! - [`Theme`] for console styling (with a plain variant for non-TTY)
//! - [`StageSpinner`] for long-running stage invocations
//! - [`KeyValueReport`] for the fixed-format reports printed by
//!   `version` and `check`

pub mod output;
pub mod report;
pub mod spinner;
pub mod theme;

pub use output::{Output, OutputMode};
pub use report::KeyValueReport;
pub use spinner::StageSpinner;
pub use theme::{should_use_colors, Theme};
