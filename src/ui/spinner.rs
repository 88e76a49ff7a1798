//! Progress spinners for pipeline stages.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::theme::Theme;

/// Spinner shown while an external tool runs.
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Create a spinner that doesn't render (silent mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update the spinner message.
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Finish successfully, leaving a checkmark line behind.
    pub fn finish_success(&self, msg: &str) {
        let theme = Theme::for_terminal();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_success(msg));
    }

    /// Finish with an error line.
    pub fn finish_error(&self, msg: &str) {
        let theme = Theme::for_terminal();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_error(msg));
    }

    /// Remove the spinner without leaving a line.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Create a spinner for a named stage.
pub fn stage_spinner(stage: &str, description: &str, visible: bool) -> StageSpinner {
    if visible {
        StageSpinner::new(&format!("{} - {}", stage, description))
    } else {
        StageSpinner::hidden()
    }
}
