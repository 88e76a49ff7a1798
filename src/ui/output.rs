//! Output mode and writer.

use std::io::Write;
use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including captured tool output.
    Verbose,
    /// Show stage progress and status.
    #[default]
    Normal,
    /// Spinners and final status only.
    Quiet,
    /// Errors only.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Whether captured tool stdout/stderr is echoed.
    pub fn shows_tool_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Whether stage spinners are displayed.
    pub fn shows_spinners(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Whether status messages are printed.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

/// Output writer that respects the current mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print a status line, unless silenced.
    pub fn println(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    /// Print a line unconditionally (command results the user asked for).
    pub fn result(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Echo captured tool output in verbose mode.
    pub fn tool_output(&self, output: &str) {
        if self.mode.shows_tool_output() && !output.is_empty() {
            print!("{}", output);
            let _ = std::io::stdout().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("QUIET".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("loud".parse::<OutputMode>().is_err());
    }

    #[test]
    fn only_verbose_shows_tool_output() {
        assert!(OutputMode::Verbose.shows_tool_output());
        assert!(!OutputMode::Normal.shows_tool_output());
        assert!(!OutputMode::Quiet.shows_tool_output());
        assert!(!OutputMode::Silent.shows_tool_output());
    }

    #[test]
    fn silent_hides_spinners_and_status() {
        assert!(!OutputMode::Silent.shows_spinners());
        assert!(!OutputMode::Silent.shows_status());
        assert!(OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Normal.shows_status());
    }

    #[test]
    fn default_mode_is_normal() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
