//! Child-process invocation.
//!
//! External tools are always launched directly (program plus argument
//! vector); nothing in the pipeline needs shell interpolation, and the
//! argument lists carry user-supplied paths that must never be
//! re-parsed by a shell.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{IcacleanError, Result};

/// A fully resolved external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Program path (or bare name in dry-run planning).
    pub program: PathBuf,
    /// Arguments, already in final form.
    pub args: Vec<String>,
    /// Working directory, if different from the current one.
    pub cwd: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// One-line rendering for plans, logs, and error messages.
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            if arg.contains(' ') {
                out.push('\'');
                out.push_str(arg);
                out.push('\'');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

/// Result of executing an invocation.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Execution duration.
    pub duration: Duration,
    /// Whether the program exited zero.
    pub success: bool,
}

/// Execute an invocation, capturing output.
///
/// A failure to launch and a non-zero exit both map to
/// [`IcacleanError::CommandFailed`]; callers treat them alike.
pub fn run(invocation: &ToolInvocation) -> Result<ExecResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    tracing::debug!(command = %invocation.display(), "launching");

    let output = cmd.output().map_err(|e| {
        tracing::debug!(error = %e, "failed to launch");
        IcacleanError::CommandFailed {
            program: invocation.program.display().to_string(),
            code: None,
        }
    })?;

    let result = ExecResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    };

    tracing::debug!(
        exit_code = ?result.exit_code,
        duration_ms = result.duration.as_millis() as u64,
        "finished"
    );

    Ok(result)
}

/// Execute an invocation and fail on non-zero exit.
///
/// The error message carries the tail of stderr, which is where the
/// scientific tools put their diagnostics.
pub fn run_checked(invocation: &ToolInvocation) -> Result<ExecResult> {
    let result = run(invocation)?;
    if result.success {
        return Ok(result);
    }

    let tail = stderr_tail(&result.stderr, 5);
    let program = if tail.is_empty() {
        invocation.display()
    } else {
        format!("{}\n{}", invocation.display(), tail)
    };

    Err(IcacleanError::CommandFailed {
        program,
        code: result.exit_code,
    })
}

/// Last `lines` non-empty lines of captured stderr.
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}
