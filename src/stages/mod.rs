//! Stage planning and execution.
//!
//! A [`Stage`] is a named, fully planned sequence of [`Step`]s: external
//! tool invocations interleaved with the file choreography (renames,
//! copies, removals) that installs tool outputs under their canonical
//! names. Builders in [`plan`] construct complete stages up front;
//! nothing runs during planning, which is what makes `--dry-run` exact.

pub mod executor;
pub mod plan;

pub use executor::{Executor, StageOutcome};
pub use plan::{
    apply_stages, classify_stage, features_stage, prepare_stages, resolve_training, CleanupOptions,
};

use std::path::PathBuf;

use crate::exec::ToolInvocation;

/// One unit of work inside a stage.
#[derive(Debug, Clone)]
pub enum Step {
    /// Launch an external tool and require a zero exit.
    Invoke(ToolInvocation),
    /// Move a tool output to its canonical name.
    Rename { from: PathBuf, to: PathBuf },
    /// Copy a file into place, leaving the original.
    Copy { from: PathBuf, to: PathBuf },
    /// Delete a scratch file; absence is fine.
    Remove(PathBuf),
    /// Create a directory (and parents).
    EnsureDir(PathBuf),
    /// Assert that an opaque tool actually produced its output.
    Expect(PathBuf),
}

impl Step {
    /// One-line rendering for plans and error messages.
    pub fn describe(&self) -> String {
        match self {
            Step::Invoke(inv) => format!("$ {}", inv.display()),
            Step::Rename { from, to } => format!("mv {} {}", from.display(), to.display()),
            Step::Copy { from, to } => format!("cp {} {}", from.display(), to.display()),
            Step::Remove(path) => format!("rm {}", path.display()),
            Step::EnsureDir(path) => format!("mkdir -p {}", path.display()),
            Step::Expect(path) => format!("expect {}", path.display()),
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: &'static str,
    pub description: String,
    pub steps: Vec<Step>,
}

impl Stage {
    pub fn new(name: &'static str, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn invoke(self, invocation: ToolInvocation) -> Self {
        self.step(Step::Invoke(invocation))
    }
}
