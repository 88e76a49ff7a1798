//! Sequential stage execution.

use std::fs;
use std::time::{Duration, Instant};

use crate::error::{IcacleanError, Result};
use crate::exec;
use crate::ui::{spinner::stage_spinner, Output, Theme};

use super::{Stage, Step};

/// Outcome of one executed (or planned) stage.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub name: &'static str,
    pub duration: Duration,
    /// False when the stage was only printed under --dry-run.
    pub executed: bool,
}

/// Runs stages in order, fail-fast.
pub struct Executor<'a> {
    output: &'a Output,
    theme: Theme,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    pub fn new(output: &'a Output, theme: Theme, dry_run: bool) -> Self {
        Self {
            output,
            theme,
            dry_run,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute a single stage, or print its plan under --dry-run.
    pub fn run_stage(&self, stage: &Stage) -> Result<StageOutcome> {
        if self.dry_run {
            self.print_plan(stage);
            return Ok(StageOutcome {
                name: stage.name,
                duration: Duration::ZERO,
                executed: false,
            });
        }

        let start = Instant::now();
        let spinner = stage_spinner(
            stage.name,
            &stage.description,
            self.output.mode().shows_spinners(),
        );

        for step in &stage.steps {
            tracing::debug!(stage = stage.name, step = %step.describe(), "running step");
            if let Err(e) = self.run_step(stage, step) {
                spinner.finish_error(&format!("{} failed", stage.name));
                return Err(e);
            }
        }

        let duration = start.elapsed();
        spinner.finish_success(&format!(
            "{} ({})",
            stage.name,
            format_duration(duration)
        ));

        Ok(StageOutcome {
            name: stage.name,
            duration,
            executed: true,
        })
    }

    fn run_step(&self, stage: &Stage, step: &Step) -> Result<()> {
        match step {
            Step::Invoke(invocation) => {
                let result = exec::run_checked(invocation)?;
                self.output.tool_output(&result.stdout);
                Ok(())
            }
            Step::Rename { from, to } => fs::rename(from, to).map_err(|e| {
                self.step_error(stage, step, &e.to_string())
            }),
            Step::Copy { from, to } => fs::copy(from, to).map(|_| ()).map_err(|e| {
                self.step_error(stage, step, &e.to_string())
            }),
            Step::Remove(path) => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.step_error(stage, step, &e.to_string())),
            },
            Step::EnsureDir(path) => fs::create_dir_all(path).map_err(|e| {
                self.step_error(stage, step, &e.to_string())
            }),
            Step::Expect(path) => {
                if path.exists() {
                    Ok(())
                } else {
                    Err(IcacleanError::StageFailed {
                        stage: stage.name.to_string(),
                        message: format!("expected output {} was not produced", path.display()),
                    })
                }
            }
        }
    }

    fn step_error(&self, stage: &Stage, step: &Step, message: &str) -> IcacleanError {
        IcacleanError::StageFailed {
            stage: stage.name.to_string(),
            message: format!("{}: {}", step.describe(), message),
        }
    }

    fn print_plan(&self, stage: &Stage) {
        self.output.println(&format!(
            "{} {} - {}",
            self.theme.highlight.apply_to("Plan:"),
            stage.name,
            stage.description
        ));
        for step in &stage.steps {
            self.output
                .println(&format!("  {}", self.theme.command.apply_to(step.describe())));
        }
    }
}

/// Render a duration the way stage summaries print it.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else if secs >= 1 {
        format!("{}s", secs)
    } else {
        format!("{}ms", d.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ToolInvocation;
    use crate::ui::OutputMode;
    use tempfile::TempDir;

    fn executor(output: &Output, dry_run: bool) -> Executor<'_> {
        Executor::new(output, Theme::plain(), dry_run)
    }

    #[test]
    fn dry_run_executes_nothing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never-created");
        let stage = Stage::new("cleanup", "test stage")
            .step(Step::EnsureDir(missing.clone()))
            .step(Step::Expect(temp.path().join("also-missing")));

        let output = Output::new(OutputMode::Silent);
        let outcome = executor(&output, true).run_stage(&stage).unwrap();
        assert!(!outcome.executed);
        assert!(!missing.exists());
    }

    #[test]
    fn file_steps_run_in_order() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        std::fs::write(&src, "payload").unwrap();
        let moved = temp.path().join("sub").join("b.txt");

        let stage = Stage::new("assemble", "file choreography")
            .step(Step::EnsureDir(temp.path().join("sub")))
            .step(Step::Rename {
                from: src.clone(),
                to: moved.clone(),
            })
            .step(Step::Copy {
                from: moved.clone(),
                to: temp.path().join("c.txt"),
            })
            .step(Step::Remove(temp.path().join("c.txt")))
            .step(Step::Expect(moved.clone()));

        let output = Output::new(OutputMode::Silent);
        let outcome = executor(&output, false).run_stage(&stage).unwrap();
        assert!(outcome.executed);
        assert!(!src.exists());
        assert!(moved.exists());
        assert!(!temp.path().join("c.txt").exists());
    }

    #[test]
    fn removing_a_missing_file_is_fine() {
        let temp = TempDir::new().unwrap();
        let stage =
            Stage::new("cleanup", "scratch removal").step(Step::Remove(temp.path().join("gone")));
        let output = Output::new(OutputMode::Silent);
        assert!(executor(&output, false).run_stage(&stage).is_ok());
    }

    #[test]
    fn missing_expected_output_fails_the_stage() {
        let temp = TempDir::new().unwrap();
        let stage = Stage::new("classify", "label production")
            .step(Step::Expect(temp.path().join("labels.txt")));
        let output = Output::new(OutputMode::Silent);
        let err = executor(&output, false).run_stage(&stage).unwrap_err();
        match err {
            IcacleanError::StageFailed { stage, message } => {
                assert_eq!(stage, "classify");
                assert!(message.contains("was not produced"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn failing_invocation_fails_fast() {
        let temp = TempDir::new().unwrap();
        let later = temp.path().join("later");
        let stage = Stage::new("highpass", "temporal filtering")
            .invoke(ToolInvocation::new("false", vec![]))
            .step(Step::EnsureDir(later.clone()));

        let output = Output::new(OutputMode::Silent);
        assert!(executor(&output, false).run_stage(&stage).is_err());
        assert!(!later.exists());
    }

    #[test]
    fn durations_format_compactly() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
    }
}
