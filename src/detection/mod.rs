//! External tool resolution.
//!
//! Every numerical operation in the pipeline happens inside an external
//! program. This module maps each [`Tool`] to a concrete binary path
//! using the settings (explicit installation directories win over PATH)
//! and provides the preflight probe behind `icaclean check`.

pub mod preflight;

pub use preflight::{extract_version, missing_required, probe_all, ToolStatus};

use std::path::{Path, PathBuf};

use crate::error::{IcacleanError, Result};
use crate::settings::{MatlabMode, Settings};

/// External tools the pipeline can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// FSL's ICA decomposition.
    Melodic,
    /// FSL image arithmetic (highpass filtering).
    FslMaths,
    /// FSL image concatenation (multi-run merge).
    FslMerge,
    /// FSL image statistics.
    FslStats,
    /// Connectome Workbench command-line tool.
    WbCommand,
    /// The MATLAB/Octave numerical worker.
    Worker,
}

impl Tool {
    /// All tools, in preflight display order.
    pub const ALL: [Tool; 6] = [
        Tool::Melodic,
        Tool::FslMaths,
        Tool::FslMerge,
        Tool::FslStats,
        Tool::WbCommand,
        Tool::Worker,
    ];

    /// Binary name for this tool under the given settings.
    pub fn binary_name(&self, settings: &Settings) -> &str {
        match self {
            Tool::Melodic => "melodic",
            Tool::FslMaths => "fslmaths",
            Tool::FslMerge => "fslmerge",
            Tool::FslStats => "fslstats",
            Tool::WbCommand => "wb_command",
            Tool::Worker => match settings.matlab_mode {
                MatlabMode::Compiled => "icaclean-worker",
                MatlabMode::Matlab => "matlab",
                MatlabMode::Octave => "octave",
            },
        }
    }

    /// Whether preflight treats this tool as required.
    ///
    /// `fslstats` and `wb_command` only serve optional stages.
    pub fn required(&self) -> bool {
        !matches!(self, Tool::FslStats | Tool::WbCommand)
    }

    /// Directory this tool is pinned to by settings, if any.
    fn pinned_dir(&self, settings: &Settings) -> Option<PathBuf> {
        match self {
            Tool::Melodic | Tool::FslMaths | Tool::FslMerge | Tool::FslStats => {
                settings.fsl_dir.as_ref().map(|d| d.join("bin"))
            }
            Tool::WbCommand => settings.workbench_dir.clone(),
            Tool::Worker => None,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tool::Melodic => "melodic",
            Tool::FslMaths => "fslmaths",
            Tool::FslMerge => "fslmerge",
            Tool::FslStats => "fslstats",
            Tool::WbCommand => "wb_command",
            Tool::Worker => "worker",
        };
        write!(f, "{}", s)
    }
}

/// Resolve a tool to a concrete binary path.
///
/// Resolution order: explicit binary from settings (worker in matlab
/// mode), pinned installation directory, then PATH.
pub fn resolve_tool(tool: Tool, settings: &Settings) -> Result<PathBuf> {
    if tool == Tool::Worker && settings.matlab_mode == MatlabMode::Matlab {
        if let Some(binary) = &settings.matlab_binary {
            if is_executable(binary) {
                return Ok(binary.clone());
            }
            return Err(IcacleanError::ToolMissing {
                tool: tool.to_string(),
                message: format!("matlab_binary {} is not executable", binary.display()),
            });
        }
    }

    let name = tool.binary_name(settings);

    if let Some(dir) = tool.pinned_dir(settings) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    if let Some(found) = which(name) {
        return Ok(found);
    }

    Err(IcacleanError::ToolMissing {
        tool: tool.to_string(),
        message: match tool.pinned_dir(settings) {
            Some(dir) => format!("'{}' not found in {} or on PATH", name, dir.display()),
            None => format!("'{}' not found on PATH", name),
        },
    })
}

/// Resolve a tool, falling back to its bare name when planning only.
///
/// Dry runs must be able to print a plan on machines without the
/// scientific stack installed.
pub fn resolve_tool_or_name(tool: Tool, settings: &Settings, dry_run: bool) -> Result<PathBuf> {
    match resolve_tool(tool, settings) {
        Ok(path) => Ok(path),
        Err(_) if dry_run => Ok(PathBuf::from(tool.binary_name(settings))),
        Err(e) => Err(e),
    }
}

/// Search PATH for an executable.
pub fn which(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Check whether a file exists with executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn fsl_tools_prefer_pinned_fsl_dir() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let melodic = bin.join("melodic");
        fs::write(&melodic, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        make_executable(&melodic);

        let settings = Settings {
            fsl_dir: Some(temp.path().to_path_buf()),
            ..Settings::default()
        };
        let resolved = resolve_tool(Tool::Melodic, &settings).unwrap();
        assert_eq!(resolved, melodic);
    }

    #[test]
    fn missing_tool_names_the_search_location() {
        if which("fslmerge").is_some() {
            // FSL actually installed here, nothing to assert
            return;
        }
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            fsl_dir: Some(temp.path().join("no-such-fsl")),
            ..Settings::default()
        };
        let err = resolve_tool(Tool::FslMerge, &settings).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("fslmerge"));
        assert!(msg.contains("no-such-fsl"));
    }

    #[test]
    fn dry_run_resolution_falls_back_to_bare_name() {
        // the compiled worker binary is never on a development machine
        let settings = Settings::default();
        let path = resolve_tool_or_name(Tool::Worker, &settings, true).unwrap();
        assert_eq!(path, PathBuf::from("icaclean-worker"));
    }

    #[test]
    fn worker_name_follows_matlab_mode() {
        let mut settings = Settings::default();
        assert_eq!(Tool::Worker.binary_name(&settings), "icaclean-worker");
        settings.matlab_mode = MatlabMode::Octave;
        assert_eq!(Tool::Worker.binary_name(&settings), "octave");
    }

    #[test]
    fn optional_tools_are_marked() {
        assert!(Tool::Melodic.required());
        assert!(Tool::Worker.required());
        assert!(!Tool::FslStats.required());
        assert!(!Tool::WbCommand.required());
    }
}
