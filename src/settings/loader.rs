//! Settings file discovery, parsing, and environment overlay.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IcacleanError, Result};

use super::schema::{MatlabMode, Settings, SettingsFile};

/// Location of the settings file beneath an install root.
pub fn settings_path(root: &Path) -> PathBuf {
    root.join(".icaclean").join("settings.yml")
}

/// Environment values that override the settings file.
///
/// Collected in one place so resolution stays testable without touching
/// the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// `FSLDIR`
    pub fsl_dir: Option<PathBuf>,
    /// `CARET7DIR`
    pub workbench_dir: Option<PathBuf>,
    /// `ICACLEAN_MATLAB_MODE`
    pub matlab_mode: Option<String>,
}

impl EnvOverrides {
    /// Read the overrides from the process environment.
    pub fn from_env() -> Self {
        Self {
            fsl_dir: std::env::var_os("FSLDIR").map(PathBuf::from),
            workbench_dir: std::env::var_os("CARET7DIR").map(PathBuf::from),
            matlab_mode: std::env::var("ICACLEAN_MATLAB_MODE").ok(),
        }
    }
}

/// Load, overlay, and validate settings for an install root.
///
/// A missing settings file yields defaults; a malformed one is fatal.
pub fn load_settings(root: &Path, env: &EnvOverrides) -> Result<Settings> {
    let path = settings_path(root);
    let file = match fs::read_to_string(&path) {
        Ok(content) => {
            serde_yaml::from_str::<SettingsFile>(&content).map_err(|e| {
                IcacleanError::SettingsParse {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            SettingsFile::default()
        }
        Err(e) => return Err(IcacleanError::Io(e)),
    };

    let settings = resolve_settings(file, env)?;
    settings.validate()?;
    Ok(settings)
}

/// Apply defaults and environment overlay to raw file contents.
fn resolve_settings(file: SettingsFile, env: &EnvOverrides) -> Result<Settings> {
    let defaults = Settings::default();

    let matlab_mode = env
        .matlab_mode
        .as_deref()
        .or(file.matlab_mode.as_deref())
        .map(|s| {
            s.parse::<MatlabMode>()
                .map_err(|message| IcacleanError::SettingsInvalid { message })
        })
        .transpose()?
        .unwrap_or_default();

    Ok(Settings {
        fsl_dir: env.fsl_dir.clone().or(file.fsl_dir),
        workbench_dir: env.workbench_dir.clone().or(file.workbench_dir),
        matlab_mode,
        matlab_binary: file.matlab_binary,
        mcr_dir: file.mcr_dir,
        default_training: file.default_training.unwrap_or(defaults.default_training),
        default_threshold: file
            .default_threshold
            .unwrap_or(defaults.default_threshold),
        highpass_sigma: file.highpass_sigma.unwrap_or(defaults.highpass_sigma),
    })
}
