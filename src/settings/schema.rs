//! Settings schema and resolved form.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IcacleanError, Result};

/// Default training file used when none is given.
pub const DEFAULT_TRAINING: &str = "Standard.RData";

/// Default classification threshold.
pub const DEFAULT_THRESHOLD: u32 = 20;

/// Default highpass sigma in seconds (detrend-like filter).
pub const DEFAULT_HIGHPASS_SIGMA: f64 = 2000.0;

/// How the numerical worker programs are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatlabMode {
    /// Compiled worker binary plus MATLAB runtime (no license needed).
    #[default]
    Compiled,
    /// Full MATLAB installation.
    Matlab,
    /// GNU Octave.
    Octave,
}

impl FromStr for MatlabMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compiled" => Ok(Self::Compiled),
            "matlab" => Ok(Self::Matlab),
            "octave" => Ok(Self::Octave),
            _ => Err(format!("unknown matlab mode: {}", s)),
        }
    }
}

impl std::fmt::Display for MatlabMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Compiled => "compiled",
            Self::Matlab => "matlab",
            Self::Octave => "octave",
        };
        write!(f, "{}", s)
    }
}

/// Raw settings file contents. All fields optional; defaults and
/// environment overlays are applied during resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// FSL installation root; tools resolve to `<fsl_dir>/bin/`.
    pub fsl_dir: Option<PathBuf>,

    /// Directory containing `wb_command`.
    pub workbench_dir: Option<PathBuf>,

    /// Worker launch mode: compiled, matlab, or octave.
    pub matlab_mode: Option<String>,

    /// MATLAB binary for `matlab` mode.
    pub matlab_binary: Option<PathBuf>,

    /// MATLAB Compiler Runtime root for `compiled` mode.
    pub mcr_dir: Option<PathBuf>,

    /// Training file used when classify/run gets no explicit one.
    pub default_training: Option<String>,

    /// Threshold used when classify/run gets no explicit one (0-100).
    pub default_threshold: Option<u32>,

    /// Highpass sigma in seconds for `prepare`.
    pub highpass_sigma: Option<f64>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub fsl_dir: Option<PathBuf>,
    pub workbench_dir: Option<PathBuf>,
    pub matlab_mode: MatlabMode,
    pub matlab_binary: Option<PathBuf>,
    pub mcr_dir: Option<PathBuf>,
    pub default_training: String,
    pub default_threshold: u32,
    pub highpass_sigma: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fsl_dir: None,
            workbench_dir: None,
            matlab_mode: MatlabMode::Compiled,
            matlab_binary: None,
            mcr_dir: None,
            default_training: DEFAULT_TRAINING.to_string(),
            default_threshold: DEFAULT_THRESHOLD,
            highpass_sigma: DEFAULT_HIGHPASS_SIGMA,
        }
    }
}

impl Settings {
    /// Validate resolved values.
    pub fn validate(&self) -> Result<()> {
        if self.default_threshold > 100 {
            return Err(IcacleanError::SettingsInvalid {
                message: format!(
                    "default_threshold must be 0-100, got {}",
                    self.default_threshold
                ),
            });
        }
        if !self.highpass_sigma.is_finite() || self.highpass_sigma <= 0.0 {
            return Err(IcacleanError::SettingsInvalid {
                message: format!(
                    "highpass_sigma must be a positive number of seconds, got {}",
                    self.highpass_sigma
                ),
            });
        }
        Ok(())
    }
}
