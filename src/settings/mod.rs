//! Settings loading and resolution.
//!
//! Pipeline behavior is configured by an optional YAML file at
//! `.icaclean/settings.yml` beneath the install root, overlaid with a
//! small set of environment variables (`FSLDIR`, `CARET7DIR`,
//! `ICACLEAN_MATLAB_MODE`). Everything has a default; a missing settings
//! file is not an error.
//!
//! The environment is read in exactly one place ([`EnvOverrides::from_env`])
//! so the resolution step stays a pure function of its inputs.

pub mod loader;
pub mod schema;

pub use loader::{load_settings, settings_path, EnvOverrides};
pub use schema::{MatlabMode, Settings, SettingsFile};
