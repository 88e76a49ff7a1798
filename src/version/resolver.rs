//! The version resolution state machine.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IcacleanError, Result};
use crate::ui::{KeyValueReport, Theme};

use super::provider::{RepoMetadata, RepoSnapshot};
use super::{PRODUCT, VERSIONING_DIR};

/// Inputs to the resolver, collected by the CLI layer.
///
/// The resolver reads nothing from the process environment itself; the
/// hide-candidate override arrives here already extracted.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Install root; version files live under `<root>/versioning/`.
    pub root: PathBuf,
    /// Value of the hide-candidate override, if set.
    pub hide_candidate: Option<String>,
}

impl ResolverConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hide_candidate: None,
        }
    }

    pub fn with_hide_candidate(mut self, value: Option<String>) -> Self {
        self.hide_candidate = value;
        self
    }

    fn version_file(&self, name: &str) -> PathBuf {
        self.root.join(VERSIONING_DIR).join(name)
    }
}

/// Release state of an install after marker validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    /// Final release build.
    Release,
    /// Release-candidate build.
    Candidate,
    /// Arbitrary development checkout.
    Development,
}

/// A fully resolved install version.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    /// Base version token from `base.txt`.
    pub base: String,
    /// Validated release state (after any hide-candidate demotion).
    pub state: ReleaseState,
    /// Repository snapshot, if the root is a checkout.
    pub repo: Option<RepoSnapshot>,
    /// Install root the version was resolved for.
    pub root: PathBuf,
}

impl ResolvedVersion {
    /// The display string: `v4.3.0`, `v4.3.0-rc`, `Post-v4.3.0`, with
    /// `-MOD` and short-hash suffixes from repository state.
    pub fn display_string(&self) -> String {
        let mut out = match self.state {
            ReleaseState::Release => self.base.clone(),
            ReleaseState::Candidate => format!("{}-rc", self.base),
            ReleaseState::Development => format!("Post-{}", self.base),
        };

        if let Some(repo) = &self.repo {
            if repo.dirty {
                out.push_str("-MOD");
            }
            if self.state != ReleaseState::Release {
                out.push('-');
                out.push_str(&repo.short_hash);
            }
        }

        out
    }

    /// The fixed-format multi-line report.
    pub fn report(&self, theme: &Theme) -> String {
        let (commit, modified) = match &self.repo {
            Some(repo) => (
                repo.hash.clone(),
                if repo.dirty { "yes" } else { "no" }.to_string(),
            ),
            None => ("unknown".to_string(), "unknown".to_string()),
        };

        let mut report = KeyValueReport::new();
        report
            .row("Directory", self.root.display().to_string())
            .row("Product", PRODUCT)
            .row("Version", self.display_string())
            .row("Commit", commit)
            .row("Modified", modified);
        report.render(theme)
    }
}

/// Resolve the install version beneath `config.root`.
///
/// Fails with a [`IcacleanError::VersionFileMissing`] if `base.txt` is
/// absent, and with a consistency error on any marker disagreement.
/// Absence of repository metadata degrades gracefully.
pub fn resolve(config: &ResolverConfig, repo: &dyn RepoMetadata) -> Result<ResolvedVersion> {
    let base_path = config.version_file("base.txt");
    let base = match fs::read_to_string(&base_path) {
        Ok(content) => content.trim().to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IcacleanError::VersionFileMissing { path: base_path });
        }
        Err(e) => return Err(IcacleanError::Io(e)),
    };

    let release = read_marker(&config.version_file("release.txt"), &base)?;
    let candidate = read_marker(&config.version_file("candidate.txt"), &base)?;

    let mut state = match (release, candidate) {
        (true, true) => return Err(IcacleanError::MarkerConflict),
        (true, false) => ReleaseState::Release,
        (false, true) => ReleaseState::Candidate,
        (false, false) => ReleaseState::Development,
    };

    // The override is validated whenever set; it only ever demotes
    // candidate state, it cannot invent a release.
    if let Some(value) = &config.hide_candidate {
        if value != &base {
            return Err(IcacleanError::OverrideMismatch {
                expected: base,
                found: value.clone(),
            });
        }
        if state == ReleaseState::Candidate {
            state = ReleaseState::Release;
        }
    }

    Ok(ResolvedVersion {
        base,
        state,
        repo: repo.snapshot(&config.root),
        root: config.root.clone(),
    })
}

/// Check an optional marker file: absent is fine, present means its
/// content must equal the base version exactly.
fn read_marker(path: &Path, base: &str) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(IcacleanError::Io(e)),
    };

    let content = content.trim();
    if content != base {
        return Err(IcacleanError::VersionMismatch {
            marker: path.to_path_buf(),
            expected: base.to_string(),
            found: content.to_string(),
        });
    }
    Ok(true)
}
