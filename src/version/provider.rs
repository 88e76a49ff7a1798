//! Repository metadata providers.
//!
//! The resolver never talks to git directly; it asks a [`RepoMetadata`]
//! implementation for a snapshot of the checkout. [`GitMetadata`] shells
//! out to the `git` binary; tests substitute a canned provider.

use std::path::Path;
use std::process::Command;

use super::EXCLUDED_DIR;

/// Commit identity and dirty state of a version-control checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSnapshot {
    /// Full commit hash of HEAD.
    pub hash: String,
    /// Abbreviated commit hash.
    pub short_hash: String,
    /// Whether tracked files (outside the excluded directory) differ
    /// from HEAD.
    pub dirty: bool,
}

/// Source of repository metadata for an install root.
pub trait RepoMetadata {
    /// Return a snapshot for `root`, or `None` if the directory is not a
    /// version-control checkout. Absence is not an error.
    fn snapshot(&self, root: &Path) -> Option<RepoSnapshot>;
}

/// Reads metadata by invoking the `git` binary.
#[derive(Debug, Default)]
pub struct GitMetadata;

impl GitMetadata {
    pub fn new() -> Self {
        Self
    }

    fn git_stdout(root: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(root)
            .args(args)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RepoMetadata for GitMetadata {
    fn snapshot(&self, root: &Path) -> Option<RepoSnapshot> {
        let hash = Self::git_stdout(root, &["rev-parse", "HEAD"])?;
        let short_hash = Self::git_stdout(root, &["rev-parse", "--short", "HEAD"])?;
        let status = Self::git_stdout(root, &["status", "--porcelain"])?;
        let dirty = is_dirty(&status);

        tracing::debug!(%hash, dirty, "repository snapshot");
        Some(RepoSnapshot {
            hash,
            short_hash,
            dirty,
        })
    }
}

/// Interpret `git status --porcelain` output.
///
/// Untracked entries don't count: the contract is "tracked files differ
/// from the last commit". Entries under the excluded directory are
/// ignored, on either side of a rename.
fn is_dirty(porcelain: &str) -> bool {
    porcelain.lines().any(|line| {
        if line.len() < 4 || line.starts_with("??") {
            return false;
        }
        let path_field = &line[3..];
        path_field
            .split(" -> ")
            .any(|p| !is_excluded(p.trim_matches('"')))
    })
}

fn is_excluded(path: &str) -> bool {
    path == EXCLUDED_DIR || path.starts_with(&format!("{}/", EXCLUDED_DIR))
}
