//! Install version resolution.
//!
//! An icaclean install carries its version in plain-text files beneath
//! `versioning/`:
//!
//! - `base.txt` (required) holds the base version token, e.g. `v4.3.0`
//! - `release.txt` (optional) marks the install as a final release; its
//!   content must equal the base version exactly
//! - `candidate.txt` (optional) marks a release candidate, same contract
//!
//! The two markers are mutually exclusive. An install with neither is an
//! arbitrary development checkout and presents as `Post-<base>`. The
//! `ICACLEAN_HIDE_RC` override (collected by the CLI layer, passed in via
//! [`ResolverConfig`]) demotes candidate state to release, letting a
//! candidate build present itself as final; it must also equal the base
//! version.
//!
//! When the install root is a git checkout, the resolved string gains a
//! `-MOD` suffix if tracked files outside [`EXCLUDED_DIR`] differ from
//! HEAD, and non-release builds additionally gain the short commit hash.
//! Repository metadata is read through the [`RepoMetadata`] trait so the
//! git subprocess can be swapped out in tests.

pub mod provider;
pub mod resolver;

pub use provider::{GitMetadata, RepoMetadata, RepoSnapshot};
pub use resolver::{resolve, ReleaseState, ResolvedVersion, ResolverConfig};

/// Product name printed in the long report.
pub const PRODUCT: &str = "icaclean";

/// Directory holding the version files, relative to the install root.
pub const VERSIONING_DIR: &str = "versioning";

/// Subdirectory excluded from the modified-state check.
///
/// Bundled training data is regenerated in place on some installs and
/// must not make a checkout present as locally modified.
pub const EXCLUDED_DIR: &str = "training_files";
