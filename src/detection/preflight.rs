//! Preflight tool probing for `icaclean check`.

use std::path::PathBuf;
use std::process::Command;

use crate::settings::Settings;

use super::{resolve_tool, Tool};

/// Probe result for one tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: Tool,
    pub required: bool,
    /// Resolved binary path, if found.
    pub path: Option<PathBuf>,
    /// Version string extracted from the tool's own output, if any.
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Probe every tool the pipeline can use.
pub fn probe_all(settings: &Settings) -> Vec<ToolStatus> {
    Tool::ALL
        .iter()
        .map(|&tool| {
            let path = resolve_tool(tool, settings).ok();
            let version = path.as_deref().and_then(probe_version);
            ToolStatus {
                tool,
                required: tool.required(),
                path,
                version,
            }
        })
        .collect()
}

/// Whether any required tool is missing.
pub fn missing_required(statuses: &[ToolStatus]) -> bool {
    statuses.iter().any(|s| s.required && !s.found())
}

/// Best-effort version query. Tools disagree on flags and exit codes,
/// so any failure just means "no version".
fn probe_version(path: &std::path::Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    extract_version(&combined)
}

/// Extract a version token from command output.
pub fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"[Vv]ersion\s+(\d+\.\d+)", r"v(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}
