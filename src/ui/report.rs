//! Fixed-format key-value reports.
//!
//! `version` (long form) and `check` both print aligned key-value blocks;
//! this keeps their layout in one place.

use super::theme::Theme;

/// An aligned key-value report.
#[derive(Debug, Default)]
pub struct KeyValueReport {
    rows: Vec<(String, String)>,
}

impl KeyValueReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the report.
    pub fn row(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.rows.push((key.to_string(), value.into()));
        self
    }

    /// Render with keys padded to a common width.
    pub fn render(&self, theme: &Theme) -> String {
        let width = self
            .rows
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (key, value) in &self.rows {
            let padded = format!("{:width$}", key, width = width);
            out.push_str(&format!(
                "{}  {}\n",
                theme.key.apply_to(padded),
                theme.value.apply_to(value)
            ));
        }
        out
    }
}
