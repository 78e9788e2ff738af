//! Report line rendering.
//!
//! Pure functions from a probe outcome to one output line, either a
//! color-coded text line or a JSON object.

use crate::config::OutputConfig;
use crate::domain::{DivergenceState, ProbeOutcome, ProjectReport, RepositoryStatus};
use crossterm::style::{Color, Stylize};
use serde_json::{json, Value};

/// Collapse multi-line diagnostics (git stderr) so a report stays on one line
fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders project reports for display
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    color: bool,
    hash_length: usize,
}

impl ReportFormatter {
    /// Create a formatter
    pub fn new(color: bool, hash_length: usize) -> Self {
        Self { color, hash_length }
    }

    /// Create a formatter from the output section of the configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.color, config.hash_length)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color && !text.is_empty() {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Human-readable line for one project
    pub fn line(&self, name: &str, outcome: &ProbeOutcome) -> String {
        match outcome {
            ProbeOutcome::Success(status) => self.status_line(name, status),
            ProbeOutcome::NotFound => format!(
                "-- {}: {}",
                self.paint(name, Color::Blue),
                self.paint("Folder not found!", Color::Red)
            ),
            ProbeOutcome::Failure(error) => format!(
                "-- {}: {}",
                self.paint(name, Color::Blue),
                self.paint(&format!("error: {}", one_line(&error.to_string())), Color::Red)
            ),
        }
    }

    fn status_line(&self, name: &str, status: &RepositoryStatus) -> String {
        let branch_color = if status.is_dirty {
            Color::Red
        } else {
            Color::Green
        };

        let suffix = match &status.divergence {
            Some(DivergenceState::Known(d)) if !d.is_synced() => {
                format!(" ahead {} : behind {}", d.ahead, d.behind)
            }
            Some(DivergenceState::Unknown { reason }) => {
                format!(" (divergence unknown: {})", one_line(reason))
            }
            _ => String::new(),
        };

        format!(
            "-- {}: {} | {}{}",
            self.paint(name, Color::Cyan),
            self.paint(&status.branch, branch_color),
            self.paint(status.short_head_id(self.hash_length), Color::Yellow),
            self.paint(&suffix, Color::Red)
        )
    }

    /// Machine-readable record for one project
    pub fn json(&self, report: &ProjectReport) -> Value {
        let mut value = json!({
            "name": report.name,
            "path": report.path.display().to_string(),
            "outcome": report.outcome.kind(),
        });

        match &report.outcome {
            ProbeOutcome::Success(status) => {
                value["branch"] = json!(status.branch);
                value["head_id"] = json!(status.head_id);
                value["dirty"] = json!(status.is_dirty);
                if let Some(divergence) = &status.divergence {
                    value["divergence"] = json!(divergence);
                }
            }
            ProbeOutcome::NotFound => {}
            ProbeOutcome::Failure(error) => {
                value["error"] = json!(error.to_string());
            }
        }

        value
    }
}
