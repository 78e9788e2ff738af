//! Per-repository probe results.

use super::DivergenceState;
use crate::error::ProbeError;
use std::path::PathBuf;

/// Snapshot of one working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryStatus {
    /// Current branch (`HEAD` when detached)
    pub branch: String,
    /// Full object id of HEAD
    pub head_id: String,
    /// Anything other than a clean tree, untracked files included
    pub is_dirty: bool,
    /// Present only when remote comparison was requested
    pub divergence: Option<DivergenceState>,
}

impl RepositoryStatus {
    /// Head id cut to `len` characters
    pub fn short_head_id(&self, len: usize) -> &str {
        match self.head_id.char_indices().nth(len) {
            Some((idx, _)) => &self.head_id[..idx],
            None => &self.head_id,
        }
    }
}

/// What probing one project produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success(RepositoryStatus),
    /// Project directory does not exist under the root
    NotFound,
    Failure(ProbeError),
}

impl ProbeOutcome {
    /// Short machine-friendly label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::NotFound => "not_found",
            Self::Failure(_) => "failure",
        }
    }
}

/// One output record, tied back to the requested project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub name: String,
    pub path: PathBuf,
    pub outcome: ProbeOutcome,
}

/// Totals over a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub clean: usize,
    pub dirty: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Count one report
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        self.total += 1;
        match outcome {
            ProbeOutcome::Success(status) if status.is_dirty => self.dirty += 1,
            ProbeOutcome::Success(_) => self.clean += 1,
            ProbeOutcome::NotFound => self.not_found += 1,
            ProbeOutcome::Failure(_) => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(head_id: &str, is_dirty: bool) -> RepositoryStatus {
        RepositoryStatus {
            branch: "main".to_string(),
            head_id: head_id.to_string(),
            is_dirty,
            divergence: None,
        }
    }

    #[test]
    fn test_short_head_id() {
        let s = status("abcdef1234567890", false);
        assert_eq!(s.short_head_id(7), "abcdef1");
        assert_eq!(s.short_head_id(40), "abcdef1234567890");

        let s = status("abc", false);
        assert_eq!(s.short_head_id(7), "abc");
    }

    #[test]
    fn test_run_summary() {
        let mut summary = RunSummary::default();
        summary.record(&ProbeOutcome::Success(status("a", false)));
        summary.record(&ProbeOutcome::Success(status("b", true)));
        summary.record(&ProbeOutcome::NotFound);
        summary.record(&ProbeOutcome::Failure(ProbeError::InvalidOutput {
            operation: "head",
            output: String::new(),
        }));

        assert_eq!(
            summary,
            RunSummary {
                total: 4,
                clean: 1,
                dirty: 1,
                not_found: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_outcome_kind() {
        assert_eq!(ProbeOutcome::NotFound.kind(), "not_found");
        assert_eq!(ProbeOutcome::Success(status("a", false)).kind(), "success");
    }
}
