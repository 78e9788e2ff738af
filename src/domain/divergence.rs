//! Ahead/behind relationship between a local branch and its upstream.

use serde::{Deserialize, Serialize};

/// Commits ahead of and behind the upstream branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Divergence {
    /// Commits on the local head but not on upstream
    pub ahead: u64,
    /// Commits on upstream but not on the local head
    pub behind: u64,
}

impl Divergence {
    /// Create a divergence from known counts
    pub fn new(ahead: u64, behind: u64) -> Self {
        Self { ahead, behind }
    }

    /// Derive ahead/behind from the symmetric difference count and the
    /// one-sided ahead count.
    ///
    /// `behind` is never measured directly: it is `total - ahead`, and zero
    /// whenever `total` is zero so degenerate counts cannot go negative.
    pub fn from_counts(total: u64, ahead: u64) -> Self {
        let behind = if total > 0 {
            total.saturating_sub(ahead)
        } else {
            0
        };
        Self { ahead, behind }
    }

    /// Check if local and upstream point at the same history
    pub fn is_synced(&self) -> bool {
        self.ahead + self.behind == 0
    }
}

/// Divergence as far as it could be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DivergenceState {
    Known(Divergence),
    /// No upstream, or the counts could not be read
    Unknown { reason: String },
}

impl DivergenceState {
    /// Create an unknown state
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    /// The divergence, if known
    #[cfg(test)]
    pub fn known(&self) -> Option<Divergence> {
        match self {
            Self::Known(d) => Some(*d),
            Self::Unknown { .. } => None,
        }
    }
}
