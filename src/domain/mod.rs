//! Domain entities for projstat.
//!
//! This module contains the core entities:
//! - ProjectSpec / StatusRequest: what was asked for
//! - Divergence: ahead/behind against the upstream branch
//! - RepositoryStatus / ProbeOutcome: what probing found

mod divergence;
mod project;
mod status;

pub use divergence::{Divergence, DivergenceState};
pub use project::{ProjectSpec, StatusRequest};
pub use status::{ProbeOutcome, ProjectReport, RepositoryStatus, RunSummary};
