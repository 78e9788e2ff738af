//! Infrastructure services for projstat.
//!
//! This module contains:
//! - RepositoryQueryProvider: the backend contract, with the git CLI GitProvider
//! - RepositoryProbe: bounded per-repository queries
//! - BatchAggregator: concurrent, order-preserving fan-out over projects
//! - ProcessRunner: one-shot child process execution

mod aggregator;
mod git;
mod probe;
pub mod process;
pub mod provider;

pub use aggregator::{BatchAggregator, BatchOptions};
pub use git::GitProvider;
pub use probe::RepositoryProbe;
pub use process::{CommandOutput, ProcessRunner};
pub use provider::RepositoryQueryProvider;
