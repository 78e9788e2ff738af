//! projstat: status of many git working copies in one pass
//!
//! This crate probes a batch of project directories under a common root,
//! concurrently and with bounded parallelism, and renders one line per
//! project: branch, short head id, clean/dirty, and optionally ahead/behind
//! counts against the remote.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod ui;

pub use app::App;
pub use config::StatusConfig;
pub use error::{AppError, Result};
