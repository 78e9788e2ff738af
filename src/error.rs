//! Unified error types for projstat.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot find the project parent folder {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("No project root given: pass --root or set MYPROJECTS")]
    RootUnset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors from querying a single repository
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("`{command}` exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("unexpected output from {operation}: {output}")]
    InvalidOutput {
        operation: &'static str,
        output: String,
    },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for repository queries
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found_message() {
        let err = AppError::RootNotFound(PathBuf::from("/nope/projects"));
        assert_eq!(
            err.to_string(),
            "Cannot find the project parent folder /nope/projects"
        );
    }

    #[test]
    fn test_probe_error_messages() {
        let err = ProbeError::Timeout {
            operation: "fetch",
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "fetch timed out after 5s");

        let err = ProbeError::Command {
            command: "git rev-parse HEAD".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: not a git repository".to_string(),
        };
        assert!(err.to_string().contains("not a git repository"));
    }
}
