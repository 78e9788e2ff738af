//! Git backend for repository queries.
//!
//! Shells out to the git CLI, one process per question.

use super::process::ProcessRunner;
use super::provider::RepositoryQueryProvider;
use crate::config::GitConfig;
use crate::error::{ConfigError, ProbeError, ProbeResult};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// Stops repository discovery at the parent of `path`
fn ceiling(path: &Path) -> Vec<(&'static str, &Path)> {
    path.parent()
        .map(|parent| ("GIT_CEILING_DIRECTORIES", parent))
        .into_iter()
        .collect()
}

/// Repository query provider backed by the git CLI
pub struct GitProvider {
    runner: ProcessRunner,
    remote: String,
    clean_marker: Regex,
}

impl GitProvider {
    /// Create a provider from the git section of the configuration
    pub fn new(config: &GitConfig) -> Result<Self, ConfigError> {
        let clean_marker = Regex::new(&config.clean_pattern).map_err(|e| {
            ConfigError::Invalid(format!("git.clean_pattern is not a valid regex: {}", e))
        })?;

        // Fixed locale so the clean marker matches; never prompt for credentials
        let runner = ProcessRunner::new(config.binary.clone())
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_OPTIONAL_LOCKS", "0");

        Ok(Self {
            runner,
            remote: config.remote.clone(),
            clean_marker,
        })
    }

    /// Run git inside `path` without discovering a repository above it
    async fn git(&self, path: &Path, args: &[&str]) -> ProbeResult<String> {
        self.runner.run(path, args, &ceiling(path)).await
    }

    async fn single_line(
        &self,
        path: &Path,
        args: &[&str],
        operation: &'static str,
    ) -> ProbeResult<String> {
        let out = self.git(path, args).await?;
        let line = out.trim();
        if line.is_empty() {
            return Err(ProbeError::InvalidOutput {
                operation,
                output: out,
            });
        }
        Ok(line.to_string())
    }

    async fn count(&self, path: &Path, range: &str) -> ProbeResult<u64> {
        let out = self.git(path, &["rev-list", "--count", range]).await?;
        out.trim().parse().map_err(|_| ProbeError::InvalidOutput {
            operation: "rev-list --count",
            output: out.trim().to_string(),
        })
    }
}

#[async_trait]
impl RepositoryQueryProvider for GitProvider {
    async fn current_branch(&self, path: &Path) -> ProbeResult<String> {
        self.single_line(
            path,
            &["rev-parse", "--abbrev-ref", "HEAD"],
            "rev-parse --abbrev-ref",
        )
        .await
    }

    async fn head_id(&self, path: &Path) -> ProbeResult<String> {
        self.single_line(path, &["rev-parse", "HEAD"], "rev-parse").await
    }

    async fn is_dirty(&self, path: &Path) -> ProbeResult<bool> {
        let out = self.git(path, &["status"]).await?;
        Ok(!self.clean_marker.is_match(&out))
    }

    async fn refresh_remote_refs(&self, path: &Path) -> ProbeResult<()> {
        self.git(path, &["fetch", "--quiet", &self.remote]).await?;
        Ok(())
    }

    async fn upstream(&self, path: &Path, branch: &str) -> ProbeResult<Option<String>> {
        let reference = format!("refs/remotes/{}/{}", self.remote, branch);
        let args = ["rev-parse", "--verify", "--quiet", reference.as_str()];
        let output = self.runner.output(path, &args, &ceiling(path)).await?;

        // --verify --quiet exits 1 for a missing ref; anything else is a real failure
        if output.success {
            return Ok(Some(reference));
        }
        match output.code {
            Some(1) => Ok(None),
            _ => Err(self.runner.failure(&args, output)),
        }
    }

    async fn symmetric_difference_count(&self, path: &Path, upstream: &str) -> ProbeResult<u64> {
        self.count(path, &format!("{}...HEAD", upstream)).await
    }

    async fn ahead_count(&self, path: &Path, upstream: &str) -> ProbeResult<u64> {
        self.count(path, &format!("{}..HEAD", upstream)).await
    }
}
