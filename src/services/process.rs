//! Process execution for one-shot repository queries.
//!
//! Every query is a short-lived child process whose stdout is the answer.
//! Children are killed when their future is dropped, so a caller-side
//! timeout also ends the process.

use crate::error::{ProbeError, ProbeResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exited with status 0
    pub success: bool,
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Exit status as text, for error messages
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a fixed program with a fixed environment in varying directories
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    envs: Vec<(String, String)>,
}

impl ProcessRunner {
    /// Create a runner for `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            envs: Vec::new(),
        }
    }

    /// Add an environment variable to every invocation
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run and capture output regardless of exit status
    pub async fn output(
        &self,
        dir: &Path,
        args: &[&str],
        extra_envs: &[(&str, &Path)],
    ) -> ProbeResult<CommandOutput> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        for (key, value) in extra_envs {
            command.env(key, value);
        }

        tracing::debug!("running {} in {}", self.describe(args), dir.display());

        let output = command.output().await.map_err(|e| ProbeError::Spawn {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run and return stdout, failing on a non-zero exit
    pub async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        extra_envs: &[(&str, &Path)],
    ) -> ProbeResult<String> {
        let output = self.output(dir, args, extra_envs).await?;
        if !output.success {
            return Err(self.failure(args, output));
        }
        Ok(output.stdout)
    }

    /// Error for a command that exited unsuccessfully
    pub fn failure(&self, args: &[&str], output: CommandOutput) -> ProbeError {
        ProbeError::Command {
            command: self.describe(args),
            status: output.status,
            stderr: output.stderr,
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = Vec::with_capacity(args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend_from_slice(args);
        parts.join(" ")
    }
}
