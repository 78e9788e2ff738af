//! Configuration management for projstat.
//!
//! Supports layered configuration: defaults → user → explicit file → env

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl StatusConfig {
    /// Load configuration with hierarchy: defaults → user → explicit file → env
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(config::File::from_str(
            include_str!("../default_config.toml"),
            config::FileFormat::Toml,
        ));

        // 2. User config (~/.config/projstat/config.toml)
        if let Some(dirs) = directories::ProjectDirs::from("", "", "projstat") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 3. File given on the command line must exist
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        // 4. Environment variables (PROJSTAT__SECTION__KEY)
        builder = builder.add_source(
            Environment::with_prefix("PROJSTAT")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every probe fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.hash_length == 0 {
            return Err(ConfigError::Invalid(
                "output.hash_length must be at least 1".to_string(),
            ));
        }
        if self.probe.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "probe.timeout_seconds must be at least 1".to_string(),
            ));
        }
        regex::Regex::new(&self.git.clean_pattern).map_err(|e| {
            ConfigError::Invalid(format!("git.clean_pattern is not a valid regex: {}", e))
        })?;
        Ok(())
    }
}

/// Per-repository probing limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Seconds before a single repository query is abandoned
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Repositories probed at once; 0 means available parallelism
    #[serde(default)]
    pub max_concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_concurrency: 0,
        }
    }
}

impl ProbeConfig {
    /// Concurrency cap with 0 resolved to the machine's parallelism
    pub fn effective_concurrency(&self) -> usize {
        if self.max_concurrency > 0 {
            return self.max_concurrency;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Git backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Executable used for every query
    #[serde(default = "default_git_binary")]
    pub binary: String,
    /// Remote whose tracking branches are compared against
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Regex that marks `git status` output as clean
    #[serde(default = "default_clean_pattern")]
    pub clean_pattern: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
            remote: default_remote(),
            clean_pattern: default_clean_pattern(),
        }
    }
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_clean_pattern() -> String {
    "nothing to commit".to_string()
}

/// Order in which report lines are released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrder {
    /// Same order as the projects were requested
    #[default]
    Input,
    /// As soon as each repository finishes
    Completion,
}

/// Shape of each report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored human-readable line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub order: OutputOrder,
    #[serde(default)]
    pub format: OutputFormat,
    /// Characters of the head id shown
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            order: OutputOrder::default(),
            format: OutputFormat::default(),
            hash_length: default_hash_length(),
            color: default_color(),
        }
    }
}

fn default_hash_length() -> usize {
    7
}

fn default_color() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = StatusConfig::default();
        assert_eq!(config.probe.timeout_seconds, 30);
        assert_eq!(config.probe.max_concurrency, 0);
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.git.clean_pattern, "nothing to commit");
        assert_eq!(config.output.order, OutputOrder::Input);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.hash_length, 7);
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_concurrency() {
        let mut probe = ProbeConfig::default();
        assert!(probe.effective_concurrency() >= 1);

        probe.max_concurrency = 3;
        assert_eq!(probe.effective_concurrency(), 3);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("projstat.toml");
        std::fs::write(
            &path,
            "[git]\nremote = \"upstream\"\n\n[output]\norder = \"completion\"\n",
        )
        .unwrap();

        let config = StatusConfig::load(Some(&path)).unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert_eq!(config.output.order, OutputOrder::Completion);
        assert_eq!(config.output.hash_length, 7);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let err = StatusConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StatusConfig::default();
        config.git.clean_pattern = "(unclosed".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = StatusConfig::default();
        config.output.hash_length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
