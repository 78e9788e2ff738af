//! Application driver: one status run over a batch of projects.

use crate::config::{OutputFormat, StatusConfig};
use crate::domain::{RunSummary, StatusRequest};
use crate::error::{AppError, Result};
use crate::services::{
    BatchAggregator, BatchOptions, GitProvider, RepositoryProbe, RepositoryQueryProvider,
};
use crate::ui::ReportFormatter;
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Application state
pub struct App {
    /// Output shape
    format: OutputFormat,
    /// Line renderer
    formatter: ReportFormatter,
    /// Concurrent prober
    aggregator: BatchAggregator,
}

impl App {
    /// Create an app backed by the git CLI
    pub fn new(config: StatusConfig) -> Result<Self> {
        let provider = GitProvider::new(&config.git)?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Create an app backed by any repository query provider
    pub fn with_provider(
        config: StatusConfig,
        provider: Arc<dyn RepositoryQueryProvider>,
    ) -> Self {
        let timeout = Duration::from_secs(config.probe.timeout_seconds);
        let probe = RepositoryProbe::new(provider, timeout);
        let options = BatchOptions {
            max_concurrency: config.probe.effective_concurrency(),
            order: config.output.order,
        };

        Self {
            format: config.output.format,
            formatter: ReportFormatter::from_config(&config.output),
            aggregator: BatchAggregator::new(probe, options),
        }
    }

    /// Probe every requested project and write one line per project to `out`.
    ///
    /// Lines are flushed as they are released so slow repositories do not
    /// hold back output that is already known.
    pub async fn run<W: Write>(
        &self,
        request: &StatusRequest,
        out: &mut W,
    ) -> Result<RunSummary> {
        if !request.root_exists() {
            return Err(AppError::RootNotFound(request.root.clone()));
        }

        tracing::info!(
            "Checking {} projects under {:?} (fetch: {})",
            request.projects.len(),
            request.root,
            request.include_divergence
        );

        let mut summary = RunSummary::default();
        let mut reports = self
            .aggregator
            .reports(request.projects.clone(), request.include_divergence);

        while let Some(report) = reports.next().await {
            summary.record(&report.outcome);
            match self.format {
                OutputFormat::Text => {
                    let line = self.formatter.line(&report.name, &report.outcome);
                    writeln!(out, "{}", line)?;
                }
                OutputFormat::Json => {
                    serde_json::to_writer(&mut *out, &self.formatter.json(&report))?;
                    writeln!(out)?;
                }
            }
            out.flush()?;
        }

        tracing::info!(
            "Done: {} clean, {} dirty, {} not found, {} failed",
            summary.clean,
            summary.dirty,
            summary.not_found,
            summary.failed
        );

        Ok(summary)
    }
}
