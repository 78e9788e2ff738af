//! Batch aggregation across many working copies.
//!
//! Projects are probed concurrently with a cap on how many repositories are
//! in flight. Every requested project produces exactly one report; probe
//! errors are recovered here and never abort the batch.

use super::probe::RepositoryProbe;
use crate::config::OutputOrder;
use crate::domain::{ProbeOutcome, ProjectReport, ProjectSpec};
use futures::stream::{self, BoxStream, StreamExt};

/// How the batch is scheduled and released
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Repositories probed at once
    pub max_concurrency: usize,
    /// Release order of reports
    pub order: OutputOrder,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            order: OutputOrder::Input,
        }
    }
}

/// Fans projects out to the probe and collects one report per project
pub struct BatchAggregator {
    probe: RepositoryProbe,
    options: BatchOptions,
}

impl BatchAggregator {
    /// Create a new aggregator
    pub fn new(probe: RepositoryProbe, options: BatchOptions) -> Self {
        Self { probe, options }
    }

    /// Stream reports as soon as the release order allows.
    ///
    /// With `OutputOrder::Input` a report is yielded once it and every
    /// earlier project are done; with `OutputOrder::Completion` reports are
    /// yielded as repositories finish.
    pub fn reports<'a>(
        &'a self,
        projects: Vec<ProjectSpec>,
        include_divergence: bool,
    ) -> BoxStream<'a, ProjectReport> {
        let limit = self.options.max_concurrency.max(1);
        let pending = stream::iter(projects)
            .map(move |spec| self.probe_project(spec, include_divergence));

        match self.options.order {
            OutputOrder::Input => pending.buffered(limit).boxed(),
            OutputOrder::Completion => pending.buffer_unordered(limit).boxed(),
        }
    }

    /// Run the whole batch and return every report
    #[cfg(test)]
    pub async fn collect(
        &self,
        projects: Vec<ProjectSpec>,
        include_divergence: bool,
    ) -> Vec<ProjectReport> {
        self.reports(projects, include_divergence).collect().await
    }

    async fn probe_project(&self, spec: ProjectSpec, include_divergence: bool) -> ProjectReport {
        let path = spec.working_path();

        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        let outcome = if !is_dir {
            tracing::debug!("{}: folder not found at {}", spec.name, path.display());
            ProbeOutcome::NotFound
        } else {
            match self.probe.probe(&path, include_divergence).await {
                Ok(status) => ProbeOutcome::Success(status),
                Err(e) => {
                    tracing::warn!("{}: probe failed: {}", spec.name, e);
                    ProbeOutcome::Failure(e)
                }
            }
        };

        ProjectReport {
            name: spec.name,
            path,
            outcome,
        }
    }
}
