//! Repository probe: one status snapshot per working copy.
//!
//! Each question goes to the provider once and is bounded by the probe
//! timeout. Branch, head and cleanliness are independent and run together;
//! the remote refresh always finishes before any divergence count starts.

use super::provider::RepositoryQueryProvider;
use crate::domain::{Divergence, DivergenceState, RepositoryStatus};
use crate::error::{ProbeError, ProbeResult};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runs provider queries against one repository at a time
#[derive(Clone)]
pub struct RepositoryProbe {
    provider: Arc<dyn RepositoryQueryProvider>,
    timeout: Duration,
}

impl RepositoryProbe {
    /// Create a probe with a per-query timeout
    pub fn new(provider: Arc<dyn RepositoryQueryProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> ProbeResult<T>
    where
        F: Future<Output = ProbeResult<T>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                operation,
                timeout: self.timeout,
            }),
        }
    }

    pub async fn current_branch(&self, path: &Path) -> ProbeResult<String> {
        self.bounded("branch", self.provider.current_branch(path)).await
    }

    pub async fn current_head_id(&self, path: &Path) -> ProbeResult<String> {
        self.bounded("head", self.provider.head_id(path)).await
    }

    pub async fn is_dirty(&self, path: &Path) -> ProbeResult<bool> {
        self.bounded("status", self.provider.is_dirty(path)).await
    }

    pub async fn refresh_remote_refs(&self, path: &Path) -> ProbeResult<()> {
        self.bounded("fetch", self.provider.refresh_remote_refs(path)).await
    }

    /// Ahead/behind against the upstream of `branch`.
    ///
    /// Never fails: whatever prevents the comparison (detached HEAD, missing
    /// upstream, unreadable counts) becomes `DivergenceState::Unknown`.
    pub async fn divergence(&self, path: &Path, branch: &str) -> DivergenceState {
        // `rev-parse --abbrev-ref HEAD` answers `HEAD` when detached
        if branch == "HEAD" {
            return DivergenceState::unknown("detached HEAD");
        }

        let upstream = match self
            .bounded("upstream", self.provider.upstream(path, branch))
            .await
        {
            Ok(Some(upstream)) => upstream,
            Ok(None) => return DivergenceState::unknown(format!("no upstream for {}", branch)),
            Err(e) => return DivergenceState::unknown(e.to_string()),
        };

        let (total, ahead) = tokio::join!(
            self.bounded(
                "rev-list",
                self.provider.symmetric_difference_count(path, &upstream)
            ),
            self.bounded("rev-list", self.provider.ahead_count(path, &upstream)),
        );

        match (total, ahead) {
            (Ok(total), Ok(ahead)) => {
                if ahead > total {
                    tracing::warn!(
                        "{}: ahead count {} exceeds symmetric difference {} against {}",
                        path.display(),
                        ahead,
                        total,
                        upstream
                    );
                }
                DivergenceState::Known(Divergence::from_counts(total, ahead))
            }
            (Err(e), _) | (_, Err(e)) => DivergenceState::unknown(e.to_string()),
        }
    }

    /// Full status snapshot of the repository at `path`
    pub async fn probe(
        &self,
        path: &Path,
        include_divergence: bool,
    ) -> ProbeResult<RepositoryStatus> {
        let refresh = async {
            if !include_divergence {
                return;
            }
            if let Err(e) = self.refresh_remote_refs(path).await {
                tracing::warn!(
                    "{}: fetch failed, comparing against existing remote refs: {}",
                    path.display(),
                    e
                );
            }
        };

        let (branch, head_id, is_dirty, ()) = tokio::join!(
            self.current_branch(path),
            self.current_head_id(path),
            self.is_dirty(path),
            refresh,
        );
        let branch = branch?;
        let head_id = head_id?;
        let is_dirty = is_dirty?;

        let divergence = if include_divergence {
            Some(self.divergence(path, &branch).await)
        } else {
            None
        };

        tracing::debug!(
            "{}: branch={} head={} dirty={}",
            path.display(),
            branch,
            head_id,
            is_dirty
        );

        Ok(RepositoryStatus {
            branch,
            head_id,
            is_dirty,
            divergence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::fake::{FakeProvider, FakeRepo};
    use tokio_test::{assert_err, assert_ok};

    const REPO: &str = "/projects/alpha";

    fn probe_with(repo: FakeRepo, timeout: Duration) -> (Arc<FakeProvider>, RepositoryProbe) {
        let provider = Arc::new(FakeProvider::new().with_repo(REPO, repo));
        let probe = RepositoryProbe::new(provider.clone(), timeout);
        (provider, probe)
    }

    #[tokio::test]
    async fn test_probe_without_divergence() {
        let (provider, probe) =
            probe_with(FakeRepo::clean("abcdef1234567890"), Duration::from_secs(5));

        let status = assert_ok!(probe.probe(Path::new(REPO), false).await);
        assert_eq!(status.branch, "main");
        assert_eq!(status.head_id, "abcdef1234567890");
        assert!(!status.is_dirty);
        assert_eq!(status.divergence, None);
        assert!(!provider.events().iter().any(|e| e.starts_with("fetch")));
    }

    #[tokio::test]
    async fn test_probe_with_divergence() {
        let (_provider, probe) = probe_with(
            FakeRepo::clean("abc").dirty().counts(5, 2),
            Duration::from_secs(5),
        );

        let status = assert_ok!(probe.probe(Path::new(REPO), true).await);
        assert!(status.is_dirty);
        assert_eq!(
            status.divergence,
            Some(DivergenceState::Known(Divergence::new(2, 3)))
        );
    }

    #[tokio::test]
    async fn test_refresh_precedes_counts() {
        let (provider, probe) = probe_with(
            FakeRepo::clean("abc").counts(1, 1).delay_ms(20),
            Duration::from_secs(5),
        );

        assert_ok!(probe.probe(Path::new(REPO), true).await);

        let events = provider.events();
        let fetch = events.iter().position(|e| e.starts_with("fetch")).unwrap();
        let first_count = events.iter().position(|e| e.starts_with("count")).unwrap();
        assert!(fetch < first_count);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_tolerated() {
        let mut repo = FakeRepo::clean("abc").counts(3, 3);
        repo.fail_fetch = true;
        let (_provider, probe) = probe_with(repo, Duration::from_secs(5));

        let status = assert_ok!(probe.probe(Path::new(REPO), true).await);
        assert_eq!(
            status.divergence,
            Some(DivergenceState::Known(Divergence::new(3, 0)))
        );
    }

    #[tokio::test]
    async fn test_missing_upstream_is_unknown() {
        let mut repo = FakeRepo::clean("abc");
        repo.upstream = None;
        let (provider, probe) = probe_with(repo, Duration::from_secs(5));

        let status = assert_ok!(probe.probe(Path::new(REPO), true).await);
        assert_eq!(
            status.divergence,
            Some(DivergenceState::unknown("no upstream for main"))
        );
        assert!(!provider.events().iter().any(|e| e.starts_with("count")));
    }

    #[tokio::test]
    async fn test_detached_head_is_unknown() {
        let mut repo = FakeRepo::clean("abc").counts(1, 0);
        repo.branch = "HEAD".to_string();
        let (provider, probe) = probe_with(repo, Duration::from_secs(5));

        let status = assert_ok!(probe.probe(Path::new(REPO), true).await);
        assert_eq!(status.branch, "HEAD");
        assert_eq!(
            status.divergence,
            Some(DivergenceState::unknown("detached HEAD"))
        );
        let events = provider.events();
        assert!(!events.iter().any(|e| e.starts_with("upstream")));
        assert!(!events.iter().any(|e| e.starts_with("count")));
    }

    #[tokio::test]
    async fn test_count_failure_is_unknown() {
        let mut repo = FakeRepo::clean("abc");
        repo.fail_counts = true;
        let (_provider, probe) = probe_with(repo, Duration::from_secs(5));

        let state = probe.divergence(Path::new(REPO), "main").await;
        assert!(state.known().is_none());
    }

    #[tokio::test]
    async fn test_required_query_failure_fails_probe() {
        let mut repo = FakeRepo::clean("abc");
        repo.fail_branch = true;
        let (_provider, probe) = probe_with(repo, Duration::from_secs(5));

        assert_err!(probe.probe(Path::new(REPO), false).await);
    }

    #[tokio::test]
    async fn test_timeout() {
        let (_provider, probe) = probe_with(
            FakeRepo::clean("abc").delay_ms(500),
            Duration::from_millis(20),
        );

        let err = probe.current_head_id(Path::new(REPO)).await.unwrap_err();
        assert_eq!(
            err,
            ProbeError::Timeout {
                operation: "head",
                timeout: Duration::from_millis(20),
            }
        );
    }
}
