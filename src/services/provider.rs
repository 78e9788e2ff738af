//! Repository query provider: the narrow contract the probe drives.
//!
//! Any backend that can answer these questions for a working copy path can
//! replace the git CLI implementation without touching the batch logic.

use crate::error::ProbeResult;
use async_trait::async_trait;
use std::path::Path;

/// Read-only questions about one working copy, plus the remote refresh
#[async_trait]
pub trait RepositoryQueryProvider: Send + Sync {
    /// Current branch name, trimmed
    async fn current_branch(&self, path: &Path) -> ProbeResult<String>;

    /// Full object id of HEAD, trimmed
    async fn head_id(&self, path: &Path) -> ProbeResult<String>;

    /// Whether the working tree has anything besides a clean state
    async fn is_dirty(&self, path: &Path) -> ProbeResult<bool>;

    /// Update remote-tracking refs
    async fn refresh_remote_refs(&self, path: &Path) -> ProbeResult<()>;

    /// Upstream ref for `branch`, or `None` when there is none
    async fn upstream(&self, path: &Path, branch: &str) -> ProbeResult<Option<String>>;

    /// Commits reachable from exactly one of HEAD and `upstream`
    async fn symmetric_difference_count(&self, path: &Path, upstream: &str) -> ProbeResult<u64>;

    /// Commits reachable from HEAD but not from `upstream`
    async fn ahead_count(&self, path: &Path, upstream: &str) -> ProbeResult<u64>;
}
