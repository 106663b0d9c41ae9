use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{HostSummary, Pagination, StatEntry};

/// Failures a store can report.
///
/// The store never logs and never retries; every failure is handed back to
/// the caller as one of these, and the HTTP layer decides what the client
/// sees. `Internal` is reserved for backends that can actually break; the
/// in-memory store only produces it when its lock has been poisoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no hosts found")]
    NoHostsFound,

    #[error("host '{0}' not found")]
    HostNotFound(String),

    #[error("all entries skipped")]
    AllEntriesSkipped,

    #[error("store failure: {0}")]
    Internal(String),
}

/// Port for persisting and querying pushed host stats
#[async_trait]
pub trait HostStore: Send + Sync {
    /// All host summaries, windowed by `page`. The iteration order of the
    /// underlying map leaks through here: callers must not assume any
    /// particular host ordering across calls.
    async fn list_hosts(&self, page: Pagination) -> Result<Vec<HostSummary>, StoreError>;

    /// Exact-match lookup of one host summary.
    async fn get_host(&self, hostname: &str) -> Result<HostSummary, StoreError>;

    /// One host's stat history (newest first), windowed by `page`.
    /// An unknown host fails before pagination is considered.
    async fn stats_by_hostname(
        &self,
        hostname: &str,
        page: Pagination,
    ) -> Result<Vec<StatEntry>, StoreError>;

    /// Record a snapshot under `hostname`, creating the host on first
    /// contact. `hostname` wins over whatever the entry itself carries.
    async fn insert_stats(&self, hostname: &str, entry: StatEntry) -> Result<(), StoreError>;
}
