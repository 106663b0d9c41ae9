use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{HostRecord, HostSummary, Pagination, StatEntry};
use crate::ports::{HostStore, StoreError};

/// In-memory host registry guarded by one coarse lock.
///
/// Every operation is a single critical section over the whole map; no
/// operation touches I/O while holding the lock, so hold times stay short.
/// Reads clone out of the map — callers never see a live reference into
/// store-owned data.
pub struct InMemoryStore {
    hosts: Mutex<HashMap<String, HostRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            hosts: Mutex::new(HashMap::new()),
        }
    }

    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, HostRecord>>, StoreError> {
        self.hosts
            .lock()
            .map_err(|_| StoreError::Internal("host map lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Windows `items` by skip/limit. `len` must be the total item count.
///
/// A skip at or past the end fails: the page is provably empty. A limit
/// reaching past the end clamps to whatever is left after the skip.
fn window<I, T>(len: usize, items: I, page: Pagination) -> Result<Vec<T>, StoreError>
where
    I: IntoIterator<Item = T>,
{
    if page.skip >= len {
        return Err(StoreError::AllEntriesSkipped);
    }

    let take = if page.skip.saturating_add(page.limit) >= len {
        len - page.skip
    } else {
        page.limit
    };

    Ok(items.into_iter().skip(page.skip).take(take).collect())
}

#[async_trait]
impl HostStore for InMemoryStore {
    async fn list_hosts(&self, page: Pagination) -> Result<Vec<HostSummary>, StoreError> {
        let hosts = self.locked()?;

        if hosts.is_empty() {
            return Err(StoreError::NoHostsFound);
        }

        window(
            hosts.len(),
            hosts.values().map(|record| record.summary().clone()),
            page,
        )
    }

    async fn get_host(&self, hostname: &str) -> Result<HostSummary, StoreError> {
        let hosts = self.locked()?;

        hosts
            .get(hostname)
            .map(|record| record.summary().clone())
            .ok_or_else(|| StoreError::HostNotFound(hostname.to_string()))
    }

    async fn stats_by_hostname(
        &self,
        hostname: &str,
        page: Pagination,
    ) -> Result<Vec<StatEntry>, StoreError> {
        let hosts = self.locked()?;

        let record = hosts
            .get(hostname)
            .ok_or_else(|| StoreError::HostNotFound(hostname.to_string()))?;

        window(record.len(), record.history().iter().cloned(), page)
    }

    async fn insert_stats(&self, hostname: &str, mut entry: StatEntry) -> Result<(), StoreError> {
        let mut hosts = self.locked()?;
        let now = Utc::now();

        // stored entries never disagree with the key they live under
        entry.hostname = hostname.to_string();

        match hosts.entry(hostname.to_string()) {
            Entry::Occupied(mut host) => host.get_mut().push(entry, now),
            Entry::Vacant(slot) => {
                slot.insert(HostRecord::first(hostname, entry, now));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::join_all;

    use super::*;

    fn page(skip: usize, limit: usize) -> Pagination {
        Pagination::new(skip, limit)
    }

    #[tokio::test]
    async fn get_host_unknown_hostname_fails() {
        let store = InMemoryStore::new();

        let err = store.get_host("ghost").await.unwrap_err();

        assert_eq!(err, StoreError::HostNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn insert_creates_host_on_first_contact() {
        let store = InMemoryStore::new();

        store
            .insert_stats("web-1", StatEntry::new("web-1"))
            .await
            .unwrap();

        let summary = store.get_host("web-1").await.unwrap();
        assert_eq!(summary.hostname, "web-1");
        assert_eq!(summary.data_points, 1);
    }

    #[tokio::test]
    async fn second_insert_increments_count_and_keeps_both() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(1.0))
            .await
            .unwrap();
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(2.0))
            .await
            .unwrap();

        let summary = store.get_host("web-1").await.unwrap();
        assert_eq!(summary.data_points, 2);

        let stats = store
            .stats_by_hostname("web-1", page(0, 2))
            .await
            .unwrap();
        assert_eq!(stats.len(), 2);
    }

    #[tokio::test]
    async fn insert_keeps_history_newest_first() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(1.0))
            .await
            .unwrap();
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(2.0))
            .await
            .unwrap();

        let latest = store
            .stats_by_hostname("web-1", page(0, 1))
            .await
            .unwrap();
        assert_eq!(latest[0].cpu, 2.0);
    }

    #[tokio::test]
    async fn list_hosts_empty_store_fails() {
        let store = InMemoryStore::new();

        let err = store.list_hosts(page(0, 10)).await.unwrap_err();

        assert_eq!(err, StoreError::NoHostsFound);
    }

    #[tokio::test]
    async fn list_hosts_skip_at_or_past_count_fails() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1"))
            .await
            .unwrap();
        store
            .insert_stats("web-2", StatEntry::new("web-2"))
            .await
            .unwrap();

        let err = store.list_hosts(page(2, 0)).await.unwrap_err();
        assert_eq!(err, StoreError::AllEntriesSkipped);

        let err = store.list_hosts(page(3, 10)).await.unwrap_err();
        assert_eq!(err, StoreError::AllEntriesSkipped);
    }

    #[tokio::test]
    async fn list_hosts_limit_past_end_returns_remainder() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1"))
            .await
            .unwrap();
        store
            .insert_stats("web-2", StatEntry::new("web-2"))
            .await
            .unwrap();

        let hosts = store.list_hosts(page(0, 3)).await.unwrap();

        assert_eq!(hosts.len(), 2);
        // map order is arbitrary: check membership, never position
        let mut names: Vec<_> = hosts.into_iter().map(|h| h.hostname).collect();
        names.sort();
        assert_eq!(names, vec!["web-1", "web-2"]);
    }

    #[tokio::test]
    async fn list_hosts_exact_window_returns_limit_entries() {
        let store = InMemoryStore::new();
        for name in ["a", "b", "c", "d"] {
            store
                .insert_stats(name, StatEntry::new(name))
                .await
                .unwrap();
        }

        let hosts = store.list_hosts(page(1, 2)).await.unwrap();

        assert_eq!(hosts.len(), 2);
    }

    #[tokio::test]
    async fn stats_unknown_host_fails_before_pagination() {
        let store = InMemoryStore::new();

        // an absurd window must not mask the lookup failure
        let err = store
            .stats_by_hostname("ghost", page(99, 0))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::HostNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn stats_window_respects_skip_and_limit() {
        let store = InMemoryStore::new();
        // history ends up [b, a]: b is newest
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(1.0))
            .await
            .unwrap();
        store
            .insert_stats("web-1", StatEntry::new("web-1").with_cpu(2.0))
            .await
            .unwrap();

        let second_page = store
            .stats_by_hostname("web-1", page(1, 1))
            .await
            .unwrap();

        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].cpu, 1.0);
    }

    #[tokio::test]
    async fn stats_skip_past_history_fails() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1"))
            .await
            .unwrap();

        let err = store
            .stats_by_hostname("web-1", page(5, 10))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::AllEntriesSkipped);
    }

    #[tokio::test]
    async fn stored_entries_keep_their_payload() {
        use crate::domain::{ProcessStat, SpaceUsage};

        let store = InMemoryStore::new();
        let taken_at = chrono::Utc::now();
        let entry = StatEntry::new("web-1")
            .with_cpu(73.2)
            .with_disk(SpaceUsage::new(100, 400))
            .with_memory(SpaceUsage::new(6, 16))
            .with_processes(vec![ProcessStat::new("nginx", 42, 3.5)])
            .with_timestamp(taken_at);

        store.insert_stats("web-1", entry.clone()).await.unwrap();

        let stats = store
            .stats_by_hostname("web-1", page(0, 1))
            .await
            .unwrap();
        assert_eq!(stats[0], entry);
        assert_eq!(stats[0].disk.usage_percent(), 25.0);
    }

    #[tokio::test]
    async fn returned_sequences_are_copies() {
        let store = InMemoryStore::new();
        store
            .insert_stats("web-1", StatEntry::new("web-1"))
            .await
            .unwrap();

        let mut first = store.list_hosts(page(0, 10)).await.unwrap();
        first[0].hostname = "mangled".to_string();
        first.clear();

        let second = store.list_hosts(page(0, 10)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].hostname, "web-1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_inserts_for_distinct_hosts_never_lose_entries() {
        let store = Arc::new(InMemoryStore::new());
        let n = 16;

        let tasks: Vec<_> = (0..n)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let hostname = format!("host-{i}");
                    store
                        .insert_stats(&hostname, StatEntry::new(&hostname))
                        .await
                })
            })
            .collect();

        for result in join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let hosts = store.list_hosts(page(0, n)).await.unwrap();
        assert_eq!(hosts.len(), n);
        assert!(hosts.iter().all(|h| h.data_points == 1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_inserts_for_one_host_all_land() {
        let store = Arc::new(InMemoryStore::new());
        let n = 16;

        let tasks: Vec<_> = (0..n)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_stats("web-1", StatEntry::new("web-1").with_cpu(i as f64))
                        .await
                })
            })
            .collect();

        for result in join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let summary = store.get_host("web-1").await.unwrap();
        assert_eq!(summary.data_points, n as u64);
    }
}
