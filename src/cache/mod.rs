//! Remote resource cache
//!
//! A process-wide keyed store of server-fetched snapshots. Each entry is
//! addressed by a [`QueryKey`] and holds the most recent known value as raw
//! JSON, a fetch timestamp, and a staleness flag. Reads go through
//! [`QueryCache::get_or_fetch`], which deduplicates concurrent identical
//! fetches so at most one network call per key is in flight at a time.
//!
//! Failure policy: a failed fetch is retried once, then the error is returned
//! to the caller and the entry is left at its last-known-good value (or absent
//! if it was never populated).

mod key;

pub use key::QueryKey;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::Error;

/// Event stream entry emitted to cache subscribers
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A snapshot was replaced wholesale
    Updated(QueryKey),
    /// A snapshot was marked stale
    Invalidated(QueryKey),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    stale: bool,
}

/// A point-in-time view of one cache entry
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub value: Value,
    pub stale: bool,
}

/// Keyed store of server-fetched snapshots, shared across resource clients
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
    in_flight: Arc<Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>>,
    events: broadcast::Sender<CacheEvent>,
    stale_time: Duration,
    retry_once: bool,
}

impl QueryCache {
    /// Create a new cache with the given freshness window
    pub fn new(stale_time: Duration, retry_once: bool) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            events,
            stale_time,
            retry_once,
        }
    }

    /// Subscribe to cache update/invalidation events.
    ///
    /// Lagged receivers drop events rather than block writers.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Read the current snapshot for a key, if any, with its staleness
    pub fn read(&self, key: &QueryKey) -> Option<Snapshot> {
        let entries = self.entries.read().unwrap();
        entries.get(key).map(|entry| Snapshot {
            value: entry.value.clone(),
            stale: entry.stale || entry.fetched_at.elapsed() >= self.stale_time,
        })
    }

    /// Read and deserialize the current snapshot for a key, ignoring staleness
    pub fn read_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        self.read(key)
            .and_then(|snap| serde_json::from_value(snap.value).ok())
    }

    /// Replace a snapshot wholesale, mark it fresh, and notify subscribers
    pub fn write<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<(), Error> {
        let value = serde_json::to_value(value)?;
        self.write_value(key, value);
        Ok(())
    }

    /// Replace a snapshot with a raw JSON value
    pub fn write_value(&self, key: &QueryKey, value: Value) {
        {
            let mut entries = self.entries.write().unwrap();
            entries.insert(
                key.clone(),
                CacheEntry {
                    value,
                    fetched_at: Instant::now(),
                    stale: false,
                },
            );
        }
        debug!("cache write: {}", key);
        let _ = self.events.send(CacheEvent::Updated(key.clone()));
    }

    /// Mark one snapshot stale; the next read of this exact key refetches
    pub fn invalidate(&self, key: &QueryKey) {
        let marked = {
            let mut entries = self.entries.write().unwrap();
            match entries.get_mut(key) {
                Some(entry) => {
                    entry.stale = true;
                    true
                }
                None => false,
            }
        };
        if marked {
            debug!("cache invalidate: {}", key);
            let _ = self.events.send(CacheEvent::Invalidated(key.clone()));
        }
    }

    /// Mark every snapshot of a resource stale (all list variants and details)
    pub fn invalidate_resource(&self, resource: &str) {
        let invalidated: Vec<QueryKey> = {
            let mut entries = self.entries.write().unwrap();
            entries
                .iter_mut()
                .filter(|(key, _)| key.resource() == resource)
                .map(|(key, entry)| {
                    entry.stale = true;
                    key.clone()
                })
                .collect()
        };
        for key in invalidated {
            debug!("cache invalidate: {}", key);
            let _ = self.events.send(CacheEvent::Invalidated(key));
        }
    }

    /// Drop a snapshot entirely
    pub fn remove(&self, key: &QueryKey) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
    }

    /// Return the cached value for a key, fetching it when absent or stale.
    ///
    /// Concurrent calls for the same key share one fetch: the first caller
    /// performs the network call while the rest wait and then read the fresh
    /// snapshot. A failed fetch is retried once before the error is returned;
    /// the entry keeps its last-known-good value either way.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(snap) = self.read(key) {
            if !snap.stale {
                return serde_json::from_value(snap.value).map_err(Error::from);
            }
        }

        let gate = {
            let mut in_flight = self.in_flight.lock().unwrap();
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let _guard = gate.lock().await;

        // Another caller may have completed the fetch while we waited.
        if let Some(snap) = self.read(key) {
            if !snap.stale {
                return serde_json::from_value(snap.value).map_err(Error::from);
            }
        }

        debug!("cache fetch: {}", key);
        let result = match fetch().await {
            Ok(value) => Ok(value),
            Err(err) if self.retry_once => {
                warn!("fetch failed for {}, retrying once: {}", key, err);
                fetch().await
            }
            Err(err) => Err(err),
        };

        let outcome = match result {
            Ok(value) => self.write(key, &value).map(|_| value),
            Err(err) => {
                warn!("fetch failed for {}: {}", key, err);
                Err(err)
            }
        };

        // Only retire the gate once the snapshot is written: a caller arriving
        // between removal and write would otherwise dispatch a second fetch.
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            in_flight.remove(key);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(60), true)
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_fetching() {
        let cache = cache();
        let key = QueryKey::list("languages");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got: Vec<i64> = cache
                .get_or_fetch(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(got, vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch_of_exact_key_only() {
        let cache = cache();
        let languages = QueryKey::list("languages");
        let dialogues = QueryKey::list("dialogues");
        let lang_calls = AtomicUsize::new(0);
        let dlg_calls = AtomicUsize::new(0);

        let fetch_langs = || async {
            lang_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["ne".to_string()])
        };
        let fetch_dlgs = || async {
            dlg_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["greetings".to_string()])
        };

        let _: Vec<String> = cache.get_or_fetch(&languages, fetch_langs).await.unwrap();
        let _: Vec<String> = cache.get_or_fetch(&dialogues, fetch_dlgs).await.unwrap();

        cache.invalidate(&languages);

        let _: Vec<String> = cache.get_or_fetch(&languages, fetch_langs).await.unwrap();
        let _: Vec<String> = cache.get_or_fetch(&dialogues, fetch_dlgs).await.unwrap();

        assert_eq!(lang_calls.load(Ordering::SeqCst), 2);
        assert_eq!(dlg_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_reads_share_one_fetch() {
        let cache = cache();
        let key = QueryKey::list("segments").with_param("dialogueId", 9);
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(vec![9_i64])
            }
        };

        let (a, b): (Result<Vec<i64>, _>, Result<Vec<i64>, _>) =
            tokio::join!(cache.get_or_fetch(&key, fetch), cache.get_or_fetch(&key, fetch));

        assert_eq!(a.unwrap(), vec![9]);
        assert_eq!(b.unwrap(), vec![9]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_readers_on_separate_threads_share_one_fetch() {
        let cache = cache();
        let key = QueryKey::list("languages");
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let key = key.clone();
            let calls = calls.clone();
            tasks.push(tokio::spawn(async move {
                let fetch = || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        Ok(vec![1_i64])
                    }
                };
                cache.get_or_fetch(&key, fetch).await
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), vec![1]);
        }
        // Late arrivals must find the written snapshot, never a fresh gate.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_retried_once_then_surfaced() {
        let cache = cache();
        let key = QueryKey::list("transactions");
        let calls = AtomicUsize::new(0);

        let result: Result<Vec<i64>, Error> = cache
            .get_or_fetch(&key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::api(500, "boom"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.read(&key).is_none());
    }

    #[tokio::test]
    async fn failed_refetch_keeps_last_known_good() {
        let cache = cache();
        let key = QueryKey::list("languages");
        cache.write(&key, &vec![1_i64, 2]).unwrap();
        cache.invalidate(&key);

        let result: Result<Vec<i64>, Error> = cache
            .get_or_fetch(&key, || async { Err(Error::api(502, "bad gateway")) })
            .await;
        assert!(result.is_err());

        let kept: Vec<i64> = cache.read_as(&key).unwrap();
        assert_eq!(kept, vec![1, 2]);
    }

    #[tokio::test]
    async fn page_and_search_params_address_independent_entries() {
        let cache = cache();
        let page1 = QueryKey::list("messages")
            .with_param("page", 1)
            .with_param("search", "foo");
        let page2 = QueryKey::list("messages")
            .with_param("page", 2)
            .with_param("search", "foo");

        cache.write(&page1, &vec!["a"]).unwrap();
        cache.write(&page2, &vec!["b"]).unwrap();

        let one: Vec<String> = cache.read_as(&page1).unwrap();
        let two: Vec<String> = cache.read_as(&page2).unwrap();
        assert_eq!(one, vec!["a"]);
        assert_eq!(two, vec!["b"]);
    }

    #[tokio::test]
    async fn writes_notify_subscribers() {
        let cache = cache();
        let mut events = cache.subscribe();
        let key = QueryKey::list("languages");

        cache.write(&key, &vec![1_i64]).unwrap();
        match events.recv().await.unwrap() {
            CacheEvent::Updated(updated) => assert_eq!(updated, key),
            other => panic!("unexpected event: {:?}", other),
        }

        cache.invalidate(&key);
        match events.recv().await.unwrap() {
            CacheEvent::Invalidated(invalidated) => assert_eq!(invalidated, key),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn zero_stale_time_refetches_every_read() {
        let cache = QueryCache::new(Duration::ZERO, false);
        let key = QueryKey::list("languages");
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: Vec<i64> = cache
                .get_or_fetch(&key, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1])
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
