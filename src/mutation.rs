//! Mutation coordination
//!
//! Executes one write operation against the backend and reconciles the query
//! cache afterward. Two reconciliation modes:
//!
//! - **Invalidate-after-success** (default): on success, the named keys are
//!   marked stale so the next read refetches; on failure the cache is left
//!   untouched.
//! - **Optimistic**: the expected effect is applied to the cached snapshot
//!   before the network call is dispatched; on failure the pre-mutation
//!   snapshot is restored exactly.
//!
//! The coordinator does not serialize unrelated mutations. Callers disable
//! their own triggering control while a mutation is in flight; different
//! entities may be mutated concurrently with independent outcomes.

use std::future::Future;
use std::sync::Arc;

use log::warn;
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::error::Error;
use crate::notify::{Notification, NotificationSink};

/// Executes writes and reconciles the cache when they settle
#[derive(Clone)]
pub struct MutationCoordinator {
    cache: QueryCache,
    sink: Arc<dyn NotificationSink>,
}

impl MutationCoordinator {
    pub fn new(cache: QueryCache, sink: Arc<dyn NotificationSink>) -> Self {
        Self { cache, sink }
    }

    /// The cache this coordinator reconciles
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run a write in invalidate-after-success mode.
    ///
    /// On success the given keys are marked stale and a success notification
    /// is raised; on failure an error notification carries the server's
    /// message when present.
    pub async fn run<T, Fut>(
        &self,
        op: Fut,
        invalidates: &[QueryKey],
        success_message: &str,
    ) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
    {
        match op.await {
            Ok(value) => {
                for key in invalidates {
                    self.cache.invalidate(key);
                }
                self.sink.publish(Notification::success(success_message));
                Ok(value)
            }
            Err(err) => {
                self.sink.publish(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Run a write in optimistic mode against one cached snapshot.
    ///
    /// The pre-mutation snapshot is captured, `patch` is applied to the cache
    /// synchronously before `op` is first polled, and on failure the captured
    /// snapshot is written back verbatim. On success the already-applied
    /// optimistic state is final.
    pub async fn run_optimistic<T, Fut, P>(
        &self,
        key: &QueryKey,
        patch: P,
        op: Fut,
        success_message: &str,
    ) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
        P: FnOnce(&mut Value),
    {
        let snapshot = self.cache.read(key).map(|snap| snap.value);

        if let Some(previous) = &snapshot {
            let mut patched = previous.clone();
            patch(&mut patched);
            self.cache.write_value(key, patched);
        }

        match op.await {
            Ok(value) => {
                self.sink.publish(Notification::success(success_message));
                Ok(value)
            }
            Err(err) => {
                match snapshot {
                    Some(previous) => {
                        warn!("rolling back optimistic update for {}", key);
                        self.cache.write_value(key, previous);
                    }
                    // Nothing was cached, nothing to restore.
                    None => self.cache.invalidate(key),
                }
                self.sink.publish(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemorySink, Severity};
    use serde_json::json;
    use std::time::Duration;

    fn coordinator() -> (MutationCoordinator, Arc<MemorySink>) {
        let cache = QueryCache::new(Duration::from_secs(60), false);
        let sink = MemorySink::new();
        (
            MutationCoordinator::new(cache, sink.clone() as Arc<dyn NotificationSink>),
            sink,
        )
    }

    fn remove_message(value: &mut Value, id: i64) {
        if let Some(messages) = value
            .get_mut("messages")
            .and_then(Value::as_array_mut)
        {
            messages.retain(|msg| msg["id"] != json!(id));
        }
        if let Some(total) = value.get("total").and_then(Value::as_i64) {
            value["total"] = json!(total - 1);
        }
    }

    #[tokio::test]
    async fn success_invalidates_named_keys_and_notifies() {
        let (coordinator, sink) = coordinator();
        let key = QueryKey::list("languages");
        coordinator.cache().write(&key, &vec![1_i64]).unwrap();

        let result = coordinator
            .run(async { Ok(42_i64) }, &[key.clone()], "Language created")
            .await;

        assert_eq!(result.unwrap(), 42);
        assert!(coordinator.cache().read(&key).unwrap().stale);

        let notes = sink.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Success);
        assert_eq!(notes[0].message, "Language created");
    }

    #[tokio::test]
    async fn failure_leaves_cache_untouched_and_surfaces_server_message() {
        let (coordinator, sink) = coordinator();
        let key = QueryKey::list("languages");
        coordinator.cache().write(&key, &vec![1_i64]).unwrap();

        let result: Result<i64, Error> = coordinator
            .run(
                async { Err(Error::api(409, "Name already taken")) },
                &[key.clone()],
                "Language created",
            )
            .await;

        assert!(result.is_err());
        assert!(!coordinator.cache().read(&key).unwrap().stale);

        let notes = sink.drain();
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Name already taken");
    }

    #[tokio::test]
    async fn optimistic_delete_removes_row_and_decrements_total() {
        let (coordinator, _sink) = coordinator();
        let key = QueryKey::list("messages").with_param("page", 1);
        let page = json!({
            "messages": [{ "id": 1 }, { "id": 2 }, { "id": 3 }],
            "total": 3
        });
        coordinator.cache().write_value(&key, page);

        let result = coordinator
            .run_optimistic(
                &key,
                |value| remove_message(value, 2),
                async { Ok(()) },
                "Message deleted",
            )
            .await;
        assert!(result.is_ok());

        let after = coordinator.cache().read(&key).unwrap().value;
        let ids: Vec<i64> = after["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|msg| msg["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(after["total"], json!(2));
    }

    #[tokio::test]
    async fn optimistic_failure_restores_snapshot_exactly() {
        let (coordinator, sink) = coordinator();
        let key = QueryKey::list("messages").with_param("page", 1);
        let page = json!({
            "messages": [{ "id": 1 }, { "id": 2 }],
            "total": 2
        });
        coordinator.cache().write_value(&key, page.clone());

        let result: Result<(), Error> = coordinator
            .run_optimistic(
                &key,
                |value| remove_message(value, 1),
                async { Err(Error::api(500, "delete failed")) },
                "Message deleted",
            )
            .await;
        assert!(result.is_err());

        let restored = coordinator.cache().read(&key).unwrap().value;
        assert_eq!(restored, page);

        let notes = sink.drain();
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "delete failed");
    }

    #[tokio::test]
    async fn optimistic_patch_applies_before_network_settles() {
        let (coordinator, _sink) = coordinator();
        let key = QueryKey::list("messages");
        coordinator
            .cache()
            .write_value(&key, json!({ "messages": [{ "id": 5 }], "total": 1 }));

        let cache = coordinator.cache().clone();
        let observe_key = key.clone();
        let op = async move {
            // By the time the network future runs, the patch must be visible.
            let mid = cache.read(&observe_key).unwrap().value;
            assert_eq!(mid["total"], json!(0));
            Ok(())
        };

        coordinator
            .run_optimistic(&key, |value| remove_message(value, 5), op, "deleted")
            .await
            .unwrap();
    }
}
