//! Time-expiring memoization for profiler calls.
//!
//! An explicit cache object rather than a function wrapper: callers build a
//! key from their call arguments and go through [`TtlCache::get_or_compute`].
//! Entries are valid while `now - stored_at < ttl` and are otherwise treated
//! as absent. There is no size-based eviction; the working set is bounded by
//! the handful of distinct prompts a session produces within one TTL window.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Process-wide TTL cache. Interior mutability so it can live in `AppState`
/// behind an `Arc` without a write lock around the whole state.
///
/// The mutex is only held for map lookups and inserts, never across an await.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if one exists and is younger than
    /// `ttl`. Stale entries are left in place; they are overwritten on the
    /// next compute for the same key.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries
            .get(key)
            .filter(|(_, stored_at)| stored_at.elapsed() < ttl)
            .map(|(value, _)| value.clone())
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(key, (value, Instant::now()));
    }

    /// Empties the store. Wired to the manual cache-clear endpoint.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    /// Returns the live cached value for `key`, or awaits `compute`, stores
    /// the result with the current timestamp, and returns it.
    ///
    /// Errors from `compute` are propagated and never cached, so a failed
    /// profiler call does not poison the key for the rest of the TTL window.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key, ttl) {
            tracing::debug!("cache hit for key ({} bytes)", key.len());
            return Ok(value);
        }

        let value = compute().await?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_second_call_within_ttl_does_not_recompute() {
        let cache: TtlCache<String> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Result<String, ()> = cache
                .get_or_compute("prompt|job", HOUR, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("profiled".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "profiled");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputes() {
        let cache: TtlCache<String> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        // A zero TTL makes every stored entry immediately stale.
        for _ in 0..2 {
            let _: Result<String, ()> = cache
                .get_or_compute("prompt|job", Duration::ZERO, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("profiled".to_string())
                })
                .await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_forces_recompute() {
        let cache: TtlCache<i32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let _: Result<i32, ()> = cache
            .get_or_compute("k", HOUR, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert_eq!(cache.len(), 0);

        let _: Result<i32, ()> = cache
            .get_or_compute("k", HOUR, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let cache: TtlCache<i32> = TtlCache::new();
        let calls = AtomicUsize::new(0);

        let first: Result<i32, &str> = cache
            .get_or_compute("k", HOUR, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("network down")
            })
            .await;
        assert!(first.is_err());
        assert_eq!(cache.len(), 0);

        let second: Result<i32, &str> = cache
            .get_or_compute("k", HOUR, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(second.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let cache: TtlCache<i32> = TtlCache::new();
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        assert_eq!(cache.get("a", HOUR), Some(1));
        assert_eq!(cache.get("b", HOUR), Some(2));
        assert_eq!(cache.get("c", HOUR), None);
    }
}
