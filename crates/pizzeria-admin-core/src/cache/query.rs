use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::models::ListQuery;

/// Consider cached query results stale after 5 minutes.
const CACHE_STALE_MINUTES: i64 = 5;

/// Resource names used as query-key prefixes.
pub mod resources {
    pub const SELF: &str = "self";
    pub const USERS: &str = "get-users";
    pub const TENANTS: &str = "get-tenants";
    pub const CATEGORIES: &str = "get-categories";
    pub const PRODUCTS: &str = "get-products";
}

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }
}

/// Resource name plus encoded parameters, e.g. `get-users?currentPage=1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: String,
    params: String,
}

impl QueryKey {
    pub fn new(resource: &str, params: impl Into<String>) -> Self {
        Self {
            resource: resource.to_string(),
            params: params.into(),
        }
    }

    pub fn list(resource: &str, query: &ListQuery) -> Self {
        Self::new(resource, query.canonical())
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.params)
        }
    }
}

struct Entry {
    cached: CachedData<serde_json::Value>,
    invalidated: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
}

/// In-memory cache of query results.
///
/// Values are held as JSON so one cache serves every resource type.
/// The lock is never held while a loader runs.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    max_age: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_max_age(Duration::minutes(CACHE_STALE_MINUTES))
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            max_age,
        }
    }

    /// Cached value for `key`, or the loader's result on a miss.
    /// Failed loads are not cached.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, loader: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.fresh(key).await {
            match serde_json::from_value(value) {
                Ok(data) => {
                    debug!(key = %key, "Query cache hit");
                    return Ok(data);
                }
                Err(e) => warn!(key = %key, error = %e, "Cached value has unexpected shape, reloading"),
            }
        }

        debug!(key = %key, "Query cache miss");
        let data = loader().await?;
        self.store(key, &data).await;
        Ok(data)
    }

    async fn fresh(&self, key: &QueryKey) -> Option<serde_json::Value> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.invalidated && !entry.cached.is_stale(self.max_age))
            .map(|entry| entry.cached.data.clone())
    }

    async fn store<T: Serialize>(&self, key: &QueryKey, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache query result");
                return;
            }
        };
        let mut inner = self.inner.lock().await;
        inner.entries.insert(
            key.clone(),
            Entry {
                cached: CachedData::new(value),
                invalidated: false,
            },
        );
    }

    /// Mark every entry of `resource` for reload. Returns how many were marked.
    pub async fn invalidate(&self, resource: &str) -> usize {
        let mut inner = self.inner.lock().await;
        let mut count = 0;
        for (key, entry) in inner.entries.iter_mut() {
            if key.resource == resource && !entry.invalidated {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(resource, count, "Invalidated queries");
        count
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_count(cache: &QueryCache, key: &QueryKey, calls: &AtomicUsize) -> Vec<i64> {
        cache
            .fetch(key, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::list(resources::USERS, &ListQuery::new().param("currentPage", 1));

        assert_eq!(load_count(&cache, &key, &calls).await, vec![1, 2, 3]);
        load_count(&cache, &key, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.invalidate(resources::USERS).await, 1);
        assert_eq!(cache.invalidate(resources::TENANTS).await, 0);
        load_count(&cache, &key, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_params_are_part_of_the_key() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let page1 = QueryKey::list(resources::USERS, &ListQuery::new().param("currentPage", 1));
        let page2 = QueryKey::list(resources::USERS, &ListQuery::new().param("currentPage", 2));
        assert_eq!(page2.to_string(), "get-users?currentPage=2");

        load_count(&cache, &page1, &calls).await;
        load_count(&cache, &page2, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.invalidate(resources::USERS).await, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let key = QueryKey::new(resources::SELF, "");
        let failed: Result<i64, ApiError> =
            cache.fetch(&key, || async { Err(ApiError::RateLimited) }).await;
        assert!(failed.is_err());

        let ok: i64 = cache.fetch(&key, || async { Ok(7) }).await.unwrap();
        assert_eq!(ok, 7);
        assert_eq!(key.to_string(), "self");
    }

    #[tokio::test]
    async fn test_stale_entries_reload() {
        let cache = QueryCache::with_max_age(Duration::zero());
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(resources::PRODUCTS, "page=1");
        load_count(&cache, &key, &calls).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        load_count(&cache, &key, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new(resources::TENANTS, "currentPage=1");
        assert_eq!(key.to_string(), "get-tenants?currentPage=1");

        load_count(&cache, &key, &calls).await;
        cache.clear().await;
        assert_eq!(cache.invalidate(resources::TENANTS).await, 0);
        load_count(&cache, &key, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
