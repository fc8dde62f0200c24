//! Response cache for GET requests
//!
//! Entries are keyed by a fingerprint of the request with the password
//! stripped, so rotating the password does not invalidate cached reads and
//! the secret never ends up in a cache key.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::credentials::AUTH_PASSWORD;
use crate::params::Params;
use crate::transport::Method;

/// Cache fingerprint: `prefix` + hex SHA-256 over method, normalized
/// endpoint and the encoded parameters without `auth-password`.
///
/// [`Params`] is key-ordered, so the fingerprint does not depend on the
/// order in which parameters were inserted.
pub fn fingerprint(prefix: &str, method: Method, endpoint: &str, params: &Params) -> String {
    let mut stripped = params.clone();
    stripped.remove(AUTH_PASSWORD);

    let mut hasher = Sha256::new();
    hasher.update(method.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(endpoint.as_bytes());
    hasher.update(b"\n");
    hasher.update(stripped.to_query_string().as_bytes());

    format!("{prefix}{}", hex::encode(hasher.finalize()))
}

/// Storage for parsed responses.
///
/// Implementations must be safe for concurrent use from many in-flight
/// requests.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Live entry for `key`, if any.
    async fn get(&self, key: &str) -> Option<Value>;

    async fn put(&self, key: String, value: Value, ttl: Duration);

    /// Removes every entry whose key starts with `prefix`, or every entry
    /// when `prefix` is `None`.
    async fn invalidate(&self, prefix: Option<&str>);
}

/// Upper bound on entries held by [`InMemoryResponseCache::new`].
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct CachedResponse {
    value: Value,
    ttl: Duration,
}

/// Expires every entry after the TTL it was stored with.
struct StoredTtl;

impl Expiry<String, CachedResponse> for StoredTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CachedResponse,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache backed by `moka`
///
/// Default implementation. Expired entries are evicted by the cache's own
/// housekeeping and the entry count is bounded by `max_capacity`. Clones
/// share the same storage.
#[derive(Clone)]
pub struct InMemoryResponseCache {
    entries: Cache<String, CachedResponse>,
}

impl InMemoryResponseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_capacity(DEFAULT_MAX_ENTRIES)
    }

    #[must_use]
    pub fn with_max_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(StoredTtl)
            .support_invalidation_closures()
            .build();
        Self { entries }
    }

    /// Number of live entries, after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryResponseCache")
            .field("entry_count", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    async fn put(&self, key: String, value: Value, ttl: Duration) {
        self.entries.insert(key, CachedResponse { value, ttl }).await;
    }

    async fn invalidate(&self, prefix: Option<&str>) {
        let Some(prefix) = prefix else {
            self.entries.invalidate_all();
            return;
        };

        let prefix = prefix.to_string();
        if let Err(e) = self
            .entries
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            log::warn!("[cloudns] Cache prefix invalidation failed: {e}");
        }
    }
}
