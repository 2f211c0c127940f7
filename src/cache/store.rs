//! Cache storage backends and the fail-open adapter in front of them.
//!
//! Backends implement [`CacheStore`]: string keys, opaque string payloads,
//! per-key TTL, and prefix deletion. [`FeedCache`] wraps a backend and is
//! what the services talk to; it absorbs every backend failure so the cache
//! can only ever be an optimization, never a correctness dependency.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use metrics::counter;
use redis::aio::ConnectionManager;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(String),
    #[error("cache payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Key/value store with per-key TTL and prefix deletion.
///
/// Implementations may fail; the adapter above them decides what a failure
/// means. Payloads are opaque and must round-trip unchanged.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove every key starting with `prefix`. Returns how many were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

// ============================================================================
// Redis backend
// ============================================================================

/// Redis-backed store for deployments.
///
/// Pattern deletion uses SCAN with a batched pipeline of DELs; KEYS would
/// block the server on large keyspaces.
pub struct RedisCacheStore {
    conn: Arc<Mutex<ConnectionManager>>,
}

impl RedisCacheStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Escape glob metacharacters so a literal prefix cannot widen the
    /// MATCH pattern beyond its own namespace.
    fn match_pattern(prefix: &str) -> String {
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for ch in prefix.chars() {
            match ch {
                '*' | '?' | '[' | ']' | '\\' => {
                    pattern.push('\\');
                    pattern.push(ch);
                }
                other => pattern.push(other),
            }
        }
        pattern.push('*');
        pattern
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.lock().await;
        let payload: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(CacheError::from)?;
        Ok(payload)
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .arg(payload)
            .query_async::<_, ()>(&mut *conn)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let pattern = Self::match_pattern(prefix);
        let mut conn = self.conn.lock().await;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await
                .map_err(CacheError::from)?;

            if !keys.is_empty() {
                let mut pipe = redis::Pipeline::new();
                for key in &keys {
                    pipe.del(key);
                }
                pipe.query_async::<_, ()>(&mut *conn)
                    .await
                    .map_err(CacheError::from)?;
                deleted += keys.len() as u64;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(deleted)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

struct MemoryEntry {
    payload: String,
    expires_at: Instant,
}

/// In-process store used by tests and cacheless development setups.
///
/// TTL is still enforced: an expired entry is indistinguishable from an
/// absent one, which keeps the bounded-staleness contract identical across
/// backends.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.payload.clone()));
            }
        }
        // Drop the lookup guard before removing an expired entry.
        self.entries
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        Ok(None)
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                payload: payload.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - self.entries.len()) as u64)
    }
}

// ============================================================================
// Fail-open adapter
// ============================================================================

const SOURCE: &str = "cache::store";

/// The cache as the rest of the application sees it.
///
/// Every operation is infallible from the caller's perspective: a failed
/// get is a miss, a failed set or purge is a logged no-op. Payloads are
/// JSON-encoded so whatever was stored is returned unchanged on a hit.
pub struct FeedCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    enabled: bool,
}

impl FeedCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration, enabled: bool) -> Self {
        Self {
            store,
            ttl,
            enabled,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        match self.store.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    debug!(source = SOURCE, key, "cache hit");
                    counter!("mostinger_feed_cache_hit_total").increment(1);
                    Some(value)
                }
                Err(err) => {
                    // A payload that no longer decodes is treated as absent;
                    // the next populate overwrites it.
                    warn!(source = SOURCE, key, error = %err, "cache payload undecodable, treating as miss");
                    counter!("mostinger_feed_cache_miss_total").increment(1);
                    None
                }
            },
            Ok(None) => {
                debug!(source = SOURCE, key, "cache miss");
                counter!("mostinger_feed_cache_miss_total").increment(1);
                None
            }
            Err(err) => {
                warn!(source = SOURCE, key, error = %err, "cache get failed, treating as miss");
                counter!("mostinger_feed_cache_miss_total").increment(1);
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        self.put_with_ttl(key, value, self.ttl).await;
    }

    pub async fn put_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(source = SOURCE, key, error = %err, "cache payload encoding failed, skipping populate");
                return;
            }
        };

        if let Err(err) = self.store.set(key, &payload, ttl).await {
            // Degrades to "always miss" for this key; correctness is owned
            // by the relational store.
            warn!(source = SOURCE, key, error = %err, "cache set failed");
        }
    }

    pub async fn purge_prefix(&self, prefix: &str) {
        if !self.enabled {
            return;
        }

        match self.store.delete_by_prefix(prefix).await {
            Ok(removed) => {
                debug!(source = SOURCE, prefix, removed, "cache namespace purged");
                counter!("mostinger_feed_cache_purge_total").increment(1);
            }
            Err(err) => {
                // The mutation already committed; TTL bounds the staleness
                // this purge would have cleared.
                warn!(source = SOURCE, prefix, error = %err, "cache purge failed");
            }
        }
    }
}
