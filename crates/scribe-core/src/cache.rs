//! Cache abstraction
//!
//! Read-through caching for hot public reads. The trait hides the
//! backing store; `MemoryCache` is the in-process implementation used
//! by the server and by tests. Values are stored as JSON strings so a
//! networked backend can implement the same trait without a schema.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::CoreResult;

/// String-keyed cache of JSON payloads with per-entry TTL.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a raw entry; expired entries are treated as absent.
    async fn get_raw(&self, key: &str) -> Option<String>;

    /// Store a raw entry with a time-to-live.
    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> CoreResult<()>;

    /// Drop an entry if present.
    async fn invalidate(&self, key: &str);
}

/// Typed wrapper over a cache, serializing values as JSON.
#[derive(Clone)]
pub struct JsonCache<T> {
    inner: std::sync::Arc<dyn Cache>,
    prefix: &'static str,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonCache<T> {
    pub fn new(inner: std::sync::Arc<dyn Cache>, prefix: &'static str) -> Self {
        Self {
            inner,
            prefix,
            _marker: std::marker::PhantomData,
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let raw = self.inner.get_raw(&self.full_key(key)).await?;
        serde_json::from_str(&raw).ok()
    }

    pub async fn set(&self, key: &str, value: &T, ttl: Duration) -> CoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.set_raw(&self.full_key(key), raw, ttl).await
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(&self.full_key(key)).await;
    }
}

/// In-process cache backed by a concurrent map.
///
/// Expired entries are evicted lazily on read.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_raw(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) -> CoreResult<()> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}
