//! Key-value cache access.
//!
//! [`KeyValueStore`] is the storage capability the service depends on.
//! [`MokaStore`] implements it in-process with per-entry expiry. The free
//! functions below are the gateway the pricing pipeline calls: they speak
//! typed values and [`AppError`], never raw store errors.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::constants::{messages, HISTORY_KEY_PREFIX, PRICE_KEY_PREFIX};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("cache store is closed")]
    Closed,
    #[error("cache store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: String) -> Result<(), StoreError>;

    fn is_connected(&self) -> bool;

    async fn close(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    body: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &StoredValue, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store. Each entry carries its own TTL.
pub struct MokaStore {
    cache: Cache<String, StoredValue>,
    open: AtomicBool,
}

impl MokaStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            open: AtomicBool::new(true),
        }
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Closed)
        }
    }
}

#[async_trait]
impl KeyValueStore for MokaStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.ensure_open()?;
        Ok(self.cache.get(key).await.map(|entry| entry.body))
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: String) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.cache
            .insert(key.to_string(), StoredValue { body: value, ttl })
            .await;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    async fn close(&self) -> Result<(), StoreError> {
        if self.open.swap(false, Ordering::AcqRel) {
            self.cache.invalidate_all();
            self.cache.run_pending_tasks().await;
            tracing::info!("Cache store closed");
        }
        Ok(())
    }
}

pub fn price_cache_key(symbol: &str) -> String {
    format!("{}:{}", PRICE_KEY_PREFIX, symbol.to_lowercase())
}

pub fn history_cache_key(symbol: &str, days: i64) -> String {
    format!("{}:{}:{}", HISTORY_KEY_PREFIX, symbol.to_lowercase(), days)
}

/// Outcome of a cache read that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

/// Read and decode `key`. Absent or empty entries are a [`CacheLookup::Miss`];
/// store failures and undecodable entries are internal errors.
pub async fn get_cached<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<CacheLookup<T>, AppError> {
    let raw = store.get(key).await.map_err(AppError::internal)?;

    match raw {
        Some(body) if !body.is_empty() => serde_json::from_str(&body)
            .map(CacheLookup::Hit)
            .map_err(AppError::internal),
        _ => Ok(CacheLookup::Miss),
    }
}

/// Like [`get_cached`] but a miss is reported as a 404 carrying the key.
pub async fn get_cached_or_throw<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T, AppError> {
    match get_cached(store, key).await? {
        CacheLookup::Hit(value) => Ok(value),
        CacheLookup::Miss => Err(AppError::not_found(
            messages::NOT_FOUND_CACHE,
            json!({ "cacheKey": key }),
        )),
    }
}

pub async fn set_with_expiry<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    ttl: Duration,
    value: &T,
) -> Result<(), AppError> {
    let body = serde_json::to_string(value).map_err(AppError::internal)?;
    store
        .set_with_expiry(key, ttl, body)
        .await
        .map_err(AppError::internal)
}
