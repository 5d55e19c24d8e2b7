#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use coinprice_cache::services::cache::{KeyValueStore, MokaStore, StoreError};
use coinprice_cache::services::coingecko::{CacheTtl, CoinGeckoService};
use coinprice_cache::services::upstream::{
    HttpResponse, HttpTransport, QueryParams, TransportError, UpstreamClient,
};
use coinprice_cache::AppState;

pub const BASE_URL: &str = "https://api.example.com";

pub const TTL: CacheTtl = CacheTtl {
    price: Duration::from_secs(60),
    market_chart: Duration::from_secs(3600),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// Transport that replays queued replies in order and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) {
        self.replies
            .lock()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
    }

    pub fn reply_raw(&self, status: u16, body: &str) {
        self.replies.lock().push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, error: TransportError) {
        self.replies.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted reply".to_string())))
    }
}

/// Store wrapper whose reads or writes can be switched to fail.
pub struct FlakyStore {
    inner: MokaStore,
    pub fail_get: Mutex<Option<StoreError>>,
    pub fail_set: Mutex<Option<StoreError>>,
    writes: Mutex<Vec<(String, Duration, String)>>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MokaStore::new(100),
            fail_get: Mutex::new(None),
            fail_set: Mutex::new(None),
            writes: Mutex::new(Vec::new()),
        })
    }

    pub fn writes(&self) -> Vec<(String, Duration, String)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(err) = self.fail_get.lock().clone() {
            return Err(err);
        }
        self.inner.get(key).await
    }

    async fn set_with_expiry(&self, key: &str, ttl: Duration, value: String) -> Result<(), StoreError> {
        if let Some(err) = self.fail_set.lock().clone() {
            return Err(err);
        }
        self.writes.lock().push((key.to_string(), ttl, value.clone()));
        self.inner.set_with_expiry(key, ttl, value).await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.inner.close().await
    }
}

pub struct Harness {
    pub service: CoinGeckoService,
    pub store: Arc<FlakyStore>,
    pub transport: Arc<ScriptedTransport>,
}

impl Harness {
    pub fn new() -> Self {
        let store = FlakyStore::new();
        let transport = ScriptedTransport::new();
        let service = CoinGeckoService::new(
            store.clone(),
            UpstreamClient::new(transport.clone()),
            BASE_URL.to_string(),
            TTL,
        );

        Self {
            service,
            store,
            transport,
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            coingecko: self.service.clone(),
            store: self.store.clone(),
        }
    }

    /// Seed the cache directly, bypassing the write log.
    pub async fn seed(&self, key: &str, value: serde_json::Value) {
        self.store
            .inner
            .set_with_expiry(key, Duration::from_secs(60), value.to_string())
            .await
            .unwrap();
    }
}
