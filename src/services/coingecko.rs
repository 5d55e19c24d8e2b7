use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{messages, VS_CURRENCY};
use crate::error::AppError;
use crate::models::price::{HistoryChart, HistoryPoint, MarketChartResponse, Price, PriceResponse};
use crate::services::cache::{
    get_cached, history_cache_key, price_cache_key, set_with_expiry, CacheLookup, KeyValueStore,
};
use crate::services::upstream::{ApiError, UpstreamClient};

/// Expiry applied to each entity kind when written back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub price: Duration,
    pub market_chart: Duration,
}

/// Read-through price service: cache first, CoinGecko on miss.
#[derive(Clone)]
pub struct CoinGeckoService {
    store: Arc<dyn KeyValueStore>,
    upstream: UpstreamClient,
    base_url: String,
    ttl: CacheTtl,
}

impl CoinGeckoService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        upstream: UpstreamClient,
        base_url: String,
        ttl: CacheTtl,
    ) -> Self {
        Self {
            store,
            upstream,
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl,
        }
    }

    pub async fn get_crypto_price(&self, symbol: &str) -> Result<Price, AppError> {
        let normalized = symbol.to_lowercase();
        let cache_key = price_cache_key(&normalized);

        if let CacheLookup::Hit(cached) = get_cached::<Price>(self.store.as_ref(), &cache_key).await? {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }

        tracing::info!("Fetching price for {} from CoinGecko", normalized);

        let url = format!("{}/simple/price", self.base_url);
        let params = [
            ("ids", normalized.clone()),
            ("vs_currencies", VS_CURRENCY.to_string()),
        ];

        let data = self.upstream.fetch(&url, &params).await.map_err(api_failure)?;
        let response: PriceResponse = parse_payload(data)?.unwrap_or_default();

        let price = response
            .get(&normalized)
            .and_then(|quote| quote.as_ref())
            .and_then(|quote| quote.usd)
            .ok_or_else(|| {
                AppError::not_found(messages::NOT_FOUND_CRYPTO, json!({ "symbol": symbol }))
            })?;

        let price = Price {
            symbol: normalized,
            price,
        };

        set_with_expiry(self.store.as_ref(), &cache_key, self.ttl.price, &price).await?;

        Ok(price)
    }

    pub async fn get_crypto_market_chart(
        &self,
        symbol: &str,
        days: i64,
    ) -> Result<HistoryChart, AppError> {
        let normalized = symbol.to_lowercase();
        let cache_key = history_cache_key(&normalized, days);

        if let CacheLookup::Hit(cached) =
            get_cached::<HistoryChart>(self.store.as_ref(), &cache_key).await?
        {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }

        tracing::info!("Fetching {}d market chart for {} from CoinGecko", days, normalized);

        let url = format!(
            "{}/coins/{}/market_chart",
            self.base_url,
            urlencoding::encode(&normalized)
        );
        let params = [
            ("vs_currency", VS_CURRENCY.to_string()),
            ("days", days.to_string()),
        ];

        let data = self.upstream.fetch(&url, &params).await.map_err(api_failure)?;
        let response: MarketChartResponse = parse_payload(data)?.unwrap_or_default();

        let prices = match response.prices {
            Some(prices) if !prices.is_empty() => prices,
            _ => {
                return Err(AppError::not_found(
                    messages::NOT_FOUND_HISTORY,
                    json!({ "symbol": symbol, "days": days }),
                ));
            }
        };

        let chart = HistoryChart {
            data: prices.into_iter().map(HistoryPoint::from).collect(),
        };

        if let Some(last) = chart.data.last() {
            let last_date = DateTime::from_timestamp_millis(last.time)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "Invalid date".to_string());
            tracing::debug!(
                "Fetched {} prices for {}, last: {} @ {}",
                chart.data.len(),
                normalized,
                last.price,
                last_date
            );
        }

        set_with_expiry(self.store.as_ref(), &cache_key, self.ttl.market_chart, &chart).await?;

        Ok(chart)
    }
}

/// Pass the classified upstream failure through, details nested under `apiError`.
fn api_failure(err: ApiError) -> AppError {
    AppError::new(err.message, err.code, Some(json!({ "apiError": err.details })))
}

/// Typed view of an upstream body. A `null` body is `None` so the caller
/// reports it as not found; shape mismatches are internal errors.
fn parse_payload<T: DeserializeOwned>(data: Value) -> Result<Option<T>, AppError> {
    if data.is_null() {
        return Ok(None);
    }
    serde_json::from_value(data).map(Some).map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn api_failure_nests_details() {
        let err = api_failure(ApiError::from_status(429));
        assert_eq!(err.status_code, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.message, messages::API_RATE_LIMITED);
        assert_eq!(err.details, Some(json!({ "apiError": { "status": 429 } })));

        let err = api_failure(ApiError::network());
        assert_eq!(err.status_code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.details, Some(json!({ "apiError": null })));
    }

    #[test]
    fn parse_payload_fails_closed() {
        let err = parse_payload::<PriceResponse>(json!("<html>")).unwrap_err();
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details.unwrap()["originalError"].is_string());

        let err = parse_payload::<MarketChartResponse>(json!({ "prices": [[1, "x"]] })).unwrap_err();
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn null_payload_is_absent() {
        assert!(parse_payload::<PriceResponse>(Value::Null).unwrap().is_none());
        assert!(parse_payload::<MarketChartResponse>(Value::Null).unwrap().is_none());
    }
}
