use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::constants::messages;
use crate::error::AppError;
use crate::models::price::{HealthResponse, HistoryChart, Price};
use crate::utils::validate_days;
use crate::AppState;

/// Handler for GET /price/{symbol}
pub async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Price>, AppError> {
    let symbol = require_symbol(&symbol)?;

    let price = state.coingecko.get_crypto_price(&symbol).await?;

    Ok(Json(price))
}

/// Handler for GET /history/{symbol}/{days}
pub async fn get_history(
    State(state): State<AppState>,
    Path((symbol, days)): Path<(String, String)>,
) -> Result<Json<HistoryChart>, AppError> {
    let days = validate_days(&days, "days")?;
    let symbol = require_symbol(&symbol)?;

    let history = state.coingecko.get_crypto_market_chart(&symbol, days).await?;

    tracing::info!("Serving {} history points for {} ({}d)", history.data.len(), symbol, days);

    Ok(Json(history))
}

/// Handler for GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.store.is_connected();

    Json(HealthResponse {
        status: if cache { "ok" } else { "degraded" },
        cache,
    })
}

fn require_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_lowercase();
    if symbol.is_empty() {
        return Err(AppError::bad_request(
            messages::VALIDATION_SYMBOL_REQUIRED,
            json!({ "field": "symbol" }),
        ));
    }
    Ok(symbol)
}
