use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current USD price of a single asset. `symbol` is always lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub symbol: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub time: i64, // epoch millis
    pub price: f64,
}

/// Price history in upstream (chronological) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryChart {
    pub data: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: bool,
}

// Upstream payloads

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub usd: Option<f64>,
}

/// `/simple/price` body: lowercase asset id -> quote. A `null` entry is
/// treated like a missing one.
pub type PriceResponse = HashMap<String, Option<PriceQuote>>;

/// `[time, price]` pair from `/coins/{id}/market_chart`. Time may arrive as a
/// float so both members are read as `f64`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPricePoint(pub f64, pub f64);

impl From<RawPricePoint> for HistoryPoint {
    fn from(raw: RawPricePoint) -> Self {
        Self {
            time: raw.0.round() as i64,
            price: raw.1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Option<Vec<RawPricePoint>>,
}
