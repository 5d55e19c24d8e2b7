// src/lib.rs

use std::sync::Arc;

use services::{cache::KeyValueStore, coingecko::CoinGeckoService};

#[derive(Clone)]
pub struct AppState {
    pub coingecko: CoinGeckoService,
    pub store: Arc<dyn KeyValueStore>,
}

pub mod services {
    pub mod cache;
    pub mod coingecko;
    pub mod upstream;
}

pub mod handlers {
    pub mod price;
}

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod utils;
