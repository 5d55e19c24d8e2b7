//! Process configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_CACHE_MAX_CAPACITY, DEFAULT_MARKET_CHART_TTL_SECS,
    DEFAULT_PRICE_TTL_SECS, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::services::coingecko::CacheTtl;

const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";
const ENV_API_URL: &str = "COINGECKO_API_URL";
const ENV_API_KEY: &str = "COINGECKO_API_KEY";
const ENV_PRICE_TTL: &str = "PRICE_CACHE_TTL_SECS";
const ENV_MARKET_CHART_TTL: &str = "MARKET_CHART_CACHE_TTL_SECS";
const ENV_CACHE_MAX_CAPACITY: &str = "CACHE_MAX_CAPACITY";
const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT_SECS";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub api_key: Option<String>,
    pub price_ttl_secs: u64,
    pub market_chart_ttl_secs: u64,
    pub cache_max_capacity: u64,
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            host: lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, ENV_PORT, DEFAULT_PORT),
            api_url: lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key,
            price_ttl_secs: parse_or(&lookup, ENV_PRICE_TTL, DEFAULT_PRICE_TTL_SECS),
            market_chart_ttl_secs: parse_or(&lookup, ENV_MARKET_CHART_TTL, DEFAULT_MARKET_CHART_TTL_SECS),
            cache_max_capacity: parse_or(&lookup, ENV_CACHE_MAX_CAPACITY, DEFAULT_CACHE_MAX_CAPACITY),
            upstream_timeout_secs: parse_or(&lookup, ENV_UPSTREAM_TIMEOUT, DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        CacheTtl {
            price: Duration::from_secs(self.price_ttl_secs),
            market_chart: Duration::from_secs(self.market_chart_ttl_secs),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value '{}', using default {}", name, raw, default);
            default
        }),
    }
}
