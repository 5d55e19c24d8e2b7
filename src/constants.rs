//! Shared constants: user-facing messages, cache keys and defaults.

/// Messages rendered to API callers. Kept stable so clients can match on them.
pub mod messages {
    pub const VALIDATION_INVALID_NUMBER: &str = "Value must be a valid integer";
    pub const VALIDATION_OUT_OF_RANGE: &str = "Value is out of the allowed range";
    pub const VALIDATION_SYMBOL_REQUIRED: &str = "Symbol is required";

    pub const NOT_FOUND_CRYPTO: &str = "Cryptocurrency not found";
    pub const NOT_FOUND_HISTORY: &str = "Price history not found";
    pub const NOT_FOUND_CACHE: &str = "Cache entry not found";

    pub const API_BAD_REQUEST: &str = "Invalid request to price API";
    pub const API_RATE_LIMITED: &str = "Price API rate limit exceeded";
    pub const API_NOT_FOUND: &str = "Resource not found on price API";
    pub const API_SERVER_ERROR: &str = "Price API server error";
    pub const API_NETWORK_ERROR: &str = "Unable to reach price API";

    pub const SERVER_INTERNAL: &str = "Internal server error";
}

/// Cache key prefixes
pub const PRICE_KEY_PREFIX: &str = "crypto:price";
pub const HISTORY_KEY_PREFIX: &str = "crypto:history";

/// Price entries expire after 1 minute
pub const DEFAULT_PRICE_TTL_SECS: u64 = 60;

/// Market chart entries expire after 1 hour
pub const DEFAULT_MARKET_CHART_TTL_SECS: u64 = 3600;

pub const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for every upstream request
pub const VS_CURRENCY: &str = "usd";

pub const MIN_HISTORY_DAYS: i64 = 1;
pub const MAX_HISTORY_DAYS: i64 = 365;
