use std::sync::Arc;

use coinprice_cache::config::Config;
use coinprice_cache::services::cache::{KeyValueStore, MokaStore};
use coinprice_cache::services::coingecko::CoinGeckoService;
use coinprice_cache::services::upstream::{ReqwestTransport, UpstreamClient};
use coinprice_cache::{routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coinprice_cache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // Open cache store
    tracing::info!(
        capacity = config.cache_max_capacity,
        price_ttl_secs = config.price_ttl_secs,
        market_chart_ttl_secs = config.market_chart_ttl_secs,
        "Opening cache store"
    );
    let store: Arc<dyn KeyValueStore> = Arc::new(MokaStore::new(config.cache_max_capacity));

    let transport = ReqwestTransport::new(config.upstream_timeout(), config.api_key.clone())
        .expect("Failed to build HTTP client");
    let coingecko = CoinGeckoService::new(
        store.clone(),
        UpstreamClient::new(Arc::new(transport)),
        config.api_url.clone(),
        config.cache_ttl(),
    );

    let state = AppState {
        coingecko,
        store: store.clone(),
    };

    let app = routes::router(state);

    // Start server
    let addr = config.socket_addr().expect("Invalid HOST/PORT");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    if let Err(e) = store.close().await {
        tracing::error!(error = %e, "Failed to close cache store");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
