mod api;
mod config;
mod error;
mod gateway;
mod pages;
mod services;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use hyperdash_core::saved::SavedAddresses;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::gateway::GatewayClient;

#[derive(Clone)]
pub struct AppState {
    pub gateway: GatewayClient,
    pub saved: SavedAddresses,
    pub config: Arc<AppConfig>,
}

/// HTML pages and the JSON API behind shared CORS and trace layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::create_router())
        .merge(api::create_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hyperdash=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    println!("================================================");
    println!("           HYPERDASH - Starting Up              ");
    println!("================================================");

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    println!("[CONFIG] Server: {}:{}", config.server.host, config.server.port);
    match config.gateway.base_url() {
        Some(url) => println!("[CONFIG] Gateway: {}", url),
        None => println!("[CONFIG] Gateway: *** EMPTY - PLEASE SET HYPERDASH__GATEWAY__BASE_URL OR QUICKNODE_URL ***"),
    }
    if config.gateway.timeout_seconds > 0 {
        println!("[CONFIG] Gateway timeout: {}s", config.gateway.timeout_seconds);
    } else {
        println!("[CONFIG] Gateway timeout: none");
    }
    println!("[CONFIG] Saved addresses: {} ({})", config.storage.backend.as_str(), config.storage.path);

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting Hyperdash"
    );

    let gateway = GatewayClient::new(&config.gateway)?;
    let saved = store::saved_addresses(&config.storage);

    let state = AppState {
        gateway,
        saved,
        config: Arc::new(config.clone()),
    };

    println!("[ROUTER] Setting up routes...");
    let app = build_router(state);
    println!("[ROUTER] Pages: /, /account, /explorer/{{assets,spot,evm}}, /liquidations, /vaults");
    println!("[ROUTER] API: /health, /api/v1/{{account,markets,liquidatable,vaults,overview,evm,saved}}");

    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("================================================");
    println!("  Server listening on http://{}", addr);
    println!("================================================");
    println!();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
