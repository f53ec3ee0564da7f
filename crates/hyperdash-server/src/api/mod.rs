pub mod dto;
pub mod handlers;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Account
        .route("/api/v1/account/{address}", get(handlers::get_account))
        // Markets and risk
        .route("/api/v1/markets/perp", get(handlers::get_perp_markets))
        .route("/api/v1/markets/spot", get(handlers::get_spot_markets))
        .route("/api/v1/liquidatable", get(handlers::get_liquidatable))
        .route("/api/v1/vaults", get(handlers::get_vaults))
        .route("/api/v1/overview", get(handlers::get_overview))
        // EVM explorer
        .route("/api/v1/evm/head", get(handlers::get_evm_head))
        .route("/api/v1/evm/search", get(handlers::search_evm))
        // Saved addresses
        .route(
            "/api/v1/saved",
            get(handlers::list_saved)
                .post(handlers::add_saved)
                .delete(handlers::clear_saved),
        )
        .route("/api/v1/saved/{address}", delete(handlers::remove_saved))
}
