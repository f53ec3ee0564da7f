use axum::{
    extract::{Path, Query, State},
    Json,
};
use hyperdash_core::{Address, MarketOverview};
use std::time::Instant;

use super::dto::*;
use crate::error::AppResult;
use crate::services::evm::EvmSearchResult;
use crate::services::{account, evm, markets};
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    println!("[REQUEST] GET /health");

    let gateway_status = if state.gateway.is_configured() {
        "configured"
    } else {
        tracing::warn!("Health check with no gateway base URL");
        "not_configured"
    };

    println!("[RESPONSE] GET /health -> 200 OK gateway={}", gateway_status);
    tracing::info!(gateway_status = %gateway_status, "Health check completed");

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        gateway: gateway_status.to_string(),
        storage: state.config.storage.backend.as_str().to_string(),
    })
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<Json<AccountResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/account/{}", address);
    tracing::info!(address = %address, "Processing account request");

    let address = Address::parse(&address)?;
    let portfolio = account::load_portfolio(&state.gateway, &address).await?;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /api/v1/account/{} -> 200 OK ({}ms) positions={} orders={}",
        address,
        duration,
        portfolio.positions.len(),
        portfolio.orders.len()
    );
    tracing::info!(
        address = %address,
        duration_ms = %duration,
        account_value = %portfolio.margin_summary.account_value,
        "Account retrieved"
    );

    Ok(Json(portfolio.into()))
}

pub async fn get_perp_markets(State(state): State<AppState>) -> AppResult<Json<PerpMarketsResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/markets/perp");

    let assets = markets::load_perp_assets(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/markets/perp -> 200 OK ({}ms) count={}", duration, assets.len());
    tracing::info!(duration_ms = %duration, count = %assets.len(), "Perp markets listed");

    Ok(Json(PerpMarketsResponse {
        count: assets.len(),
        assets,
    }))
}

pub async fn get_spot_markets(State(state): State<AppState>) -> AppResult<Json<SpotMarketsResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/markets/spot");

    let pairs = markets::load_spot_pairs(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/markets/spot -> 200 OK ({}ms) count={}", duration, pairs.len());
    tracing::info!(duration_ms = %duration, count = %pairs.len(), "Spot markets listed");

    Ok(Json(SpotMarketsResponse {
        count: pairs.len(),
        pairs,
    }))
}

pub async fn get_liquidatable(State(state): State<AppState>) -> AppResult<Json<LiquidatableResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/liquidatable");

    let accounts = markets::load_liquidatable(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/liquidatable -> 200 OK ({}ms) count={}", duration, accounts.len());
    tracing::info!(duration_ms = %duration, count = %accounts.len(), "Liquidatable accounts listed");

    Ok(Json(LiquidatableResponse {
        count: accounts.len(),
        accounts,
    }))
}

pub async fn get_vaults(State(state): State<AppState>) -> AppResult<Json<VaultsResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/vaults");

    let vaults = markets::load_vaults(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/vaults -> 200 OK ({}ms) count={}", duration, vaults.len());
    tracing::info!(duration_ms = %duration, count = %vaults.len(), "Vaults listed");

    Ok(Json(VaultsResponse {
        count: vaults.len(),
        vaults,
    }))
}

pub async fn get_overview(State(state): State<AppState>) -> AppResult<Json<MarketOverview>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/overview");

    let overview = markets::load_overview(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/overview -> 200 OK ({}ms)", duration);
    tracing::info!(
        duration_ms = %duration,
        perp_assets = %overview.perp_assets,
        spot_assets = %overview.spot_assets,
        "Overview computed"
    );

    Ok(Json(overview))
}

pub async fn get_evm_head(State(state): State<AppState>) -> AppResult<Json<EvmHeadResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/evm/head");

    let head = evm::fetch_head(&state.gateway).await?;

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] GET /api/v1/evm/head -> 200 OK ({}ms) found={}", duration, head.is_some());

    Ok(Json(head.into()))
}

pub async fn search_evm(
    State(state): State<AppState>,
    Query(query): Query<EvmSearchQuery>,
) -> AppResult<Json<EvmSearchResult>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/evm/search?q={}", query.q);
    tracing::info!(query = %query.q, "Processing EVM search request");

    let result = evm::search(&state.gateway, &query.q).await?;

    let duration = start.elapsed().as_millis();
    let found = !matches!(result, EvmSearchResult::NotFound);
    println!("[RESPONSE] GET /api/v1/evm/search -> 200 OK ({}ms) found={}", duration, found);
    tracing::info!(duration_ms = %duration, found = %found, "EVM search completed");

    Ok(Json(result))
}

// ============================================================================
// Saved addresses
// ============================================================================

pub async fn list_saved(State(state): State<AppState>) -> Json<SavedAddressesResponse> {
    println!("[REQUEST] GET /api/v1/saved");
    Json(SavedAddressesResponse {
        addresses: state.saved.list(),
    })
}

pub async fn add_saved(
    State(state): State<AppState>,
    Json(request): Json<SavedAddressRequest>,
) -> AppResult<Json<SavedAddressesResponse>> {
    println!("[REQUEST] POST /api/v1/saved address={}", request.address);

    let address = Address::parse(&request.address)?;
    state.saved.add(address.as_str())?;
    tracing::info!(address = %address, "Address saved");

    Ok(Json(SavedAddressesResponse {
        addresses: state.saved.list(),
    }))
}

pub async fn remove_saved(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<Json<SavedAddressesResponse>> {
    println!("[REQUEST] DELETE /api/v1/saved/{}", address);

    state.saved.remove(&address)?;
    tracing::info!(address = %address, "Saved address removed");

    Ok(Json(SavedAddressesResponse {
        addresses: state.saved.list(),
    }))
}

pub async fn clear_saved(State(state): State<AppState>) -> AppResult<Json<SavedAddressesResponse>> {
    println!("[REQUEST] DELETE /api/v1/saved");

    state.saved.clear()?;
    tracing::info!("Saved addresses cleared");

    Ok(Json(SavedAddressesResponse { addresses: vec![] }))
}
