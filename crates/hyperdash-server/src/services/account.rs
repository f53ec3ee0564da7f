use hyperdash_core::{
    locate_spot_balances, normalize_margin_summary, normalize_open_orders, normalize_positions,
    normalize_spot_balances, Address, BalancesShape, Portfolio,
};

use crate::error::AppResult;
use crate::gateway::{GatewayClient, InfoRequest};

/// Perp state, spot balances and open orders for one address.
pub async fn load_portfolio(gateway: &GatewayClient, address: &Address) -> AppResult<Portfolio> {
    let perp_request = InfoRequest::clearinghouse_state(address);
    let spot_request = InfoRequest::spot_clearinghouse_state(address);
    let orders_request = InfoRequest::frontend_open_orders(address);

    let (perp, spot, orders) = tokio::try_join!(
        gateway.info(&perp_request),
        gateway.info(&spot_request),
        gateway.info(&orders_request),
    )?;

    let (shape, _) = locate_spot_balances(&spot);
    if shape == BalancesShape::Unrecognized && !spot.is_null() {
        tracing::debug!(address = %address, "Spot state has no recognizable balances array");
    }

    let portfolio = Portfolio {
        address: address.clone(),
        margin_summary: normalize_margin_summary(&perp),
        positions: normalize_positions(&perp),
        orders: normalize_open_orders(&orders),
        balances: normalize_spot_balances(&spot),
    };

    tracing::info!(
        address = %address,
        positions = portfolio.positions.len(),
        orders = portfolio.orders.len(),
        balances = portfolio.balances.len(),
        balances_shape = ?shape,
        "Portfolio loaded"
    );

    Ok(portfolio)
}
