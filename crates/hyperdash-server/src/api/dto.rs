use hyperdash_core::format::format_timestamp_millis;
use hyperdash_core::{
    EvmBlockSummary, LiquidatableAccount, MarginSummary, OpenOrder, PerpAsset, Portfolio, Position,
    Side, SpotBalance, SpotPair, VaultSummary,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// GET /health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub gateway: String,
    pub storage: String,
}

// ============================================================================
// GET /api/v1/account/{address}
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub address: String,
    pub margin_summary: MarginSummary,
    pub positions: Vec<PositionDto>,
    pub orders: Vec<OrderDto>,
    pub balances: Vec<SpotBalance>,
}

#[derive(Debug, Serialize)]
pub struct PositionDto {
    #[serde(flatten)]
    pub position: Position,
    pub side: Side,
}

#[derive(Debug, Serialize)]
pub struct OrderDto {
    #[serde(flatten)]
    pub order: OpenOrder,
    pub filled_amount: f64,
}

impl From<Portfolio> for AccountResponse {
    fn from(portfolio: Portfolio) -> Self {
        Self {
            address: portfolio.address.to_string(),
            margin_summary: portfolio.margin_summary,
            positions: portfolio
                .positions
                .into_iter()
                .map(|position| PositionDto {
                    side: position.side(),
                    position,
                })
                .collect(),
            orders: portfolio
                .orders
                .into_iter()
                .map(|order| OrderDto {
                    filled_amount: order.filled_amount(),
                    order,
                })
                .collect(),
            balances: portfolio.balances,
        }
    }
}

// ============================================================================
// Market listings
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PerpMarketsResponse {
    pub count: usize,
    pub assets: Vec<PerpAsset>,
}

#[derive(Debug, Serialize)]
pub struct SpotMarketsResponse {
    pub count: usize,
    pub pairs: Vec<SpotPair>,
}

#[derive(Debug, Serialize)]
pub struct LiquidatableResponse {
    pub count: usize,
    pub accounts: Vec<LiquidatableAccount>,
}

#[derive(Debug, Serialize)]
pub struct VaultsResponse {
    pub count: usize,
    pub vaults: Vec<VaultSummary>,
}

// ============================================================================
// EVM
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EvmHeadResponse {
    pub block: Option<EvmBlockSummary>,
    pub time: String,
}

impl From<Option<EvmBlockSummary>> for EvmHeadResponse {
    fn from(block: Option<EvmBlockSummary>) -> Self {
        let time = format_timestamp_millis(block.as_ref().and_then(|b| b.timestamp_millis()));
        Self { block, time }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EvmSearchQuery {
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Saved addresses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SavedAddressRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct SavedAddressesResponse {
    pub addresses: Vec<String>,
}
