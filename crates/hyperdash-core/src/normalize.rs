//! Response normalizers for `/info` payloads
//!
//! Each function here is total: any JSON value, including `null` and values
//! of the wrong type, produces a well-formed record or an empty collection.

use serde::Serialize;
use serde_json::Value;

use crate::models::*;
use crate::value::{non_empty_str, number, number_or_zero, path, scalar_string, unsigned};

// =============================================================================
// Spot balances
// =============================================================================

/// Where a balances array was found in a `spotClearinghouseState` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancesShape {
    /// `{ balances: [...] }`
    TopLevel,
    /// `{ wallet: { balances: [...] } }`
    Wallet,
    /// `{ spotBalances: [...] }`
    SpotBalances,
    /// `{ data: { balances: [...] } }`
    Data,
    /// None of the known locations held an array.
    Unrecognized,
}

/// Known balance locations, in priority order.
pub const BALANCE_LOCATIONS: [(BalancesShape, &[&str]); 4] = [
    (BalancesShape::TopLevel, &["balances"]),
    (BalancesShape::Wallet, &["wallet", "balances"]),
    (BalancesShape::SpotBalances, &["spotBalances"]),
    (BalancesShape::Data, &["data", "balances"]),
];

/// Find the first known location holding an array.
pub fn locate_spot_balances(raw: &Value) -> (BalancesShape, &[Value]) {
    BALANCE_LOCATIONS
        .iter()
        .find_map(|(shape, keys)| {
            path(raw, keys)
                .and_then(Value::as_array)
                .map(|items| (*shape, items.as_slice()))
        })
        .unwrap_or((BalancesShape::Unrecognized, &[][..]))
}

pub fn normalize_spot_balances(raw: &Value) -> Vec<SpotBalance> {
    let (_, items) = locate_spot_balances(raw);
    items.iter().map(spot_balance).collect()
}

fn spot_balance(item: &Value) -> SpotBalance {
    SpotBalance {
        token: scalar_string(&item["token"]).unwrap_or_default(),
        total: number_or_zero(&item["total"]),
        hold: number_or_zero(&item["hold"]),
    }
}

// =============================================================================
// Perpetual account state
// =============================================================================

pub fn normalize_margin_summary(raw: &Value) -> MarginSummary {
    let summary = &raw["marginSummary"];
    MarginSummary {
        account_value: number_or_zero(&summary["accountValue"]),
        total_ntl_pos: number_or_zero(&summary["totalNtlPos"]),
        total_raw_usd: number_or_zero(&summary["totalRawUsd"]),
        total_margin_used: number_or_zero(&summary["totalMarginUsed"]),
    }
}

/// Positions from `clearinghouseState.assetPositions[].position`.
///
/// Entries without a `position` object are skipped.
pub fn normalize_positions(raw: &Value) -> Vec<Position> {
    let Some(items) = raw["assetPositions"].as_array() else {
        return vec![];
    };

    items
        .iter()
        .filter_map(|item| item.get("position").filter(|p| p.is_object()))
        .map(|p| Position {
            coin: scalar_string(&p["coin"]).unwrap_or_default(),
            size: number_or_zero(&p["szi"]),
            entry_price: number(&p["entryPx"]),
            position_value: number(&p["positionValue"]),
            unrealized_pnl: number(&p["unrealizedPnl"]),
            leverage: Leverage {
                value: number(&p["leverage"]["value"]),
                kind: scalar_string(&p["leverage"]["type"]).unwrap_or_default(),
            },
        })
        .collect()
}

/// Resting orders from a `frontendOpenOrders` response (a bare array).
pub fn normalize_open_orders(raw: &Value) -> Vec<OpenOrder> {
    let Some(items) = raw.as_array() else {
        return vec![];
    };

    items
        .iter()
        .map(|o| OpenOrder {
            coin: scalar_string(&o["coin"]).unwrap_or_default(),
            side: OrderSide::from_code(o["side"].as_str().unwrap_or_default()),
            limit_price: number_or_zero(&o["limitPx"]),
            size: number_or_zero(&o["sz"]),
            original_size: number_or_zero(&o["origSz"]),
            order_id: unsigned(&o["oid"]),
        })
        .collect()
}

// =============================================================================
// Market listings
// =============================================================================

fn universe(raw: &Value) -> &[Value] {
    raw["universe"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

pub fn normalize_perp_assets(raw: &Value) -> Vec<PerpAsset> {
    universe(raw)
        .iter()
        .map(|a| PerpAsset {
            name: scalar_string(&a["name"]).unwrap_or_default(),
            max_leverage: unsigned(&a["maxLeverage"]),
            sz_decimals: unsigned(&a["szDecimals"]),
            only_isolated: a["onlyIsolated"].as_bool().unwrap_or(false),
        })
        .collect()
}

pub fn normalize_spot_pairs(raw: &Value) -> Vec<SpotPair> {
    universe(raw)
        .iter()
        .enumerate()
        .map(|(index, asset)| SpotPair {
            index,
            name: pair_name(asset, index),
            tokens: token_list(asset),
            size_decimals: size_decimals(asset),
        })
        .collect()
}

/// Display name for a spot pair.
///
/// Tries `symbol`, `name`, the first two `tokens`, then
/// `token0Symbol`/`token1Symbol`, and finally synthesizes `@<index>`.
pub fn pair_name(asset: &Value, index: usize) -> String {
    if let Some(symbol) = non_empty_str(&asset["symbol"]) {
        return symbol.to_string();
    }
    if let Some(name) = non_empty_str(&asset["name"]) {
        return name.to_string();
    }
    if let Some(tokens) = asset["tokens"].as_array().filter(|t| t.len() >= 2) {
        return format!("{}/{}", display_scalar(&tokens[0]), display_scalar(&tokens[1]));
    }
    if let (Some(t0), Some(t1)) = (
        non_empty_str(&asset["token0Symbol"]),
        non_empty_str(&asset["token1Symbol"]),
    ) {
        return format!("{}/{}", t0, t1);
    }
    format!("@{}", index)
}

/// Token list column of the spot table.
fn token_list(asset: &Value) -> String {
    if let Some(tokens) = asset["tokens"].as_array() {
        return tokens.iter().map(display_scalar).collect::<Vec<_>>().join(" / ");
    }
    match (
        non_empty_str(&asset["token0Symbol"]),
        non_empty_str(&asset["token1Symbol"]),
    ) {
        (Some(t0), Some(t1)) => format!("{} / {}", t0, t1),
        _ => "N/A".to_string(),
    }
}

fn display_scalar(value: &Value) -> String {
    scalar_string(value).unwrap_or_default()
}

/// Size precision of a spot pair.
///
/// Tries `szDecimals`, `sizeDecimals`, `qtyDecimals` and `decimals.size`.
/// A present but non-numeric field is skipped like a missing one.
pub fn size_decimals(asset: &Value) -> SizeDecimals {
    const LOCATIONS: [&[&str]; 4] = [
        &["szDecimals"],
        &["sizeDecimals"],
        &["qtyDecimals"],
        &["decimals", "size"],
    ];

    LOCATIONS
        .iter()
        .find_map(|keys| path(asset, keys).and_then(unsigned))
        .map(SizeDecimals::Known)
        .unwrap_or(SizeDecimals::NotAvailable)
}

// =============================================================================
// Risk and vaults
// =============================================================================

pub fn normalize_liquidatable(raw: &Value) -> Vec<LiquidatableAccount> {
    let Some(items) = raw.as_array() else {
        return vec![];
    };

    items
        .iter()
        .map(|r| LiquidatableAccount {
            address: scalar_string(&r["address"]),
            risk: number_or_zero(&r["risk"]),
            leverage: number_or_zero(&r["lev"]),
        })
        .collect()
}

pub fn normalize_vaults(raw: &Value) -> Vec<VaultSummary> {
    let Some(items) = raw.as_array() else {
        return vec![];
    };

    items
        .iter()
        .enumerate()
        .map(|(i, v)| VaultSummary {
            name: scalar_string(&v["name"]).unwrap_or_else(|| format!("Vault #{}", i)),
            vault_address: scalar_string(&v["vaultAddress"]),
            tvl: number_or_zero(&v["tvl"]),
            pnl_7d: number_or_zero(&v["pnl7d"]),
            sharpe: number_or_zero(&v["sharpe"]),
        })
        .collect()
}

/// Listing counts from the four overview responses.
pub fn market_overview(
    meta: &Value,
    spot_meta: &Value,
    liquidatable: &Value,
    vaults: &Value,
) -> MarketOverview {
    let len = |v: &Value| v.as_array().map_or(0, Vec::len);
    MarketOverview {
        perp_assets: universe(meta).len(),
        spot_assets: universe(spot_meta).len(),
        liquidatable: len(liquidatable),
        vaults: len(vaults),
    }
}
