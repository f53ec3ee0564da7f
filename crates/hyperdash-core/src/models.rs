//! Canonical records produced by the normalizers
//!
//! Every record here is built from a single gateway response and discarded
//! on the next fetch. Numeric fields are always finite.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Address
// =============================================================================

/// A 20-byte account address in its `0x`-prefixed hex form.
///
/// The original casing is preserved; validation is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Trim and validate user input.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::MissingAddress);
        }
        if !is_valid_address(trimmed) {
            return Err(CoreError::InvalidAddress(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `0x` followed by exactly 40 hex digits (surrounding whitespace ignored).
pub fn is_valid_address(input: &str) -> bool {
    let s = input.trim();
    s.len() == 42 && s.starts_with("0x") && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Account Portfolio
// =============================================================================

/// Direction of a perpetual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Only a strictly positive size is long; zero falls through to short.
    pub fn from_size(size: f64) -> Self {
        if size > 0.0 {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Side::Long => "text-success",
            Side::Short => "text-danger",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of a resting order. The gateway sends `B` for bids; every other
/// code is treated as an ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn from_code(code: &str) -> Self {
        if code == "B" {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            OrderSide::Buy => "text-success",
            OrderSide::Sell => "text-danger",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cross-margin account totals from `clearinghouseState.marginSummary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginSummary {
    pub account_value: f64,
    pub total_ntl_pos: f64,
    pub total_raw_usd: f64,
    pub total_margin_used: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leverage {
    pub value: Option<f64>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A perpetual position as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coin: String,
    /// Signed size (`szi`): positive for long, negative for short.
    pub size: f64,
    pub entry_price: Option<f64>,
    pub position_value: Option<f64>,
    pub unrealized_pnl: Option<f64>,
    pub leverage: Leverage,
}

impl Position {
    pub fn side(&self) -> Side {
        Side::from_size(self.size)
    }

    pub fn abs_size(&self) -> f64 {
        self.size.abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub coin: String,
    pub side: OrderSide,
    pub limit_price: f64,
    /// Remaining size.
    pub size: f64,
    pub original_size: f64,
    pub order_id: Option<u64>,
}

impl OpenOrder {
    pub fn filled_amount(&self) -> f64 {
        self.original_size - self.size
    }
}

/// A spot token balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotBalance {
    pub token: String,
    pub total: f64,
    pub hold: f64,
}

impl SpotBalance {
    pub fn is_zero(&self) -> bool {
        self.total == 0.0 && self.hold == 0.0
    }
}

/// Everything the account page shows for one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub address: Address,
    pub margin_summary: MarginSummary,
    pub positions: Vec<Position>,
    pub orders: Vec<OpenOrder>,
    pub balances: Vec<SpotBalance>,
}

// =============================================================================
// Markets
// =============================================================================

/// A perpetual market from `meta.universe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpAsset {
    pub name: String,
    pub max_leverage: Option<u64>,
    pub sz_decimals: Option<u64>,
    pub only_isolated: bool,
}

impl PerpAsset {
    pub fn margin_mode(&self) -> &'static str {
        if self.only_isolated {
            "Isolated Only"
        } else {
            "Cross / Isolated"
        }
    }
}

/// Size precision of a spot pair. Unknown precision is kept distinct from
/// zero decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDecimals {
    Known(u64),
    NotAvailable,
}

impl fmt::Display for SizeDecimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeDecimals::Known(d) => write!(f, "{}", d),
            SizeDecimals::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for SizeDecimals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SizeDecimals::Known(d) => serializer.serialize_u64(*d),
            SizeDecimals::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// A spot pair from `spotMeta.universe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotPair {
    pub index: usize,
    pub name: String,
    /// Constituent tokens joined for display, or `N/A`.
    pub tokens: String,
    pub size_decimals: SizeDecimals,
}

/// An account the gateway reports as close to liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidatableAccount {
    pub address: Option<String>,
    /// Distance to liquidation, in percent.
    pub risk: f64,
    pub leverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultSummary {
    pub name: String,
    pub vault_address: Option<String>,
    pub tvl: f64,
    pub pnl_7d: f64,
    pub sharpe: f64,
}

/// Listing counts for the landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub perp_assets: usize,
    pub spot_assets: usize,
    pub liquidatable: usize,
    pub vaults: usize,
}
