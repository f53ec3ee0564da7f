//! EVM JSON-RPC envelopes and block/account normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::Address;
use crate::value::{non_empty_str, path, scalar_string, unsigned};

// =============================================================================
// Hex quantities
// =============================================================================

/// Decode a hex quantity such as `"0x1a"`.
///
/// Returns `None` for anything that is not a string of hex digits (with an
/// optional `0x` prefix), including values that overflow `u128`.
pub fn decode_hex(value: &Value) -> Option<u128> {
    decode_hex_str(value.as_str()?)
}

pub fn decode_hex_str(s: &str) -> Option<u128> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

pub fn encode_hex(n: u128) -> String {
    format!("0x{:x}", n)
}

fn decode_hex_u64(value: &Value) -> Option<u64> {
    decode_hex(value).and_then(|n| u64::try_from(n).ok())
}

// =============================================================================
// JSON-RPC envelope
// =============================================================================

/// Methods issued against the `/evm` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvmMethod {
    GetBlockByNumber,
    GetBlockByHash,
    GetTransactionByHash,
    GetBalance,
    GetTransactionCount,
}

impl EvmMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvmMethod::GetBlockByNumber => "eth_getBlockByNumber",
            EvmMethod::GetBlockByHash => "eth_getBlockByHash",
            EvmMethod::GetTransactionByHash => "eth_getTransactionByHash",
            EvmMethod::GetBalance => "eth_getBalance",
            EvmMethod::GetTransactionCount => "eth_getTransactionCount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: EvmMethod, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.as_str().to_string(),
            params,
        }
    }

    /// `eth_getBlockByNumber` with full transaction objects.
    pub fn block_by_number(tag: &str) -> Self {
        Self::new(1, EvmMethod::GetBlockByNumber, vec![json!(tag), json!(true)])
    }

    pub fn block_by_hash(hash: &str) -> Self {
        Self::new(1, EvmMethod::GetBlockByHash, vec![json!(hash), json!(true)])
    }

    pub fn transaction_by_hash(hash: &str) -> Self {
        Self::new(1, EvmMethod::GetTransactionByHash, vec![json!(hash)])
    }

    pub fn balance(address: &Address) -> Self {
        Self::new(1, EvmMethod::GetBalance, vec![json!(address.as_str()), json!("latest")])
    }

    pub fn transaction_count(address: &Address) -> Self {
        Self::new(
            2,
            EvmMethod::GetTransactionCount,
            vec![json!(address.as_str()), json!("latest")],
        )
    }
}

/// The `result` member of a JSON-RPC response, treating `null` as absent.
pub fn rpc_result(response: &Value) -> Option<&Value> {
    response.get("result").filter(|r| !r.is_null())
}

/// Like [`rpc_result`], but a bare object without an envelope is accepted
/// as the result itself. Error envelopes yield `None`.
pub fn rpc_result_or_self(response: &Value) -> Option<&Value> {
    if let Some(result) = rpc_result(response) {
        return Some(result);
    }
    if response.get("error").is_some() || response.get("result").is_some() {
        return None;
    }
    response.is_object().then_some(response)
}

// =============================================================================
// Search classification
// =============================================================================

/// What an explorer query refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmSearchTerm {
    /// 32-byte hash; may name a block or a transaction.
    Hash(String),
    Address(Address),
    BlockNumber(u64),
    /// All digits, but past any height a chain can reach.
    BlockNumberOutOfRange,
}

/// Classify an explorer query by shape alone. `None` means unrecognized.
pub fn classify_evm_search_term(query: &str) -> Option<EvmSearchTerm> {
    let q = query.trim();

    let is_hex = q.len() > 2 && q.starts_with("0x") && q[2..].bytes().all(|b| b.is_ascii_hexdigit());
    if is_hex && q.len() == 66 {
        return Some(EvmSearchTerm::Hash(q.to_string()));
    }
    if is_hex && q.len() == 42 {
        return Address::parse(q).ok().map(EvmSearchTerm::Address);
    }
    if !q.is_empty() && q.bytes().all(|b| b.is_ascii_digit()) {
        return Some(
            q.parse::<u64>()
                .map(EvmSearchTerm::BlockNumber)
                .unwrap_or(EvmSearchTerm::BlockNumberOutOfRange),
        );
    }
    None
}

// =============================================================================
// Block summary
// =============================================================================

/// Header fields of a block, tolerant of non-standard field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmBlockSummary {
    pub number: Option<u64>,
    pub hash: Option<String>,
    pub gas_used: Option<u64>,
    pub gas_limit: Option<u64>,
    pub tx_count: Option<u64>,
    /// Unix seconds.
    pub timestamp: Option<u64>,
}

impl EvmBlockSummary {
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.timestamp
            .and_then(|s| i64::try_from(s).ok())
            .and_then(|s| s.checked_mul(1000))
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.timestamp_millis().and_then(DateTime::from_timestamp_millis)
    }
}

pub fn normalize_block_summary(raw: &Value) -> EvmBlockSummary {
    let array_len = |key: &str| raw[key].as_array().map(|a| a.len() as u64);

    EvmBlockSummary {
        number: decode_hex_u64(&raw["number"])
            .or_else(|| unsigned(&raw["height"]))
            .or_else(|| unsigned(&raw["blockNumber"])),
        hash: ["hash", "blockHash", "id"]
            .iter()
            .find_map(|key| non_empty_str(&raw[*key]))
            .map(str::to_string),
        gas_used: decode_hex_u64(&raw["gasUsed"])
            .or_else(|| path(raw, &["gas", "used"]).and_then(unsigned)),
        gas_limit: decode_hex_u64(&raw["gasLimit"])
            .or_else(|| path(raw, &["gas", "limit"]).and_then(unsigned)),
        tx_count: array_len("transactions")
            .or_else(|| array_len("txs"))
            .or_else(|| unsigned(&raw["transactionsCount"])),
        timestamp: decode_hex_u64(&raw["timestamp"])
            .or_else(|| unsigned(&raw["time"])),
    }
}

// =============================================================================
// Address summary
// =============================================================================

const WEI_PER_ETHER: f64 = 1e18;

/// Balance and nonce of an account, assembled from `eth_getBalance` and
/// `eth_getTransactionCount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressAccountSummary {
    pub address: Address,
    /// Raw hex quantity as returned upstream.
    pub balance_wei: String,
    pub balance: Option<u128>,
    pub tx_count: Option<u128>,
}

impl AddressAccountSummary {
    /// Build from the two JSON-RPC responses. A missing result counts as
    /// `0x0`.
    pub fn from_responses(address: Address, balance: &Value, tx_count: &Value) -> Self {
        let hex_or_zero = |response: &Value| {
            rpc_result(response)
                .and_then(scalar_string)
                .unwrap_or_else(|| "0x0".to_string())
        };
        let balance_wei = hex_or_zero(balance);
        let tx_count_hex = hex_or_zero(tx_count);

        Self {
            address,
            balance: decode_hex_str(&balance_wei),
            tx_count: decode_hex_str(&tx_count_hex),
            balance_wei,
        }
    }

    /// Balance scaled to whole units of the native token.
    pub fn balance_native(&self) -> Option<f64> {
        self.balance.map(|wei| wei as f64 / WEI_PER_ETHER)
    }
}
