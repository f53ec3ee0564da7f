use hyperdash_core::{
    classify_evm_search_term, encode_hex, normalize_block_summary, rpc_result, rpc_result_or_self,
    Address, AddressAccountSummary, CoreError, EvmBlockSummary, EvmSearchTerm, JsonRpcRequest,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::gateway::GatewayClient;

/// Outcome of an explorer search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvmSearchResult {
    Block { summary: EvmBlockSummary, raw: Value },
    Transaction { raw: Value },
    Account { summary: AddressAccountSummary },
    NotFound,
}

impl EvmSearchResult {
    fn block(raw: &Value) -> Self {
        EvmSearchResult::Block {
            summary: normalize_block_summary(raw),
            raw: raw.clone(),
        }
    }

    /// Raw upstream object, or the assembled summary for an account.
    pub fn raw(&self) -> Option<Value> {
        match self {
            EvmSearchResult::Block { raw, .. } | EvmSearchResult::Transaction { raw } => {
                Some(raw.clone())
            }
            EvmSearchResult::Account { summary } => serde_json::to_value(summary).ok(),
            EvmSearchResult::NotFound => None,
        }
    }
}

/// Latest block. `None` when the gateway answers without a block.
pub async fn fetch_head(gateway: &GatewayClient) -> AppResult<Option<EvmBlockSummary>> {
    let response = gateway.evm(&JsonRpcRequest::block_by_number("latest")).await?;
    let head = rpc_result_or_self(&response).map(normalize_block_summary);

    match &head {
        Some(block) => tracing::debug!(number = ?block.number, "Fetched head block"),
        None => tracing::warn!("Head block lookup returned no block"),
    }
    Ok(head)
}

/// A 32-byte hash may name a block or a transaction; blocks are tried first.
pub async fn resolve_hash(gateway: &GatewayClient, hash: &str) -> AppResult<EvmSearchResult> {
    let by_block = gateway.evm(&JsonRpcRequest::block_by_hash(hash)).await?;
    if let Some(block) = rpc_result(&by_block) {
        return Ok(EvmSearchResult::block(block));
    }

    let by_tx = gateway.evm(&JsonRpcRequest::transaction_by_hash(hash)).await?;
    Ok(rpc_result(&by_tx)
        .map(|tx| EvmSearchResult::Transaction { raw: tx.clone() })
        .unwrap_or(EvmSearchResult::NotFound))
}

pub async fn address_summary(
    gateway: &GatewayClient,
    address: &Address,
) -> AppResult<AddressAccountSummary> {
    let balance_request = JsonRpcRequest::balance(address);
    let count_request = JsonRpcRequest::transaction_count(address);

    let (balance, tx_count) = tokio::try_join!(
        gateway.evm(&balance_request),
        gateway.evm(&count_request),
    )?;

    Ok(AddressAccountSummary::from_responses(address.clone(), &balance, &tx_count))
}

pub async fn block_by_number(gateway: &GatewayClient, number: u64) -> AppResult<EvmSearchResult> {
    let request = JsonRpcRequest::block_by_number(&encode_hex(u128::from(number)));
    let response = gateway.evm(&request).await?;
    Ok(rpc_result(&response)
        .map(EvmSearchResult::block)
        .unwrap_or(EvmSearchResult::NotFound))
}

/// Classify `query` and run the matching lookup. Unrecognized input is
/// rejected without touching the gateway.
pub async fn search(gateway: &GatewayClient, query: &str) -> AppResult<EvmSearchResult> {
    let term = classify_evm_search_term(query)
        .ok_or_else(|| CoreError::InvalidSearchTerm(query.trim().to_string()))?;

    tracing::info!(term = ?term, "EVM search");

    match term {
        EvmSearchTerm::Hash(hash) => resolve_hash(gateway, &hash).await,
        EvmSearchTerm::Address(address) => Ok(EvmSearchResult::Account {
            summary: address_summary(gateway, &address).await?,
        }),
        EvmSearchTerm::BlockNumber(number) => block_by_number(gateway, number).await,
        EvmSearchTerm::BlockNumberOutOfRange => Ok(EvmSearchResult::NotFound),
    }
}
