use hyperdash_core::{
    market_overview, normalize_liquidatable, normalize_perp_assets, normalize_spot_pairs,
    normalize_vaults, LiquidatableAccount, MarketOverview, PerpAsset, SpotPair, VaultSummary,
};

use crate::error::AppResult;
use crate::gateway::{GatewayClient, InfoRequest};

pub async fn load_perp_assets(gateway: &GatewayClient) -> AppResult<Vec<PerpAsset>> {
    let meta = gateway.info(&InfoRequest::Meta).await?;
    Ok(normalize_perp_assets(&meta))
}

pub async fn load_spot_pairs(gateway: &GatewayClient) -> AppResult<Vec<SpotPair>> {
    let spot_meta = gateway.info(&InfoRequest::SpotMeta).await?;
    Ok(normalize_spot_pairs(&spot_meta))
}

pub async fn load_liquidatable(gateway: &GatewayClient) -> AppResult<Vec<LiquidatableAccount>> {
    let raw = gateway.info(&InfoRequest::Liquidatable).await?;
    Ok(normalize_liquidatable(&raw))
}

pub async fn load_vaults(gateway: &GatewayClient) -> AppResult<Vec<VaultSummary>> {
    let raw = gateway.info(&InfoRequest::VaultSummaries).await?;
    Ok(normalize_vaults(&raw))
}

/// Listing counts for the landing page.
pub async fn load_overview(gateway: &GatewayClient) -> AppResult<MarketOverview> {
    let (meta, spot_meta, liquidatable, vaults) = tokio::try_join!(
        gateway.info(&InfoRequest::Meta),
        gateway.info(&InfoRequest::SpotMeta),
        gateway.info(&InfoRequest::Liquidatable),
        gateway.info(&InfoRequest::VaultSummaries),
    )?;

    Ok(market_overview(&meta, &spot_meta, &liquidatable, &vaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_support::client_for;
    use hyperdash_core::SizeDecimals;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, kind: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_json(json!({ "type": kind })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let server = MockServer::start().await;
        mount(&server, "meta", json!({ "universe": [{ "name": "BTC" }, { "name": "ETH" }] })).await;
        mount(&server, "spotMeta", json!({ "universe": [{ "name": "PURR/USDC" }] })).await;
        mount(&server, "liquidatable", json!([])).await;
        mount(&server, "vaultSummaries", json!([{ "name": "HLP" }])).await;

        let overview = load_overview(&client_for(&server.uri())).await.unwrap();
        assert_eq!(
            overview,
            MarketOverview { perp_assets: 2, spot_assets: 1, liquidatable: 0, vaults: 1 }
        );
    }

    #[tokio::test]
    async fn test_spot_pairs_use_fallback_names() {
        let server = MockServer::start().await;
        mount(
            &server,
            "spotMeta",
            json!({ "universe": [{ "tokens": ["HYPE", "USDC"], "decimals": { "size": 2 } }, {}] }),
        )
        .await;

        let pairs = load_spot_pairs(&client_for(&server.uri())).await.unwrap();
        assert_eq!(pairs[0].name, "HYPE/USDC");
        assert_eq!(pairs[0].size_decimals, SizeDecimals::Known(2));
        assert_eq!(pairs[1].name, "@1");
        assert_eq!(pairs[1].size_decimals, SizeDecimals::NotAvailable);
    }

    #[tokio::test]
    async fn test_non_array_vaults_are_empty() {
        let server = MockServer::start().await;
        mount(&server, "vaultSummaries", json!({ "unexpected": true })).await;

        let vaults = load_vaults(&client_for(&server.uri())).await.unwrap();
        assert!(vaults.is_empty());
    }
}
