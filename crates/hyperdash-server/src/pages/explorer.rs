use axum::{
    extract::{Query, State},
    response::Html,
};
use hyperdash_core::format::{format_address, format_number, format_timestamp_millis};
use hyperdash_core::{EvmBlockSummary, PerpAsset, SpotPair};
use serde::Deserialize;

use super::{error_panel, escape_html, failure_message, layout, stat_card, table};
use crate::services::evm::{self as evm_service, EvmSearchResult};
use crate::services::markets;
use crate::AppState;

// ============================================================================
// Perpetual assets
// ============================================================================

pub async fn assets(State(state): State<AppState>) -> Html<String> {
    println!("[REQUEST] GET /explorer/assets");
    let result = markets::load_perp_assets(&state.gateway)
        .await
        .map_err(|e| failure_message(&e));
    Html(render_assets(&result))
}

pub fn render_assets(result: &Result<Vec<PerpAsset>, String>) -> String {
    let body = match result {
        Err(message) => error_panel(message),
        Ok(assets) => {
            let rows: Vec<String> = assets
                .iter()
                .map(|a| {
                    let mode_class = if a.only_isolated { "text-danger" } else { "text-success" };
                    format!(
                        r#"<tr><td><strong>{}</strong></td><td class="num">{}</td><td class="num">{}</td><td class="{}">{}</td></tr>"#,
                        escape_html(&a.name),
                        a.max_leverage.map(|l| format!("{}x", l)).unwrap_or_else(|| "-".to_string()),
                        a.sz_decimals.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                        mode_class,
                        a.margin_mode()
                    )
                })
                .collect();
            format!(
                r#"<p class="muted">{} perpetual markets</p>{}"#,
                assets.len(),
                table(
                    &["#Asset", "Max Leverage", "Size Decimals", "#Margin Mode"],
                    &rows,
                    "No perpetual markets",
                )
            )
        }
    };
    layout("Asset Explorer", "/explorer/assets", &body)
}

// ============================================================================
// Spot pairs
// ============================================================================

pub async fn spot(State(state): State<AppState>) -> Html<String> {
    println!("[REQUEST] GET /explorer/spot");
    let result = markets::load_spot_pairs(&state.gateway)
        .await
        .map_err(|e| failure_message(&e));
    Html(render_spot(&result))
}

pub fn render_spot(result: &Result<Vec<SpotPair>, String>) -> String {
    let body = match result {
        Err(message) => error_panel(message),
        Ok(pairs) => {
            let rows: Vec<String> = pairs
                .iter()
                .map(|p| {
                    format!(
                        r#"<tr><td class="mono">@{}</td><td><strong>{}</strong></td><td>{}</td><td class="num">{}</td></tr>"#,
                        p.index,
                        escape_html(&p.name),
                        escape_html(&p.tokens),
                        p.size_decimals
                    )
                })
                .collect();
            format!(
                r#"<p class="muted">Explore all spot trading pairs on Hyperliquid</p>{}"#,
                table(
                    &["#Index", "#Pair Name", "#Tokens", "Size Decimals"],
                    &rows,
                    "No spot markets",
                )
            )
        }
    };
    layout("Spot Markets", "/explorer/spot", &body)
}

// ============================================================================
// EVM explorer
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct EvmPageQuery {
    pub q: Option<String>,
}

pub struct EvmView {
    pub query: String,
    /// `None` when the head block could not be loaded.
    pub head: Option<EvmBlockSummary>,
    /// `None` when no search was submitted.
    pub search: Option<Result<EvmSearchResult, String>>,
}

pub async fn evm(State(state): State<AppState>, Query(query): Query<EvmPageQuery>) -> Html<String> {
    println!("[REQUEST] GET /explorer/evm q={}", query.q.as_deref().unwrap_or(""));

    let search = async {
        match query.q.as_deref() {
            Some(q) => Some(evm_service::search(&state.gateway, q).await.map_err(|e| failure_message(&e))),
            None => None,
        }
    };
    let (head, search) = tokio::join!(evm_service::fetch_head(&state.gateway), search);

    let head = head.unwrap_or_else(|e| {
        e.log();
        None
    });

    Html(render_evm(&EvmView {
        query: query.q.clone().unwrap_or_default(),
        head,
        search,
    }))
}

pub fn render_evm(view: &EvmView) -> String {
    let head = match &view.head {
        None => r#"<p class="muted">Not available.</p>"#.to_string(),
        Some(block) => {
            let or_na = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
            let gas = match (block.gas_used, block.gas_limit) {
                (Some(used), Some(limit)) => {
                    format!("{} / {}", format_number(used, 0), format_number(limit, 0))
                }
                _ => "N/A".to_string(),
            };
            let hash = block
                .hash
                .as_deref()
                .map(|h| format_address(h, 10, 10))
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                r#"<div class="grid">{}{}{}{}{}</div>"#,
                stat_card("Block Number", &or_na(block.number), ""),
                stat_card("Block Hash", &hash, "mono"),
                stat_card("Gas", &gas, ""),
                stat_card("Tx Count", &or_na(block.tx_count), ""),
                stat_card("Timestamp", &format_timestamp_millis(block.timestamp_millis()), ""),
            )
        }
    };

    let form = format!(
        r#"<form class="panel" method="get" action="/explorer/evm">
  <input type="text" name="q" placeholder="Search by address / tx hash / block hash / block number" value="{}" />
  <button type="submit">Search</button>
</form>"#,
        escape_html(&view.query)
    );

    let result = match &view.search {
        None => String::new(),
        Some(Err(message)) => error_panel(message),
        Some(Ok(result)) => match result.raw() {
            None => r#"<div class="panel muted">Nothing found.</div>"#.to_string(),
            Some(raw) => {
                let pretty = serde_json::to_string_pretty(&raw).unwrap_or_default();
                format!(r#"<div class="panel"><pre>{}</pre></div>"#, escape_html(&pretty))
            }
        },
    };

    let body = format!(
        r#"<div class="panel"><h2>Current Block</h2>{}</div>{}{}"#,
        head, form, result
    );
    layout("EVM Explorer", "/explorer/evm", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_for, body_text};
    use axum::body::Body;
    use axum::http::Request;
    use hyperdash_core::SizeDecimals;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_assets_table() {
        let html = render_assets(&Ok(vec![
            PerpAsset { name: "BTC".to_string(), max_leverage: Some(50), sz_decimals: Some(5), only_isolated: false },
            PerpAsset { name: "MEME".to_string(), max_leverage: None, sz_decimals: None, only_isolated: true },
        ]));
        assert!(html.contains("<strong>BTC</strong>"));
        assert!(html.contains("50x"));
        assert!(html.contains(r#"<td class="text-success">Cross / Isolated</td>"#));
        assert!(html.contains(r#"<td class="text-danger">Isolated Only</td>"#));
        assert!(html.contains("2 perpetual markets"));
    }

    #[test]
    fn test_spot_table_shows_na_decimals() {
        let html = render_spot(&Ok(vec![SpotPair {
            index: 3,
            name: "@3".to_string(),
            tokens: "N/A".to_string(),
            size_decimals: SizeDecimals::NotAvailable,
        }]));
        assert!(html.contains(r#"<td class="mono">@3</td>"#));
        assert!(html.contains(r#"<td class="num">N/A</td>"#));
    }

    #[test]
    fn test_error_replaces_table() {
        let html = render_spot(&Err("Info API Error (500): down".to_string()));
        assert!(html.contains("Info API Error (500): down"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_evm_head_card() {
        let html = render_evm(&EvmView {
            query: String::new(),
            head: Some(EvmBlockSummary {
                number: Some(436),
                hash: Some(format!("0x{}", "ab".repeat(32))),
                gas_used: Some(21000),
                gas_limit: Some(30_000_000),
                tx_count: Some(3),
                timestamp: Some(1_700_000_000),
            }),
            search: None,
        });
        assert!(html.contains("21,000 / 30,000,000"));
        assert!(html.contains("0xabababab...ababababab"));
        assert!(html.contains("2023-11-14 22:13:20 UTC"));

        let missing = render_evm(&EvmView { query: String::new(), head: None, search: None });
        assert!(missing.contains("Not available."));
    }

    #[test]
    fn test_evm_search_outcomes() {
        let found = render_evm(&EvmView {
            query: "1".to_string(),
            head: None,
            search: Some(Ok(EvmSearchResult::Transaction { raw: json!({ "nonce": "<0x1>" }) })),
        });
        assert!(found.contains("&quot;nonce&quot;: &quot;&lt;0x1&gt;&quot;"));

        let not_found = render_evm(&EvmView {
            query: "1".to_string(),
            head: None,
            search: Some(Ok(EvmSearchResult::NotFound)),
        });
        assert!(not_found.contains("Nothing found."));
    }

    #[tokio::test]
    async fn test_bad_query_shows_validation_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/evm"))
            .and(body_partial_json(json!({ "method": "eth_getBlockByNumber" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .expect(1)
            .mount(&server)
            .await;

        let response = app_for(&server.uri())
            .oneshot(Request::builder().uri("/explorer/evm?q=hello").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Enter an address, tx hash, block hash, or block number."));
        assert!(html.contains("Not available."));
    }
}
