use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use hyperdash_core::format::{
    filter_non_zero_balances, format_compact, format_number, format_usd, pnl_class, short_address,
};
use hyperdash_core::{Address, OpenOrder, Portfolio, Position, SpotBalance};
use serde::Deserialize;

use super::{encode_query, error_panel, escape_html, failure_message, layout, stat_card, table};
use crate::error::AppError;
use crate::services::account::load_portfolio;
use crate::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Positions,
    Orders,
    Balances,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Positions, Tab::Orders, Tab::Balances];

    /// Unknown or missing names fall back to positions.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("orders") => Tab::Orders,
            Some("balances") => Tab::Balances,
            _ => Tab::Positions,
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Tab::Positions => "positions",
            Tab::Orders => "orders",
            Tab::Balances => "balances",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Tab::Positions => "Positions",
            Tab::Orders => "Orders",
            Tab::Balances => "Balances",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    pub address: Option<String>,
    pub tab: Option<String>,
    #[serde(default)]
    pub hide_zero: bool,
}

#[derive(Debug, Deserialize)]
pub struct SavedAddressForm {
    pub address: String,
}

/// Everything the account page needs to render.
pub struct AccountView {
    pub input: String,
    pub saved: Vec<String>,
    pub tab: Tab,
    pub hide_zero: bool,
    /// `None` until an address has been submitted.
    pub outcome: Option<Result<Portfolio, String>>,
}

pub async fn show(State(state): State<AppState>, Query(query): Query<AccountQuery>) -> Html<String> {
    let tab = Tab::parse(query.tab.as_deref());
    println!("[REQUEST] GET /account tab={}", tab.slug());

    let outcome = match query.address.as_deref() {
        None => None,
        Some(input) => Some(lookup(&state, input).await),
    };

    Html(render_account(&AccountView {
        input: query.address.unwrap_or_default(),
        saved: state.saved.list(),
        tab,
        hide_zero: query.hide_zero,
        outcome,
    }))
}

async fn lookup(state: &AppState, input: &str) -> Result<Portfolio, String> {
    let address = Address::parse(input).map_err(|e| failure_message(&AppError::from(e)))?;
    let portfolio = load_portfolio(&state.gateway, &address)
        .await
        .map_err(|e| failure_message(&e))?;

    // Only addresses that loaded successfully are remembered.
    if let Err(e) = state.saved.add(address.as_str()) {
        tracing::warn!(address = %address, error = %e, "Failed to save address");
    }
    Ok(portfolio)
}

pub async fn remove_saved(
    State(state): State<AppState>,
    Form(form): Form<SavedAddressForm>,
) -> Redirect {
    println!("[REQUEST] POST /account/saved/remove address={}", form.address);
    if let Err(e) = state.saved.remove(&form.address) {
        AppError::from(e).log();
    }
    Redirect::to("/account")
}

pub async fn clear_saved(State(state): State<AppState>) -> Redirect {
    println!("[REQUEST] POST /account/saved/clear");
    if let Err(e) = state.saved.clear() {
        AppError::from(e).log();
    }
    Redirect::to("/account")
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_account(view: &AccountView) -> String {
    let mut body = render_address_form(&view.input, &view.saved);

    match &view.outcome {
        None => {}
        Some(Err(message)) => body.push_str(&error_panel(message)),
        Some(Ok(portfolio)) => body.push_str(&render_portfolio(portfolio, view.tab, view.hide_zero)),
    }

    layout("Account Portfolio", "/account", &body)
}

fn render_address_form(input: &str, saved: &[String]) -> String {
    let mut html = format!(
        r#"<form class="panel" method="get" action="/account">
  <label for="address">Wallet Address</label><br />
  <input id="address" type="text" name="address" placeholder="0x..." value="{}" />
  <button type="submit">Load</button>
</form>"#,
        escape_html(input)
    );

    if saved.is_empty() {
        return html;
    }

    let items: String = saved
        .iter()
        .map(|address| {
            format!(
                r#"<li><a class="mono" href="/account?address={}" title="{}">{}</a>
<form class="inline" method="post" action="/account/saved/remove"><input type="hidden" name="address" value="{}" /><button class="link" type="submit" title="Remove">&times;</button></form></li>"#,
                encode_query(address),
                escape_html(address),
                escape_html(&short_address(address)),
                escape_html(address)
            )
        })
        .collect();

    html.push_str(&format!(
        r#"<div class="panel"><strong>Saved Addresses</strong>
<ul>{}</ul>
<form method="post" action="/account/saved/clear"><button class="link" type="submit">Clear all</button></form></div>"#,
        items
    ));
    html
}

fn render_portfolio(portfolio: &Portfolio, tab: Tab, hide_zero: bool) -> String {
    let summary = &portfolio.margin_summary;
    let cards = [
        stat_card("Account Value", &format_usd(summary.account_value), ""),
        stat_card("Total Position", &format_usd(summary.total_ntl_pos), ""),
        stat_card(
            "Unrealized PnL",
            &format_usd(summary.total_raw_usd),
            pnl_class(summary.total_raw_usd).css_class(),
        ),
        stat_card("Margin Used", &format_usd(summary.total_margin_used), ""),
    ]
    .concat();

    let balances = if hide_zero {
        filter_non_zero_balances(&portfolio.balances)
    } else {
        portfolio.balances.clone()
    };

    let counts = |t: Tab| match t {
        Tab::Positions => portfolio.positions.len(),
        Tab::Orders => portfolio.orders.len(),
        Tab::Balances => balances.len(),
    };
    let base = format!("/account?address={}", encode_query(portfolio.address.as_str()));
    let tabs: String = Tab::ALL
        .iter()
        .map(|t| {
            format!(
                r#"<a href="{}&amp;tab={}"{}>{} ({})</a>"#,
                base,
                t.slug(),
                if *t == tab { r#" class="active""# } else { "" },
                t.label(),
                counts(*t)
            )
        })
        .collect();

    let content = match tab {
        Tab::Positions => positions_table(&portfolio.positions),
        Tab::Orders => orders_table(&portfolio.orders),
        Tab::Balances => {
            let toggle = if hide_zero {
                format!(r#"<a href="{}&amp;tab=balances">Show zero balances</a>"#, base)
            } else {
                format!(r#"<a href="{}&amp;tab=balances&amp;hide_zero=true">Hide zero balances</a>"#, base)
            };
            format!(r#"<p class="muted">{}</p>{}"#, toggle, balances_table(&balances))
        }
    };

    format!(
        r#"<div class="grid">{}</div><div class="panel tabs">{}</div>{}"#,
        cards, tabs, content
    )
}

fn usd_or_dash(value: Option<f64>) -> String {
    value
        .filter(|v| *v != 0.0)
        .map(|v| format_usd(v))
        .unwrap_or_else(|| "-".to_string())
}

fn positions_table(positions: &[Position]) -> String {
    let rows: Vec<String> = positions
        .iter()
        .map(|p| {
            let side = p.side();
            let leverage = p
                .leverage
                .value
                .map(|v| format!("{}x", format_compact(v, 2)))
                .unwrap_or_else(|| "-".to_string());
            format!(
                r#"<tr><td><strong>{}</strong> <span class="{}">{}</span></td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td><td class="num {}">{}</td><td class="num">{} <span class="muted">({})</span></td></tr>"#,
                escape_html(&p.coin),
                side.css_class(),
                side.label(),
                format_number(p.abs_size(), 4),
                usd_or_dash(p.entry_price),
                usd_or_dash(p.position_value),
                pnl_class(p.unrealized_pnl.unwrap_or(0.0)).css_class(),
                usd_or_dash(p.unrealized_pnl),
                leverage,
                escape_html(&p.leverage.kind)
            )
        })
        .collect();

    table(
        &["#Asset", "Size", "Entry", "Value", "PnL", "Leverage"],
        &rows,
        "No open positions",
    )
}

fn orders_table(orders: &[OpenOrder]) -> String {
    let rows: Vec<String> = orders
        .iter()
        .map(|o| {
            format!(
                r#"<tr><td><strong>{}</strong></td><td class="{}">{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                escape_html(&o.coin),
                o.side.css_class(),
                o.side.label(),
                format_usd(o.limit_price),
                format_number(o.size, 4),
                format_number(o.filled_amount(), 4)
            )
        })
        .collect();

    table(&["#Asset", "#Side", "Price", "Size", "Filled"], &rows, "No open orders")
}

fn balances_table(balances: &[SpotBalance]) -> String {
    let rows: Vec<String> = balances
        .iter()
        .map(|b| {
            format!(
                r#"<tr><td><strong>{}</strong></td><td class="num">{}</td><td class="num muted">{}</td></tr>"#,
                escape_html(&b.token),
                format_number(b.total, 6),
                format_number(b.hold, 6)
            )
        })
        .collect();

    table(&["#Token", "Total", "Hold"], &rows, "No spot balances")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_for, body_text, state_for};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use hyperdash_core::{Leverage, MarginSummary, OrderSide};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn portfolio() -> Portfolio {
        Portfolio {
            address: Address::parse(USER).unwrap(),
            margin_summary: MarginSummary {
                account_value: 1234.5,
                total_ntl_pos: 0.0,
                total_raw_usd: -20.0,
                total_margin_used: 10.0,
            },
            positions: vec![Position {
                coin: "BTC".to_string(),
                size: -0.25,
                entry_price: Some(60000.0),
                position_value: None,
                unrealized_pnl: Some(-12.5),
                leverage: Leverage { value: Some(10.0), kind: "cross".to_string() },
            }],
            orders: vec![OpenOrder {
                coin: "ETH".to_string(),
                side: OrderSide::Buy,
                limit_price: 3000.0,
                size: 1.0,
                original_size: 1.5,
                order_id: Some(7),
            }],
            balances: vec![
                SpotBalance { token: "USDC".to_string(), total: 100.5, hold: 10.0 },
                SpotBalance { token: "DUST".to_string(), total: 0.0, hold: 0.0 },
            ],
        }
    }

    fn view(tab: Tab, hide_zero: bool) -> AccountView {
        AccountView {
            input: USER.to_string(),
            saved: vec![],
            tab,
            hide_zero,
            outcome: Some(Ok(portfolio())),
        }
    }

    #[test]
    fn test_tab_parse_defaults_to_positions() {
        assert_eq!(Tab::parse(None), Tab::Positions);
        assert_eq!(Tab::parse(Some("orders")), Tab::Orders);
        assert_eq!(Tab::parse(Some("balances")), Tab::Balances);
        assert_eq!(Tab::parse(Some("bogus")), Tab::Positions);
    }

    #[test]
    fn test_positions_tab() {
        let html = render_account(&view(Tab::Positions, false));
        assert!(html.contains("$1,234.50"));
        assert!(html.contains(r#"<span class="text-danger">SHORT</span>"#));
        assert!(html.contains("0.2500"));
        assert!(html.contains("-$12.50"));
        assert!(html.contains("10x"));
        assert!(html.contains("Orders (1)"));
        assert!(html.contains("Balances (2)"));
    }

    #[test]
    fn test_orders_tab_shows_filled_amount() {
        let html = render_account(&view(Tab::Orders, false));
        assert!(html.contains(r#"<td class="text-success">BUY</td>"#));
        assert!(html.contains("$3,000.00"));
        assert!(html.contains("0.5000"));
    }

    #[test]
    fn test_balances_tab_can_hide_zero() {
        let html = render_account(&view(Tab::Balances, false));
        assert!(html.contains("100.500000"));
        assert!(html.contains("DUST"));

        let html = render_account(&view(Tab::Balances, true));
        assert!(!html.contains("DUST"));
        assert!(html.contains("Balances (1)"));
    }

    #[test]
    fn test_error_and_saved_list() {
        let html = render_account(&AccountView {
            input: "<script>".to_string(),
            saved: vec![USER.to_string()],
            tab: Tab::Positions,
            hide_zero: false,
            outcome: Some(Err("Invalid Ethereum address: <script>".to_string())),
        });
        assert!(html.contains("Invalid Ethereum address: &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("0x1234...5678"));
        assert!(html.contains(r#"action="/account/saved/clear""#));
    }

    #[tokio::test]
    async fn test_successful_load_saves_address() {
        let server = MockServer::start().await;
        for kind in ["clearinghouseState", "spotClearinghouseState"] {
            Mock::given(method("POST"))
                .and(path("/info"))
                .and(body_partial_json(json!({ "type": kind })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_partial_json(json!({ "type": "frontendOpenOrders" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let state = state_for(&server.uri());
        let app = crate::build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/account?address=%20{}%20", USER))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No open positions"));
        assert_eq!(state.saved.list(), vec![USER]);
    }

    #[tokio::test]
    async fn test_invalid_address_is_not_fetched_or_saved() {
        let state = state_for("");
        let app = crate::build_router(state.clone());
        let response = app
            .oneshot(Request::builder().uri("/account?address=").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Please enter an address"));
        assert!(state.saved.list().is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear_redirect() {
        let state = state_for("");
        state.saved.add(USER).unwrap();
        state.saved.add("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd").unwrap();

        let app = crate::build_router(state.clone());
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/account/saved/remove")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(format!("address={}", USER)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/account");
        assert_eq!(state.saved.list().len(), 1);

        app.oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/account/saved/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
        assert!(state.saved.list().is_empty());
    }

    #[tokio::test]
    async fn test_page_without_address_renders_form_only() {
        let response = app_for("")
            .oneshot(Request::builder().uri("/account").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(r#"name="address""#));
        assert!(!html.contains("panel error"));
    }
}
