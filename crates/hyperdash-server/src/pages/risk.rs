use axum::{extract::State, response::Html};
use hyperdash_core::format::{format_compact, format_number, pnl_class, short_address};
use hyperdash_core::{LiquidatableAccount, VaultSummary};

use super::{encode_query, error_panel, escape_html, failure_message, layout, table};
use crate::services::markets;
use crate::AppState;

pub async fn liquidations(State(state): State<AppState>) -> Html<String> {
    println!("[REQUEST] GET /liquidations");
    let result = markets::load_liquidatable(&state.gateway)
        .await
        .map_err(|e| failure_message(&e));
    Html(render_liquidations(&result))
}

pub fn render_liquidations(result: &Result<Vec<LiquidatableAccount>, String>) -> String {
    let body = match result {
        Err(message) => error_panel(message),
        Ok(accounts) => {
            let rows: Vec<String> = accounts
                .iter()
                .map(|a| {
                    let address = match &a.address {
                        Some(address) => format!(
                            r#"<a class="mono" href="/account?address={}" title="{}">{}</a>"#,
                            encode_query(address),
                            escape_html(address),
                            escape_html(&short_address(address))
                        ),
                        None => "-".to_string(),
                    };
                    format!(
                        r#"<tr><td>{}</td><td class="num">{}%</td><td class="num">{}x</td><td class="text-danger">At Risk</td></tr>"#,
                        address,
                        format_number(a.risk, 2),
                        format_number(a.leverage, 2)
                    )
                })
                .collect();
            table(
                &["#Address", "Risk", "Leverage", "#Status"],
                &rows,
                "No liquidations at the moment.",
            )
        }
    };
    layout("Liquidations", "/liquidations", &body)
}

pub async fn vaults(State(state): State<AppState>) -> Html<String> {
    println!("[REQUEST] GET /vaults");
    let result = markets::load_vaults(&state.gateway)
        .await
        .map_err(|e| failure_message(&e));
    Html(render_vaults(&result))
}

pub fn render_vaults(result: &Result<Vec<VaultSummary>, String>) -> String {
    let body = match result {
        Err(message) => error_panel(message),
        Ok(vaults) => {
            let rows: Vec<String> = vaults
                .iter()
                .map(|v| {
                    format!(
                        r#"<tr><td><strong>{}</strong></td><td class="num">${}</td><td class="num {}">{}</td><td class="num">{}</td></tr>"#,
                        escape_html(&v.name),
                        format_compact(v.tvl, 3),
                        pnl_class(v.pnl_7d).css_class(),
                        format_compact(v.pnl_7d, 2),
                        format_compact(v.sharpe, 2)
                    )
                })
                .collect();
            table(&["#Vault", "TVL", "7D PnL", "Sharpe"], &rows, "No vaults to display.")
        }
    };
    layout("Vaults", "/vaults", &body)
}
