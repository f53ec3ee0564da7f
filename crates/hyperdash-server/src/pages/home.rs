use axum::{extract::State, response::Html};
use hyperdash_core::MarketOverview;

use super::{escape_html, layout};
use crate::services::markets;
use crate::AppState;

const FEATURES: [(&str, &str, &str); 6] = [
    ("/account", "Portfolio Tracking", "Monitor positions, orders, and balances for any Hyperliquid address"),
    ("/vaults", "Vault Analytics", "Discover top-performing vaults and analyze their strategies"),
    ("/liquidations", "Risk Monitoring", "Track liquidatable positions and manage portfolio risk"),
    ("/explorer/assets", "Asset Explorer", "Browse all available perpetual markets and their specifications"),
    ("/explorer/spot", "Spot Markets", "Explore spot trading pairs and token information"),
    ("/explorer/evm", "EVM Explorer", "Query blockchain data and explore HyperEVM transactions"),
];

pub async fn index(State(state): State<AppState>) -> Html<String> {
    println!("[REQUEST] GET /");

    // A failed overview still renders the page, with zero counts.
    let overview = match markets::load_overview(&state.gateway).await {
        Ok(overview) => overview,
        Err(e) => {
            e.log();
            MarketOverview::default()
        }
    };

    Html(render_home(&overview))
}

pub fn render_home(overview: &MarketOverview) -> String {
    let stat = |href: &str, label: &str, value: usize, alert: bool| {
        format!(
            r#"<a class="card{}" href="{}"><div class="label">{}</div><div class="value">{}</div></a>"#,
            if alert { " alert" } else { "" },
            href,
            label,
            value
        )
    };

    let stats = [
        stat("/explorer/assets", "Perpetual Markets", overview.perp_assets, false),
        stat("/explorer/spot", "Spot Markets", overview.spot_assets, false),
        stat("/liquidations", "At-Risk Positions", overview.liquidatable, overview.liquidatable > 0),
        stat("/vaults", "Active Vaults", overview.vaults, false),
    ]
    .concat();

    let features: String = FEATURES
        .iter()
        .map(|(href, title, description)| {
            format!(
                r#"<a class="card" href="{}"><div class="value">{}</div><p class="muted">{}</p></a>"#,
                href,
                escape_html(title),
                escape_html(description)
            )
        })
        .collect();

    let body = format!(
        r#"<div class="panel">
  <p>Get insights on your Hyperliquid portfolio with real-time tracking of positions, orders, balances, and risk metrics.</p>
  <a href="/account"><button>Track Your Portfolio</button></a>
</div>
<div class="grid">{}</div>
<h2>Explore</h2>
<div class="grid">{}</div>"#,
        stats, features
    );

    layout("Portfolio Checker", "/", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidatable_count_is_highlighted() {
        let html = render_home(&MarketOverview {
            perp_assets: 150,
            spot_assets: 40,
            liquidatable: 3,
            vaults: 12,
        });
        assert!(html.contains(r#"<a class="card alert" href="/liquidations">"#));
        assert!(html.contains(r#"<div class="value">150</div>"#));

        let quiet = render_home(&MarketOverview::default());
        assert!(!quiet.contains("card alert"));
    }
}
