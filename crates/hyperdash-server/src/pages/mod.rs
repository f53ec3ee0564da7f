//! Server-rendered HTML pages.
//!
//! Each page handler fetches through [`crate::services`] and hands plain
//! records to a `render_*` function, so rendering can be tested without a
//! gateway.

pub mod account;
pub mod explorer;
pub mod home;
pub mod risk;

use axum::{
    routing::{get, post},
    Router,
};
use hyperdash_core::format::format_datetime;

use crate::error::AppError;
use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/account", get(account::show))
        .route("/account/saved/remove", post(account::remove_saved))
        .route("/account/saved/clear", post(account::clear_saved))
        .route("/explorer/assets", get(explorer::assets))
        .route("/explorer/spot", get(explorer::spot))
        .route("/explorer/evm", get(explorer::evm))
        .route("/liquidations", get(risk::liquidations))
        .route("/vaults", get(risk::vaults))
}

// ============================================================================
// Layout
// ============================================================================

const NAV: [(&str, &str); 7] = [
    ("/", "Home"),
    ("/account", "Account"),
    ("/vaults", "Vaults"),
    ("/liquidations", "Liquidations"),
    ("/explorer/assets", "Assets"),
    ("/explorer/spot", "Spot"),
    ("/explorer/evm", "EVM"),
];

const STYLE: &str = r#"
  :root { --bg: #0b1220; --panel: rgba(255,255,255,0.06); --stroke: rgba(255,255,255,0.12);
          --text: rgba(255,255,255,0.92); --muted: rgba(255,255,255,0.65);
          --good: #33d17a; --bad: #ff4d4d; --brand: #a744fb; }
  * { box-sizing: border-box; }
  body { margin: 0; font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Arial;
         color: var(--text); background: var(--bg); }
  .wrap { max-width: 1200px; margin: 0 auto; padding: 20px 18px 40px; }
  nav { display: flex; gap: 6px; flex-wrap: wrap; padding: 12px 16px; border: 1px solid var(--stroke);
        border-radius: 14px; background: var(--panel); margin-bottom: 20px; }
  nav a { color: var(--muted); text-decoration: none; padding: 6px 12px; border-radius: 10px; }
  nav a.active { color: var(--text); background: rgba(167,68,251,0.25); }
  nav .brand { color: var(--text); font-weight: 700; margin-right: 12px; }
  .panel { border: 1px solid var(--stroke); border-radius: 14px; background: var(--panel);
           padding: 16px; margin-bottom: 18px; overflow-x: auto; }
  .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 12px; }
  .card { border: 1px solid var(--stroke); border-radius: 12px; padding: 14px; background: var(--panel);
          color: var(--text); text-decoration: none; display: block; }
  .card .label { font-size: 12px; color: var(--muted); }
  .card .value { font-size: 22px; font-weight: 700; margin-top: 6px; }
  .card.alert { border-color: var(--bad); }
  table { width: 100%; border-collapse: collapse; }
  th, td { padding: 10px 12px; border-bottom: 1px solid var(--stroke); text-align: left; font-size: 14px; }
  th { color: var(--muted); font-weight: 600; }
  .num { text-align: right; font-family: ui-monospace, Menlo, monospace; }
  .mono { font-family: ui-monospace, Menlo, monospace; word-break: break-all; }
  .muted, .text-muted { color: var(--muted); }
  .text-success { color: var(--good); }
  .text-danger { color: var(--bad); }
  .error { border-color: var(--bad); color: #ffb3b3; }
  .tabs a { margin-right: 14px; color: var(--muted); }
  .tabs a.active { color: var(--text); font-weight: 700; }
  input[type=text] { padding: 10px 12px; border-radius: 10px; border: 1px solid var(--stroke);
                     background: rgba(0,0,0,0.25); color: var(--text); min-width: 360px; }
  button { padding: 10px 16px; border-radius: 10px; border: 0; background: var(--brand); color: white;
           font-weight: 600; cursor: pointer; }
  button.link { background: none; color: var(--muted); padding: 0 6px; }
  form.inline { display: inline; }
  pre { font-size: 12px; overflow: auto; }
"#;

/// Wrap page content in the shared document shell.
pub fn layout(title: &str, active: &str, body: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
        })
        .collect();

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title} • Hyperdash</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="wrap">
      <nav><span class="brand">Hyperdash</span>{nav}</nav>
      <h1>{title}</h1>
      {body}
      <p class="muted">Rendered {rendered}</p>
    </div>
  </body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        nav = nav,
        body = body,
        rendered = format_datetime(chrono::Utc::now().timestamp()),
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Percent-encode a query parameter value.
pub fn encode_query(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

// ============================================================================
// Fragments
// ============================================================================

pub fn stat_card(label: &str, value: &str, class: &str) -> String {
    format!(
        r#"<div class="card"><div class="label">{}</div><div class="value {}">{}</div></div>"#,
        escape_html(label),
        class,
        escape_html(value)
    )
}

pub fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="panel error"><strong>Error</strong><p>{}</p></div>"#,
        escape_html(message)
    )
}

/// Table with a placeholder row when `rows` is empty. Headers prefixed
/// with `#` are text columns, the rest are right-aligned numbers. Cells are
/// trusted HTML; callers escape their values.
pub fn table(headers: &[&str], rows: &[String], empty: &str) -> String {
    let head: String = headers
        .iter()
        .map(|h| match h.strip_prefix('#') {
            Some(text) => format!("<th>{}</th>", escape_html(text)),
            None => format!(r#"<th class="num">{}</th>"#, escape_html(h)),
        })
        .collect();

    let body = if rows.is_empty() {
        format!(
            r#"<tr><td class="muted" colspan="{}">{}</td></tr>"#,
            headers.len(),
            escape_html(empty)
        )
    } else {
        rows.concat()
    };

    format!(
        r#"<div class="panel"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div>"#,
        head, body
    )
}

/// Message shown in place of page content when a load fails.
pub fn failure_message(err: &AppError) -> String {
    err.log();
    err.to_string()
}
