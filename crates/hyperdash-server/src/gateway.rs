use std::fmt;
use std::time::{Duration, Instant};

use hyperdash_core::{Address, JsonRpcRequest};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

// ============================================================================
// Gateway Client - Hyperliquid Info and EVM JSON-RPC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Info,
    Evm,
}

impl Endpoint {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Info => "info",
            Endpoint::Evm => "evm",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Info => write!(f, "Info"),
            Endpoint::Evm => write!(f, "EVM"),
        }
    }
}

/// Typed bodies for the `/info` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest {
    ClearinghouseState { user: String },
    SpotClearinghouseState { user: String },
    FrontendOpenOrders { user: String },
    Meta,
    SpotMeta,
    Liquidatable,
    VaultSummaries,
}

impl InfoRequest {
    pub fn clearinghouse_state(user: &Address) -> Self {
        Self::ClearinghouseState { user: user.to_string() }
    }

    pub fn spot_clearinghouse_state(user: &Address) -> Self {
        Self::SpotClearinghouseState { user: user.to_string() }
    }

    pub fn frontend_open_orders(user: &Address) -> Self {
        Self::FrontendOpenOrders { user: user.to_string() }
    }
}

/// One-shot JSON client for the gateway. No retries and no caching; the
/// caller decides what a failure means.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Option<String>,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url();
        match &base_url {
            Some(url) => tracing::debug!(base_url = %url, "Creating gateway client"),
            None => tracing::warn!("Gateway base URL is empty; every gateway call will fail"),
        }

        Ok(Self { client, base_url })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// `/info` query. Usually an [`InfoRequest`], but any JSON body is
    /// passed through as-is.
    pub async fn info<B: Serialize + ?Sized>(&self, body: &B) -> AppResult<Value> {
        self.post(Endpoint::Info, body).await
    }

    /// `/evm` JSON-RPC call. The whole response envelope is returned.
    pub async fn evm(&self, request: &JsonRpcRequest) -> AppResult<Value> {
        self.post(Endpoint::Evm, request).await
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: Endpoint, body: &B) -> AppResult<Value> {
        let base_url = self.base_url.as_deref().ok_or(AppError::NotConfigured)?;
        let url = format!("{}/{}", base_url, endpoint.path());
        let start = Instant::now();

        tracing::debug!(endpoint = %endpoint, url = %url, "Sending gateway request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %endpoint, error = %e, "Gateway request failed");
                AppError::Transport {
                    endpoint,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await.map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "Failed to parse gateway response");
            AppError::Transport {
                endpoint,
                message: format!("invalid JSON response: {}", e),
            }
        })?;

        tracing::debug!(
            endpoint = %endpoint,
            status = %status.as_u16(),
            duration_ms = %start.elapsed().as_millis(),
            "Gateway request completed"
        );

        Ok(value)
    }
}
