use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL serving `/info` and `/evm`. Empty means not configured.
    pub base_url: String,
    /// Per-request timeout; 0 disables it.
    #[serde(default)]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
    None,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
            StorageBackend::None => "none",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
}

fn default_gateway_url() -> String {
    std::env::var("QUICKNODE_URL").unwrap_or_default()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("gateway.base_url", default_gateway_url())?
            .set_default("gateway.timeout_seconds", 0)?
            .set_default("storage.backend", "file")?
            .set_default("storage.path", "data/saved_addresses.json")?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (HYPERDASH__GATEWAY__BASE_URL, etc.)
            .add_source(
                Environment::with_prefix("HYPERDASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GatewayConfig {
    /// The base URL without trailing slashes, if one is set.
    pub fn base_url(&self) -> Option<String> {
        let url = self.base_url.trim().trim_end_matches('/');
        (!url.is_empty()).then(|| url.to_string())
    }
}
