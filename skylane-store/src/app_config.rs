use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inventory_server: ServerConfig,
    pub order_server: ServerConfig,
    pub database: DatabaseConfig,
    pub inventory_client: InventoryClientConfig,
    pub claim: ClaimConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// How the order service reaches the inventory service. The timeout is
/// the bound after which a claim call is treated as unreachable rather
/// than sold out.
#[derive(Debug, Deserialize, Clone)]
pub struct InventoryClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Retry bounds for the conditional claim write inside the inventory
/// service.
#[derive(Debug, Deserialize, Clone)]
pub struct ClaimConfig {
    #[serde(default = "default_claim_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_claim_attempts() -> u32 {
    4
}

fn default_base_backoff_ms() -> u64 {
    10
}

fn default_max_backoff_ms() -> u64 {
    80
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SKYLANE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
