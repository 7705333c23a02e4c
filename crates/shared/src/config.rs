//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Round-up service configuration.
    #[serde(default)]
    pub roundup: RoundupConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_shutdown_grace() -> u64 {
    10
}

/// Round-up history and summary settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundupConfig {
    /// Page size used when a history request omits `limit`.
    #[serde(default = "default_history_limit")]
    pub history_default_limit: u64,
    /// Upper bound for a history page.
    #[serde(default = "default_history_max_limit")]
    pub history_max_limit: u64,
    /// Period used when a summary request omits `days`.
    #[serde(default = "default_summary_days")]
    pub summary_default_days: i64,
}

impl Default for RoundupConfig {
    fn default() -> Self {
        Self {
            history_default_limit: default_history_limit(),
            history_max_limit: default_history_max_limit(),
            summary_default_days: default_summary_days(),
        }
    }
}

fn default_history_limit() -> u64 {
    50
}

fn default_history_max_limit() -> u64 {
    100
}

fn default_summary_days() -> i64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("UNTETHER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
