//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Which exchanges are polled is configurable; their URLs, the size threshold
//! and the bin width are fixed.

use crate::error::{DaemonError, DaemonResult};
use liqmap_connectors::{Exchange, ExchangeTable};
use std::env;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Scheduled loop and fetch configuration
    pub scheduler: SchedulerConfig,

    /// Exchanges polled each cycle, in polling order
    pub exchanges: Vec<Exchange>,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Scheduled loop configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether the background loop runs at all
    pub enabled: bool,
    /// Seconds between pipeline runs
    pub poll_interval_secs: u64,
    /// Per-exchange fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl SchedulerConfig {
    /// Interval between pipeline runs.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Per-exchange fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let api = Self::load_api_config()?;
        let scheduler = Self::load_scheduler_config()?;
        let exchanges = match env::var("LIQMAP_EXCHANGES") {
            Ok(val) => parse_exchanges(&val)?,
            Err(_) => Exchange::ALL.to_vec(),
        };

        Ok(Self {
            api,
            scheduler,
            exchanges,
            environment,
        })
    }

    /// Endpoint table for the configured exchanges.
    pub fn exchange_table(&self) -> ExchangeTable {
        ExchangeTable::for_exchanges(&self.exchanges)
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            scheduler: SchedulerConfig {
                enabled: false,
                poll_interval_secs: 1,
                fetch_timeout_secs: 1,
            },
            exchanges: Exchange::ALL.to_vec(),
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("LIQMAP_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid LIQMAP_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("LIQMAP_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("LIQMAP_API_PORT").unwrap_or_else(|_| "5000".to_string());

        let port = port_str
            .parse::<u16>()
            .map_err(|_| DaemonError::Config(format!("Invalid LIQMAP_API_PORT: {}", port_str)))?;

        Ok(ApiConfig { host, port })
    }

    fn load_scheduler_config() -> DaemonResult<SchedulerConfig> {
        let enabled = match env::var("LIQMAP_SCHEDULER_ENABLED") {
            Ok(val) => parse_bool(&val).ok_or_else(|| {
                DaemonError::Config(format!("Invalid LIQMAP_SCHEDULER_ENABLED: {}", val))
            })?,
            Err(_) => true,
        };

        let poll_interval_secs = Self::load_secs_env("LIQMAP_POLL_INTERVAL_SECS", 300)?;
        let fetch_timeout_secs = Self::load_secs_env("LIQMAP_FETCH_TIMEOUT_SECS", 5)?;

        Ok(SchedulerConfig {
            enabled,
            poll_interval_secs,
            fetch_timeout_secs,
        })
    }

    fn load_secs_env(key: &str, default: u64) -> DaemonResult<u64> {
        match env::var(key) {
            Ok(val) => match val.parse::<u64>() {
                Ok(0) => Err(DaemonError::Config(format!("{} must be positive", key))),
                Ok(secs) => Ok(secs),
                Err(_) => Err(DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            },
            Err(_) => Ok(default),
        }
    }
}

/// Parse a comma-separated exchange list. Duplicates are dropped, order kept.
fn parse_exchanges(value: &str) -> DaemonResult<Vec<Exchange>> {
    let mut exchanges = Vec::new();

    for name in value.split(',').filter(|name| !name.trim().is_empty()) {
        let exchange: Exchange = name
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid LIQMAP_EXCHANGES: {}", e)))?;
        if !exchanges.contains(&exchange) {
            exchanges.push(exchange);
        }
    }

    if exchanges.is_empty() {
        return Err(DaemonError::Config(
            "LIQMAP_EXCHANGES must name at least one exchange".to_string(),
        ));
    }

    Ok(exchanges)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            scheduler: SchedulerConfig {
                enabled: true,
                poll_interval_secs: 300,
                fetch_timeout_secs: 5,
            },
            exchanges: Exchange::ALL.to_vec(),
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
