//! Configuration module for loading and parsing TOML configuration files.

use crate::payoff::SweepConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Payoff engine defaults.
    pub payoff: PayoffConfig,
    /// Option chain provider configuration.
    pub market_data: MarketDataConfig,
    /// Equity quote provider configuration.
    pub quotes: QuoteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6123,
        }
    }
}

/// Payoff computation defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Lot size used when a request does not specify one.
    pub default_lot_size: u32,
    /// Shape of the generated price sweep.
    pub sweep: SweepConfig,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            default_lot_size: 1,
            sweep: SweepConfig::default(),
        }
    }
}

/// NSE option chain provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Base URL of the exchange website.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after a failed option chain request.
    pub max_retries: u32,
    /// Pause between retries in milliseconds.
    pub retry_delay_ms: u64,
    /// Symbols served by the index option chain endpoint.
    pub index_symbols: Vec<String>,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nseindia.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36".to_string(),
            timeout_secs: 10,
            max_retries: 3,
            retry_delay_ms: 250,
            index_symbols: ["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Alpha Vantage quote provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Query endpoint.
    pub base_url: String,
    /// API key; quote endpoints answer 503 while it is unset.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co/query".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `HOST`, `PORT` and `ALPHA_VANTAGE_API_KEY` overrides.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a valid number: {}", port)))?;
        }
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY")
            && !key.trim().is_empty()
        {
            self.quotes.api_key = Some(key);
        }
        Ok(self)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.payoff.default_lot_size == 0 {
            return Err(ConfigError::InvalidValue(
                "payoff default_lot_size must be positive".to_string(),
            ));
        }
        if !self.payoff.sweep.padding_ratio.is_finite() || self.payoff.sweep.padding_ratio <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "payoff sweep padding_ratio must be positive".to_string(),
            ));
        }
        if self.payoff.sweep.points_per_side == 0 {
            return Err(ConfigError::InvalidValue(
                "payoff sweep points_per_side must be positive".to_string(),
            ));
        }
        if self.market_data.base_url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "market_data base_url cannot be empty".to_string(),
            ));
        }
        if self.market_data.timeout_secs == 0 || self.quotes.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeouts must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
