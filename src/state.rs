//! Application state management.

use crate::config::Config;
use crate::market_data::{AlphaVantageClient, MarketDataError, NseClient};
use tracing::{info, warn};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Option chain provider.
    pub nse: NseClient,
    /// Equity quote provider.
    pub quotes: AlphaVantageClient,
}

impl AppState {
    /// Creates the application state from configuration.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self, MarketDataError> {
        let nse = NseClient::new(&config.market_data)?;
        let quotes = AlphaVantageClient::new(&config.quotes)?;

        info!(
            "Option chain provider: {} ({} index symbols)",
            config.market_data.base_url,
            config.market_data.index_symbols.len()
        );
        if !quotes.is_configured() {
            warn!("ALPHA_VANTAGE_API_KEY not set; quote endpoints will answer 503");
        }

        Ok(Self {
            config,
            nse,
            quotes,
        })
    }

    /// Creates the application state with default configuration.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be built.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::from_config(Config::default())
    }
}
