//! Upstream market data: NSE option chains and equity quotes.
//!
//! These clients feed the payoff engine (underlying price, strike list) and
//! the portfolio endpoints. Upstream failures are retried a bounded number
//! of times and then surfaced to the caller.

mod alpha_vantage;
mod nse;
mod retry;

pub use alpha_vantage::{AlphaVantageClient, StockQuote, parse_global_quote};
pub use nse::{NseClient, NseOptionChain};
pub use retry::{RetryPolicy, with_retry};

use thiserror::Error;

/// Errors raised while talking to upstream data providers.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Response body did not have the expected shape.
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request parameters could not be encoded into a query string.
    #[error("failed to encode query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// Upstream has no data for the symbol.
    #[error("no data found for symbol: {0}")]
    NoData(String),

    /// The provider cannot be used with the current configuration.
    #[error("market data provider not configured: {0}")]
    NotConfigured(String),

    /// Every attempt failed.
    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: Box<MarketDataError>,
    },
}

impl MarketDataError {
    /// Returns `false` for errors a repeated request cannot fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Encode(_)
                | Self::NoData(_)
                | Self::NotConfigured(_)
                | Self::RetriesExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(
            MarketDataError::Status {
                status: 500,
                url: "u".to_string()
            }
            .is_retryable()
        );
        assert!(!MarketDataError::NoData("X".to_string()).is_retryable());
        assert!(!MarketDataError::NotConfigured("key".to_string()).is_retryable());
        assert!(
            !MarketDataError::Encode(serde_urlencoded::ser::Error::Custom("bad".into()))
                .is_retryable()
        );
    }

    #[test]
    fn test_retries_exhausted_display() {
        let error = MarketDataError::RetriesExhausted {
            attempts: 4,
            last: Box::new(MarketDataError::NoData("NIFTY".to_string())),
        };
        assert_eq!(
            error.to_string(),
            "giving up after 4 attempts: no data found for symbol: NIFTY"
        );
    }
}
