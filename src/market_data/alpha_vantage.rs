//! Alpha Vantage `GLOBAL_QUOTE` client.

use super::MarketDataError;
use crate::config::QuoteConfig;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use utoipa::ToSchema;

/// Latest quote for one equity symbol.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockQuote {
    /// Ticker symbol.
    pub symbol: String,
    /// Last price.
    pub price: f64,
    /// Absolute change since previous close.
    pub change: f64,
    /// Percentage change since previous close.
    pub change_percent: f64,
    /// Traded volume.
    pub volume: u64,
    /// Set when the quote could not be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StockQuote {
    /// Placeholder quote for a symbol that could not be fetched.
    #[must_use]
    pub fn unavailable(symbol: impl Into<String>, error: &MarketDataError) -> Self {
        Self {
            symbol: symbol.into(),
            price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            error: Some(error.to_string()),
        }
    }
}

fn field<'a>(quote: &'a Value, key: &str) -> Option<&'a str> {
    quote
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn number(quote: &Value, key: &str) -> f64 {
    field(quote, key)
        .map(|s| s.trim_end_matches('%'))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Extracts a [`StockQuote`] from a `GLOBAL_QUOTE` response body.
///
/// # Errors
/// Returns [`MarketDataError::NoData`] if the body has no usable quote,
/// which is how the provider reports unknown symbols and rate limiting.
pub fn parse_global_quote(symbol: &str, body: &Value) -> Result<StockQuote, MarketDataError> {
    let quote = body
        .get("Global Quote")
        .filter(|q| q.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

    let price = field(quote, "05. price")
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

    Ok(StockQuote {
        symbol: field(quote, "01. symbol").unwrap_or(symbol).to_string(),
        price,
        change: number(quote, "09. change"),
        change_percent: number(quote, "10. change percent"),
        volume: field(quote, "06. volume")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        error: None,
    })
}

/// Client for equity quotes.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &QuoteConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    /// Returns `true` if an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches the latest quote for `symbol`.
    ///
    /// # Errors
    /// Returns [`MarketDataError::NotConfigured`] without an API key, or the
    /// transport, status or decoding failure of the request.
    pub async fn global_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::NotConfigured("ALPHA_VANTAGE_API_KEY".to_string()))?;

        let query = serde_urlencoded::to_string([
            ("function", "GLOBAL_QUOTE"),
            ("symbol", symbol),
            ("apikey", api_key),
        ])?;
        let url = format!("{}?{}", self.base_url, query);

        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                status: resp.status().as_u16(),
                url: self.base_url.clone(),
            });
        }

        let body: Value = serde_json::from_str(&resp.text().await?)?;
        debug!("Received quote payload for {}", symbol);
        parse_global_quote(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_global_quote() {
        let body = json!({
            "Global Quote": {
                "01. symbol": "IBM",
                "05. price": "221.4700",
                "06. volume": "3456789",
                "09. change": "-1.2300",
                "10. change percent": "-0.5523%"
            }
        });

        let quote = parse_global_quote("IBM", &body).unwrap();
        assert_eq!(quote.symbol, "IBM");
        assert_eq!(quote.price, 221.47);
        assert_eq!(quote.change, -1.23);
        assert_eq!(quote.change_percent, -0.5523);
        assert_eq!(quote.volume, 3_456_789);
        assert!(quote.error.is_none());
    }

    #[test]
    fn test_parse_empty_quote_is_no_data() {
        let body = json!({ "Global Quote": {} });
        assert!(matches!(
            parse_global_quote("NOPE", &body),
            Err(MarketDataError::NoData(s)) if s == "NOPE"
        ));
    }

    #[test]
    fn test_parse_rate_limit_note_is_no_data() {
        let body = json!({ "Note": "Thank you for using Alpha Vantage!" });
        assert!(parse_global_quote("IBM", &body).is_err());
    }

    #[test]
    fn test_unavailable_quote_serialization() {
        let quote = StockQuote::unavailable("TCS", &MarketDataError::NoData("TCS".to_string()));
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["price"], 0.0);
        assert_eq!(json["error"], "no data found for symbol: TCS");
    }

    #[tokio::test]
    async fn test_global_quote_without_key() {
        let client = AlphaVantageClient::new(&QuoteConfig::default()).unwrap();
        assert!(!client.is_configured());
        let result = client.global_quote("IBM").await;
        assert!(matches!(result, Err(MarketDataError::NotConfigured(_))));
    }
}
