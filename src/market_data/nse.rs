//! NSE option chain client.

use super::retry::{RetryPolicy, with_retry};
use super::MarketDataError;
use crate::config::MarketDataConfig;
use crate::open_interest::{OptionChainSnapshot, OptionQuote, StrikeRow};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Raw option chain payload.
#[derive(Debug, Deserialize)]
pub struct NseOptionChain {
    /// Unfiltered records for all expiries.
    pub records: NseRecords,
}

/// `records` section of the payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NseRecords {
    /// Listed expiries, nearest first.
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    /// One entry per strike and expiry.
    #[serde(default)]
    pub data: Vec<NseStrikeData>,
    /// Exchange timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Spot of the underlying.
    #[serde(default)]
    pub underlying_value: f64,
}

/// One strike of one expiry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NseStrikeData {
    /// Strike price.
    pub strike_price: f64,
    /// Expiry date.
    pub expiry_date: String,
    /// Call side.
    #[serde(rename = "CE", default)]
    pub ce: Option<NseOptionData>,
    /// Put side.
    #[serde(rename = "PE", default)]
    pub pe: Option<NseOptionData>,
}

/// One side of a strike.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NseOptionData {
    /// Open interest.
    #[serde(default)]
    pub open_interest: f64,
    /// Change in open interest.
    #[serde(default, rename = "changeinOpenInterest")]
    pub change_in_open_interest: f64,
    /// Implied volatility.
    #[serde(default)]
    pub implied_volatility: f64,
    /// Last traded price.
    #[serde(default)]
    pub last_price: f64,
}

impl From<NseOptionData> for OptionQuote {
    fn from(data: NseOptionData) -> Self {
        Self {
            open_interest: data.open_interest,
            change_in_open_interest: data.change_in_open_interest,
            implied_volatility: data.implied_volatility,
            last_price: data.last_price,
        }
    }
}

impl NseOptionChain {
    /// Converts the payload into a snapshot for `identifier`.
    #[must_use]
    pub fn into_snapshot(self, identifier: &str) -> OptionChainSnapshot {
        let records = self.records;
        OptionChainSnapshot {
            identifier: identifier.to_string(),
            underlying_value: records.underlying_value,
            timestamp: records.timestamp,
            expiries: records.expiry_dates,
            rows: records
                .data
                .into_iter()
                .map(|row| StrikeRow {
                    strike: row.strike_price,
                    expiry: row.expiry_date,
                    call: row.ce.map(OptionQuote::from),
                    put: row.pe.map(OptionQuote::from),
                })
                .collect(),
        }
    }
}

/// Client for the NSE option chain API.
///
/// The API rejects requests without the cookies the option chain web page
/// sets, so every fetch first loads that page. Cookies live in a jar shared
/// with the HTTP client and are refreshed by every response.
#[derive(Debug, Clone)]
pub struct NseClient {
    client: Client,
    cookies: Arc<Jar>,
    base_url: String,
    index_symbols: Vec<String>,
    retry: RetryPolicy,
}

impl NseClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            cookies,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            index_symbols: config
                .index_symbols
                .iter()
                .map(|s| s.to_uppercase())
                .collect(),
            retry: RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.retry_delay_ms),
            ),
        })
    }

    /// Returns `true` when `identifier` is served by the index endpoint.
    #[must_use]
    pub fn is_index(&self, identifier: &str) -> bool {
        self.index_symbols
            .iter()
            .any(|symbol| symbol.eq_ignore_ascii_case(identifier))
    }

    /// Returns `true` once the jar holds cookies for the NSE site.
    #[must_use]
    pub fn has_session(&self) -> bool {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| self.cookies.cookies(&url))
            .is_some()
    }

    /// Option chain URL for `identifier`.
    ///
    /// # Errors
    /// Returns [`MarketDataError::Encode`] if the symbol cannot be encoded.
    pub fn option_chain_url(&self, identifier: &str) -> Result<String, MarketDataError> {
        let kind = if self.is_index(identifier) {
            "indices"
        } else {
            "equities"
        };
        let query = serde_urlencoded::to_string([("symbol", identifier)])?;
        Ok(format!("{}/api/option-chain-{}?{}", self.base_url, kind, query))
    }

    /// Fetches and converts the option chain for `identifier`.
    ///
    /// # Errors
    /// Returns error if the session cookies cannot be obtained or every
    /// option chain attempt fails.
    pub async fn fetch_option_chain(
        &self,
        identifier: &str,
    ) -> Result<OptionChainSnapshot, MarketDataError> {
        let identifier = identifier.trim().to_uppercase();
        let url = self.option_chain_url(&identifier)?;
        self.warm_session().await?;

        let chain: NseOptionChain =
            with_retry(self.retry, "option chain request", || self.get_json(&url)).await?;

        let snapshot = chain.into_snapshot(&identifier);
        info!(
            "Fetched option chain for {}: {} rows, {} expiries",
            identifier,
            snapshot.rows.len(),
            snapshot.expiries.len()
        );
        Ok(snapshot)
    }

    async fn warm_session(&self) -> Result<(), MarketDataError> {
        let url = format!("{}/option-chain", self.base_url);
        let resp = self.client.get(&url).header(ACCEPT, "*/*").send().await?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        debug!("NSE session warmed, cookies present: {}", self.has_session());
        Ok(())
    }

    async fn get_json(&self, url: &str) -> Result<NseOptionChain, MarketDataError> {
        let resp = self.client.get(url).header(ACCEPT, "*/*").send().await?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "records": {
            "expiryDates": ["28-Nov-2024", "05-Dec-2024"],
            "timestamp": "22-Nov-2024 15:30:00",
            "underlyingValue": 23907.25,
            "strikePrices": [23800, 23900],
            "data": [
                {
                    "strikePrice": 23800,
                    "expiryDate": "28-Nov-2024",
                    "CE": {
                        "strikePrice": 23800,
                        "openInterest": 41250,
                        "changeinOpenInterest": 1200,
                        "impliedVolatility": 13.4,
                        "lastPrice": 212.3,
                        "underlying": "NIFTY"
                    },
                    "PE": {
                        "openInterest": 60210,
                        "changeinOpenInterest": -350,
                        "impliedVolatility": 14.1,
                        "lastPrice": 91.05
                    }
                },
                {
                    "strikePrice": 23900,
                    "expiryDate": "05-Dec-2024",
                    "PE": { "openInterest": 100 }
                }
            ]
        },
        "filtered": { "data": [] }
    }"#;

    fn client() -> NseClient {
        NseClient::new(&MarketDataConfig::default()).unwrap()
    }

    #[test]
    fn test_decode_option_chain() {
        let chain: NseOptionChain = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = chain.into_snapshot("NIFTY");

        assert_eq!(snapshot.identifier, "NIFTY");
        assert_eq!(snapshot.underlying_value, 23907.25);
        assert_eq!(snapshot.expiries.len(), 2);
        assert_eq!(snapshot.rows.len(), 2);

        let first = &snapshot.rows[0];
        assert_eq!(first.strike, 23800.0);
        let call = first.call.as_ref().unwrap();
        assert_eq!(call.open_interest, 41250.0);
        assert_eq!(call.change_in_open_interest, 1200.0);
        assert_eq!(first.put.as_ref().unwrap().change_in_open_interest, -350.0);

        let second = &snapshot.rows[1];
        assert!(second.call.is_none());
        assert_eq!(second.put.as_ref().unwrap().open_interest, 100.0);
        assert_eq!(second.put.as_ref().unwrap().last_price, 0.0);
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        assert!(serde_json::from_str::<NseOptionChain>("{}").is_err());
    }

    #[test]
    fn test_option_chain_url_for_index() {
        assert_eq!(
            client().option_chain_url("BANKNIFTY").unwrap(),
            "https://www.nseindia.com/api/option-chain-indices?symbol=BANKNIFTY"
        );
    }

    #[test]
    fn test_option_chain_url_for_equity() {
        assert_eq!(
            client().option_chain_url("M&M").unwrap(),
            "https://www.nseindia.com/api/option-chain-equities?symbol=M%26M"
        );
    }

    #[test]
    fn test_is_index_ignores_case() {
        assert!(client().is_index("nifty"));
        assert!(!client().is_index("RELIANCE"));
    }

    #[test]
    fn test_session_cookies_come_from_jar() {
        let nse = client();
        assert!(!nse.has_session());

        let page = Url::parse("https://www.nseindia.com/option-chain").unwrap();
        nse.cookies.add_cookie_str("nsit=abc123; Path=/; HttpOnly", &page);
        nse.cookies.add_cookie_str("nseappid=xyz; Path=/; Secure", &page);
        assert!(nse.has_session());

        let api = Url::parse(&nse.option_chain_url("NIFTY").unwrap()).unwrap();
        let header = nse.cookies.cookies(&api).unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("nsit=abc123"));
        assert!(header.contains("nseappid=xyz"));
    }

    #[test]
    fn test_clones_share_one_jar() {
        let nse = client();
        let copy = nse.clone();
        let page = Url::parse("https://www.nseindia.com/").unwrap();
        nse.cookies.add_cookie_str("nsit=abc123; Path=/", &page);
        assert!(copy.has_session());
    }
}
