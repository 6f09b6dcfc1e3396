//! HTTP client for the strategy payoff API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use std::time::Duration;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:6123").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6123".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Strategy Payoff API.
#[derive(Debug, Clone)]
pub struct PayoffClient {
    client: Client,
    base_url: String,
}

impl PayoffClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        url::Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Strategy Builder
    // ========================================================================

    /// Computes the payoff of a strategy.
    ///
    /// # Errors
    /// Returns error if the request fails or a leg is rejected.
    pub async fn build_payoff(&self, request: &PayoffRequest) -> Result<PayoffResponse, Error> {
        let url = format!("{}/api/v1/builder", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Open Interest
    // ========================================================================

    /// Gets the filtered option chain of an underlying.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_open_interest(
        &self,
        query: &OpenInterestQuery,
    ) -> Result<OpenInterestResponse, Error> {
        let url = self.open_interest_url(query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Portfolio
    // ========================================================================

    /// Gets quotes for several symbols.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_stock_data(&self, symbols: &[&str]) -> Result<StockDataResponse, Error> {
        let url = format!("{}/api/v1/portfolio/stock-data", self.base_url);
        let request = StockDataRequest {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        };
        let resp = self.client.post(&url).json(&request).send().await?;
        self.handle_response(resp).await
    }

    /// Analyzes a portfolio.
    ///
    /// # Errors
    /// Returns error if the request fails or a holding is rejected.
    pub async fn analyze_portfolio(&self, holdings: &[Holding]) -> Result<PortfolioAnalysis, Error> {
        let url = format!("{}/api/v1/portfolio/analyze", self.base_url);
        let request = AnalyzePortfolioRequest {
            holdings: holdings.to_vec(),
        };
        let resp = self.client.post(&url).json(&request).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the latest quote of a benchmark symbol.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_benchmark(&self, symbol: &str) -> Result<StockQuote, Error> {
        let url = format!("{}/api/v1/portfolio/benchmark/{}", self.base_url, symbol);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn open_interest_url(&self, query: &OpenInterestQuery) -> Result<String, Error> {
        let mut url = format!("{}/api/v1/open-interest", self.base_url);
        let params = serde_urlencoded::to_string(query)?;
        if !params.is_empty() {
            url.push_str(&format!("?{}", params));
        }
        Ok(url)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::NotFound(text))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
