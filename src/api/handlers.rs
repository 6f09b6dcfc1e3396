//! API request handlers.

use crate::error::ApiError;
use crate::market_data::StockQuote;
use crate::models::{
    AnalyzePortfolioRequest, HealthResponse, OpenInterestQuery, OpenInterestResponse,
    PayoffRequest, PayoffResponse, StockDataRequest, StockDataResponse,
};
use crate::payoff::{OptionLeg, PriceSweep, compute_payoff};
use crate::portfolio::{PortfolioAnalysis, analyze, validate_holdings};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves the spot price for a generated sweep, plus chain strikes to
/// sample when the spot came from an option chain.
async fn resolve_spot(
    state: &AppState,
    legs: &[OptionLeg],
    underlying_price: Option<f64>,
    identifier: Option<&str>,
) -> Result<(f64, Vec<f64>), ApiError> {
    if let Some(price) = underlying_price {
        return Ok((price, Vec::new()));
    }

    if let Some(identifier) = identifier.map(str::trim).filter(|s| !s.is_empty()) {
        let snapshot = state.nse.fetch_option_chain(identifier).await?;
        return Ok((snapshot.underlying_value, snapshot.strikes()));
    }

    if legs.is_empty() {
        return Err(ApiError::InvalidRequest(
            "one of prices, underlying_price or identifier is required".to_string(),
        ));
    }

    let mean = legs.iter().map(OptionLeg::key_price).sum::<f64>() / legs.len() as f64;
    Ok((mean, Vec::new()))
}

/// Builds the price sweep for a builder request.
async fn strategy_sweep(
    state: &AppState,
    legs: &[OptionLeg],
    request: &PayoffRequest,
) -> Result<(PriceSweep, Option<f64>), ApiError> {
    if let Some(prices) = &request.prices {
        let mut points = prices.clone();
        points.extend(request.underlying_price);
        let sweep = PriceSweep::from_points(points)?
            .with_points_within(legs.iter().map(OptionLeg::key_price));
        return Ok((sweep, request.underlying_price));
    }

    let (spot, strikes) = resolve_spot(
        state,
        legs,
        request.underlying_price,
        request.identifier.as_deref(),
    )
    .await?;

    let sweep = PriceSweep::around(legs, spot, &state.config.payoff.sweep)?;
    Ok((sweep.with_points_within(strikes), Some(spot)))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Strategy Builder
// ============================================================================

/// Compute the expiry payoff of a multi-leg strategy.
///
/// The price sweep is taken from `prices` when given, otherwise it is
/// generated around `underlying_price`, the spot of `identifier`'s option
/// chain, or the mean key price of the legs, in that order.
#[utoipa::path(
    post,
    path = "/api/v1/builder",
    request_body = PayoffRequest,
    responses(
        (status = 200, description = "Payoff curve and analytics", body = PayoffResponse),
        (status = 400, description = "Invalid leg, lot size or sweep"),
        (status = 502, description = "Option chain could not be fetched")
    ),
    tag = "Builder"
)]
pub async fn build_payoff(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PayoffRequest>,
) -> Result<Json<PayoffResponse>, ApiError> {
    let lot_size = request
        .lot_size
        .unwrap_or(state.config.payoff.default_lot_size);
    let legs: Vec<OptionLeg> = request
        .legs
        .iter()
        .cloned()
        .map(OptionLeg::from)
        .collect();

    for (index, leg) in legs.iter().enumerate() {
        leg.validate(index)?;
    }

    let (sweep, underlying_price) = strategy_sweep(&state, &legs, &request).await?;
    let result = compute_payoff(&legs, &sweep, lot_size)?;

    debug!(
        "Built payoff for {} legs over {} prices",
        legs.len(),
        sweep.len()
    );

    Ok(Json(PayoffResponse::from_result(
        &result,
        underlying_price,
        lot_size,
    )))
}

// ============================================================================
// Open Interest
// ============================================================================

/// Get the option chain of an underlying with open-interest totals and
/// put-call ratio sentiment.
#[utoipa::path(
    get,
    path = "/api/v1/open-interest",
    params(
        ("identifier" = String, Query, description = "Underlying symbol, e.g. NIFTY"),
        ("expiry" = Option<String>, Query, description = "Comma-separated expiries to keep"),
        ("min_strike" = Option<f64>, Query, description = "Lowest strike to keep"),
        ("max_strike" = Option<f64>, Query, description = "Highest strike to keep")
    ),
    responses(
        (status = 200, description = "Filtered option chain", body = OpenInterestResponse),
        (status = 400, description = "Missing identifier or inverted strike range"),
        (status = 404, description = "No data for identifier"),
        (status = 502, description = "Option chain could not be fetched")
    ),
    tag = "Open Interest"
)]
pub async fn get_open_interest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OpenInterestQuery>,
) -> Result<Json<OpenInterestResponse>, ApiError> {
    let identifier = query
        .identifier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("identifier is required".to_string()))?;

    if let (Some(min), Some(max)) = (query.min_strike, query.max_strike)
        && min > max
    {
        return Err(ApiError::InvalidRequest(format!(
            "min_strike {} is above max_strike {}",
            min, max
        )));
    }

    let snapshot = state
        .nse
        .fetch_option_chain(identifier)
        .await?
        .with_expiries(&query.expiries())
        .with_strike_range(query.min_strike, query.max_strike);

    Ok(Json(OpenInterestResponse::from(snapshot)))
}

// ============================================================================
// Portfolio
// ============================================================================

/// Get quotes for several symbols.
///
/// Symbols that cannot be fetched are returned with zeroed figures and an
/// `error` message instead of failing the whole request.
#[utoipa::path(
    post,
    path = "/api/v1/portfolio/stock-data",
    request_body = StockDataRequest,
    responses(
        (status = 200, description = "Quotes in request order", body = StockDataResponse),
        (status = 400, description = "No symbols given"),
        (status = 503, description = "Quote provider not configured")
    ),
    tag = "Portfolio"
)]
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StockDataRequest>,
) -> Result<Json<StockDataResponse>, ApiError> {
    let symbols: Vec<String> = request
        .symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(ApiError::InvalidRequest(
            "symbols cannot be empty".to_string(),
        ));
    }
    if !state.quotes.is_configured() {
        return Err(ApiError::NotConfigured("ALPHA_VANTAGE_API_KEY".to_string()));
    }

    let quotes = join_all(symbols.iter().map(|symbol| {
        let state = Arc::clone(&state);
        async move {
            match state.quotes.global_quote(symbol).await {
                Ok(quote) => quote,
                Err(err) => {
                    warn!("Quote for {} unavailable: {}", symbol, err);
                    StockQuote::unavailable(symbol.as_str(), &err)
                }
            }
        }
    }))
    .await;

    info!("Fetched {} quotes", quotes.len());
    Ok(Json(StockDataResponse { quotes }))
}

/// Analyze a portfolio snapshot.
#[utoipa::path(
    post,
    path = "/api/v1/portfolio/analyze",
    request_body = AnalyzePortfolioRequest,
    responses(
        (status = 200, description = "Metrics, allocation and recommendations", body = PortfolioAnalysis),
        (status = 400, description = "Invalid holding")
    ),
    tag = "Portfolio"
)]
pub async fn analyze_portfolio(
    Json(request): Json<AnalyzePortfolioRequest>,
) -> Result<Json<PortfolioAnalysis>, ApiError> {
    validate_holdings(&request.holdings)?;
    Ok(Json(analyze(&request.holdings)))
}

/// Get the latest quote of a benchmark symbol.
#[utoipa::path(
    get,
    path = "/api/v1/portfolio/benchmark/{symbol}",
    params(
        ("symbol" = String, Path, description = "Benchmark ticker, e.g. SPY")
    ),
    responses(
        (status = 200, description = "Latest quote", body = StockQuote),
        (status = 404, description = "No data for symbol"),
        (status = 503, description = "Quote provider not configured")
    ),
    tag = "Portfolio"
)]
pub async fn get_benchmark(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<StockQuote>, ApiError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::InvalidRequest("symbol cannot be empty".to_string()));
    }
    Ok(Json(state.quotes.global_quote(&symbol).await?))
}
