//! Request and response types for the strategy payoff API.

use serde::{Deserialize, Serialize};


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code, e.g. `INVALID_LEG`.
    pub code: String,
}

// ============================================================================
// Strategy Builder
// ============================================================================

/// Kind of instrument a leg holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentType {
    /// Call option.
    #[serde(alias = "CE")]
    Call,
    /// Put option.
    #[serde(alias = "PE")]
    Put,
    /// Future.
    #[serde(alias = "FUT")]
    Future,
    /// The underlying itself.
    Underlying,
}

/// Direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegAction {
    /// Long.
    Buy,
    /// Short.
    Sell,
}

/// One leg of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Instrument held by this leg.
    pub instrument_type: InstrumentType,
    /// Long or short.
    pub action: LegAction,
    /// Strike price, required for options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    /// Premium per unit, or entry price for futures and the underlying.
    pub premium: f64,
    /// Number of lots.
    pub quantity: u32,
    /// Expiry, e.g. `28-Nov-2024`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl Leg {
    /// Creates a call leg.
    #[must_use]
    pub fn call(action: LegAction, strike: f64, premium: f64, quantity: u32) -> Self {
        Self {
            instrument_type: InstrumentType::Call,
            action,
            strike: Some(strike),
            premium,
            quantity,
            expiry: None,
        }
    }

    /// Creates a put leg.
    #[must_use]
    pub fn put(action: LegAction, strike: f64, premium: f64, quantity: u32) -> Self {
        Self {
            instrument_type: InstrumentType::Put,
            action,
            strike: Some(strike),
            premium,
            quantity,
            expiry: None,
        }
    }

    /// Creates a futures leg entered at `entry_price`.
    #[must_use]
    pub fn future(action: LegAction, entry_price: f64, quantity: u32) -> Self {
        Self {
            instrument_type: InstrumentType::Future,
            action,
            strike: None,
            premium: entry_price,
            quantity,
            expiry: None,
        }
    }

    /// Sets the expiry.
    #[must_use]
    pub fn with_expiry(mut self, expiry: &str) -> Self {
        self.expiry = Some(expiry.to_string());
        self
    }
}

/// Request to compute a strategy payoff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayoffRequest {
    /// Strategy legs.
    pub legs: Vec<Leg>,
    /// Contract multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<u32>,
    /// Spot used to centre the price sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_price: Option<f64>,
    /// Underlying whose option chain supplies spot and strikes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Explicit sweep prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<f64>>,
}

/// One sample of the payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    /// Underlying price at expiry.
    pub price: f64,
    /// Strategy P&L at that price.
    pub pnl: f64,
}

/// Payoff curve and analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffResponse {
    /// Curve samples in ascending price order.
    pub points: Vec<PayoffPoint>,
    /// Breakeven prices.
    pub breakevens: Vec<f64>,
    /// Maximum profit, `None` when unbounded.
    pub max_profit: Option<f64>,
    /// Whether profit grows without limit.
    pub max_profit_unbounded: bool,
    /// Maximum loss, `None` when unbounded.
    pub max_loss: Option<f64>,
    /// Whether loss grows without limit.
    pub max_loss_unbounded: bool,
    /// Net premium; positive is a credit.
    pub net_premium: f64,
    /// Maximum profit over maximum loss, when both are bounded.
    pub risk_reward_ratio: Option<f64>,
    /// Spot used for the sweep.
    pub underlying_price: Option<f64>,
    /// Lot size applied.
    pub lot_size: u32,
    /// Caveats about the result.
    pub warnings: Vec<String>,
}

// ============================================================================
// Open Interest
// ============================================================================

/// Query parameters for the open-interest endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenInterestQuery {
    /// Underlying symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Comma-separated expiries to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Lowest strike to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_strike: Option<f64>,
    /// Highest strike to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_strike: Option<f64>,
}

/// Market data for one side of a strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Outstanding contracts.
    pub open_interest: f64,
    /// Change in open interest.
    pub change_in_open_interest: f64,
    /// Implied volatility in percent.
    pub implied_volatility: f64,
    /// Last traded price.
    pub last_price: f64,
}

/// One strike of one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    /// Strike price.
    pub strike: f64,
    /// Expiry.
    pub expiry: String,
    /// Call side.
    pub call: Option<OptionQuote>,
    /// Put side.
    pub put: Option<OptionQuote>,
}

/// Rows sharing one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryGroup {
    /// Expiry.
    pub expiry: String,
    /// Rows sorted by strike.
    pub rows: Vec<StrikeRow>,
}

/// Open-interest totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OiTotals {
    /// Sum of call open interest.
    pub call_oi: f64,
    /// Sum of put open interest.
    pub put_oi: f64,
    /// Sum of call open-interest change.
    pub call_oi_change: f64,
    /// Sum of put open-interest change.
    pub put_oi_change: f64,
    /// Put-call ratio.
    pub pcr: Option<f64>,
}

/// Market sentiment inferred from the put-call ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More call activity.
    Bullish,
    /// Balanced activity.
    Neutral,
    /// More put activity.
    Bearish,
}

/// Sentiment summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Put-call ratio.
    pub pcr: f64,
    /// Bucketed sentiment.
    pub sentiment: Sentiment,
    /// Whether the ratio is in an extreme zone.
    pub extreme: bool,
    /// Human-readable reading.
    pub interpretation: String,
}

/// Filtered option chain with open-interest analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenInterestResponse {
    /// Underlying symbol.
    pub identifier: String,
    /// Spot of the underlying.
    pub underlying_value: f64,
    /// Exchange timestamp.
    pub timestamp: Option<String>,
    /// Expiries remaining after filtering.
    pub expiries: Vec<String>,
    /// Distinct strikes remaining after filtering.
    pub strikes: Vec<f64>,
    /// Rows grouped by expiry.
    pub groups: Vec<ExpiryGroup>,
    /// Open-interest totals.
    pub totals: OiTotals,
    /// Put-call ratio reading.
    pub sentiment: Option<SentimentReport>,
}

// ============================================================================
// Portfolio
// ============================================================================

/// Request for quotes of several symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDataRequest {
    /// Ticker symbols.
    pub symbols: Vec<String>,
}

/// Latest quote for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    #[serde(default)]
    pub error: Option<String>,
}

/// Quotes in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDataResponse {
    /// One quote per requested symbol.
    pub quotes: Vec<StockQuote>,
}

/// Asset class of a holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldingKind {
    /// Equity shares.
    #[default]
    Stock,
    /// Option contracts.
    Option,
}

/// Right of an option holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionRight {
    /// Call option.
    #[serde(rename = "CE")]
    Call,
    /// Put option.
    #[serde(rename = "PE")]
    Put,
}

/// A position in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Client-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Ticker symbol.
    pub symbol: String,
    /// Stock or option.
    #[serde(rename = "type", default)]
    pub kind: HoldingKind,
    /// Number of shares or contracts.
    pub shares: f64,
    /// Latest price per share.
    pub current_price: f64,
    /// Average purchase price per share.
    pub purchase_price: f64,
    /// Option right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_type: Option<OptionRight>,
    /// Option strike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    /// Option expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl Holding {
    /// Creates a stock holding.
    #[must_use]
    pub fn stock(symbol: &str, shares: f64, purchase_price: f64, current_price: f64) -> Self {
        Self {
            id: None,
            symbol: symbol.to_string(),
            kind: HoldingKind::Stock,
            shares,
            current_price,
            purchase_price,
            option_type: None,
            strike: None,
            expiry: None,
        }
    }
}

/// Request to analyze a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePortfolioRequest {
    /// Holdings to analyze.
    pub holdings: Vec<Holding>,
}

/// Aggregate portfolio figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Market value of all holdings.
    pub total_value: f64,
    /// Amount invested.
    pub total_investment: f64,
    /// Unrealised profit or loss.
    pub total_pnl: f64,
    /// Unrealised P&L in percent.
    pub total_pnl_percentage: f64,
}

/// Share of the portfolio held in one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Ticker symbol.
    pub symbol: String,
    /// Market value.
    pub value: f64,
    /// Percentage of the total market value.
    pub percentage: f64,
}

/// Suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Add a position.
    Buy,
    /// Reduce or exit a position.
    Sell,
    /// Keep a position.
    Hold,
    /// Reduce concentration.
    Rebalance,
}

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Needs attention now.
    High,
    /// Worth reviewing.
    Medium,
    /// Informational.
    Low,
}

/// A tagged textual recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Suggested action.
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Symbol the recommendation refers to.
    pub symbol: String,
    /// Explanation.
    pub reason: String,
    /// Urgency.
    pub priority: Priority,
}

/// Portfolio analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Aggregate figures.
    pub metrics: PortfolioMetrics,
    /// Allocation per holding.
    pub allocation: Vec<AllocationEntry>,
    /// Recommendations.
    pub recommendations: Vec<Recommendation>,
}
