//! Request and response models for the REST API.

use crate::market_data::StockQuote;
use crate::open_interest::{ExpiryGroup, OiTotals, OptionChainSnapshot};
use crate::payoff::{InstrumentType, LegAction, OptionLeg, PayoffResult};
use crate::portfolio::Holding;
use crate::sentiment::SentimentReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Warning attached to payoffs whose legs expire on different dates.
pub const MIXED_EXPIRY_WARNING: &str =
    "Legs have different expiries; the payoff is evaluated at expiry for every leg and ignores time value left in later-dated legs";

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Strategy Builder Types
// ============================================================================

/// One leg of a strategy in a builder request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegRequest {
    /// `CALL`, `PUT`, `FUTURE` or `UNDERLYING` (`CE`, `PE` and `FUT` are accepted).
    #[schema(value_type = String, example = "CALL")]
    pub instrument_type: InstrumentType,
    /// `BUY` or `SELL`.
    #[schema(value_type = String, example = "BUY")]
    pub action: LegAction,
    /// Strike price, required for options.
    #[serde(default)]
    pub strike: Option<f64>,
    /// Premium per unit, or entry price for futures and the underlying.
    pub premium: f64,
    /// Number of lots.
    pub quantity: u32,
    /// Expiry, e.g. `28-Nov-2024`.
    #[serde(default)]
    pub expiry: Option<String>,
}

impl From<LegRequest> for OptionLeg {
    fn from(leg: LegRequest) -> Self {
        Self {
            instrument_type: leg.instrument_type,
            action: leg.action,
            strike: leg.strike,
            premium: leg.premium,
            quantity: leg.quantity,
            expiry: leg.expiry,
        }
    }
}

/// Request to compute a strategy payoff.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PayoffRequest {
    /// Strategy legs.
    #[serde(default)]
    pub legs: Vec<LegRequest>,
    /// Contract multiplier; the configured default when absent.
    #[serde(default)]
    pub lot_size: Option<u32>,
    /// Spot used to centre the price sweep.
    #[serde(default)]
    pub underlying_price: Option<f64>,
    /// Underlying whose option chain supplies spot and strikes when no spot is given.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Explicit sweep prices; overrides the generated sweep.
    #[serde(default)]
    pub prices: Option<Vec<f64>>,
}

/// One sample of the payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayoffPoint {
    /// Underlying price at expiry.
    pub price: f64,
    /// Strategy P&L at that price.
    pub pnl: f64,
}

/// Payoff curve and analytics.
///
/// Unbounded extremes are reported as `null` with the matching
/// `*_unbounded` flag set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoffResponse {
    /// Curve samples in ascending price order.
    pub points: Vec<PayoffPoint>,
    /// Breakeven prices.
    pub breakevens: Vec<f64>,
    /// Maximum profit, `null` when unbounded.
    pub max_profit: Option<f64>,
    /// Whether profit grows without limit.
    pub max_profit_unbounded: bool,
    /// Maximum loss, `null` when unbounded.
    pub max_loss: Option<f64>,
    /// Whether loss grows without limit.
    pub max_loss_unbounded: bool,
    /// Net premium; positive is a credit.
    pub net_premium: f64,
    /// Maximum profit over maximum loss, when both are bounded.
    pub risk_reward_ratio: Option<f64>,
    /// Spot used for the sweep, when known.
    pub underlying_price: Option<f64>,
    /// Lot size applied.
    pub lot_size: u32,
    /// Caveats about the result.
    pub warnings: Vec<String>,
}

impl PayoffResponse {
    /// Builds the response from an engine result.
    #[must_use]
    pub fn from_result(result: &PayoffResult, underlying_price: Option<f64>, lot_size: u32) -> Self {
        let mut warnings = Vec::new();
        if result.mixed_expiries {
            warnings.push(MIXED_EXPIRY_WARNING.to_string());
        }

        Self {
            points: result
                .points()
                .map(|(price, pnl)| PayoffPoint { price, pnl })
                .collect(),
            breakevens: result.breakevens.clone(),
            max_profit: result.max_profit.value(),
            max_profit_unbounded: result.max_profit.is_unbounded(),
            max_loss: result.max_loss.value(),
            max_loss_unbounded: result.max_loss.is_unbounded(),
            net_premium: result.net_premium,
            risk_reward_ratio: result.risk_reward_ratio(),
            underlying_price,
            lot_size,
            warnings,
        }
    }
}

// ============================================================================
// Open Interest Types
// ============================================================================

/// Query parameters for the open-interest endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OpenInterestQuery {
    /// Underlying symbol, e.g. `NIFTY`.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Comma-separated expiries to keep.
    #[serde(default)]
    pub expiry: Option<String>,
    /// Lowest strike to keep.
    #[serde(default)]
    pub min_strike: Option<f64>,
    /// Highest strike to keep.
    #[serde(default)]
    pub max_strike: Option<f64>,
}

impl OpenInterestQuery {
    /// Expiries listed in the `expiry` parameter.
    #[must_use]
    pub fn expiries(&self) -> Vec<String> {
        self.expiry
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Filtered option chain with open-interest analytics.
#[derive(Debug, Serialize, ToSchema)]
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
    /// Put-call ratio reading, absent when the ratio is undefined.
    pub sentiment: Option<SentimentReport>,
}

impl From<OptionChainSnapshot> for OpenInterestResponse {
    fn from(snapshot: OptionChainSnapshot) -> Self {
        let totals = snapshot.totals();
        Self {
            strikes: snapshot.strikes(),
            groups: snapshot.group_by_expiry(),
            sentiment: SentimentReport::from_totals(&totals),
            totals,
            identifier: snapshot.identifier,
            underlying_value: snapshot.underlying_value,
            timestamp: snapshot.timestamp,
            expiries: snapshot.expiries,
        }
    }
}

// ============================================================================
// Portfolio Types
// ============================================================================

/// Request for quotes of several symbols.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockDataRequest {
    /// Ticker symbols.
    pub symbols: Vec<String>,
}

/// Quotes in request order.
#[derive(Debug, Serialize, ToSchema)]
pub struct StockDataResponse {
    /// One quote per requested symbol.
    pub quotes: Vec<StockQuote>,
}

/// Request to analyze a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzePortfolioRequest {
    /// Holdings to analyze.
    pub holdings: Vec<Holding>,
}
