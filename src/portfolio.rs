//! Portfolio metrics, allocation and rule-based recommendations.
//!
//! A pure function from a holdings snapshot to its analysis. Recommendation
//! rules use fixed thresholds:
//!
//! | Rule | Condition | Type | Priority |
//! |------|-----------|------|----------|
//! | Concentration | allocation > 25% | `rebalance` | high |
//! | Drawdown | P&L < -15% | `sell` | medium |
//! | Large gain | P&L > 20% | `hold` | low |
//! | Diversification | fewer than 5 holdings | `buy` | medium |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Allocation share above which a holding is flagged for rebalancing.
pub const CONCENTRATION_THRESHOLD_PCT: f64 = 25.0;
/// P&L below which a holding is flagged for review.
pub const DRAWDOWN_THRESHOLD_PCT: f64 = -15.0;
/// P&L above which taking partial profits is suggested.
pub const GAIN_THRESHOLD_PCT: f64 = 20.0;
/// Minimum number of holdings considered diversified.
pub const MIN_DIVERSIFIED_HOLDINGS: usize = 5;
/// Pseudo-symbol used for portfolio-wide suggestions.
pub const DIVERSIFY_SYMBOL: &str = "DIVERSIFY";

/// Portfolio validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// A holding has an empty symbol or a negative or non-finite amount.
    #[error("invalid holding {symbol}: {reason}")]
    InvalidHolding {
        /// Symbol of the offending holding.
        symbol: String,
        /// Description of the violation.
        reason: String,
    },
}

/// Asset class of a holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HoldingKind {
    /// Equity shares.
    #[default]
    Stock,
    /// Option contracts.
    Option,
}

/// Right of an option holding, in NSE notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OptionRight {
    /// Call option.
    #[serde(rename = "CE")]
    Call,
    /// Put option.
    #[serde(rename = "PE")]
    Put,
}

/// A position in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Holding {
    /// Client-side identifier.
    #[serde(default)]
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
    /// Option right, for option holdings.
    #[serde(default)]
    pub option_type: Option<OptionRight>,
    /// Option strike, for option holdings.
    #[serde(default)]
    pub strike: Option<f64>,
    /// Option expiry, for option holdings.
    #[serde(default)]
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

    /// Current value of the position.
    #[must_use]
    pub fn market_value(&self) -> f64 {
        self.current_price * self.shares
    }

    /// Amount originally invested.
    #[must_use]
    pub fn investment(&self) -> f64 {
        self.purchase_price * self.shares
    }

    /// Price change since purchase in percent; `None` for a zero purchase price.
    #[must_use]
    pub fn pnl_percentage(&self) -> Option<f64> {
        (self.purchase_price > 0.0)
            .then(|| (self.current_price - self.purchase_price) / self.purchase_price * 100.0)
    }

    /// Checks that the holding describes a real position.
    ///
    /// # Errors
    /// Returns [`PortfolioError::InvalidHolding`] for an empty symbol or a
    /// negative or non-finite share count or price.
    pub fn validate(&self) -> Result<(), PortfolioError> {
        let invalid = |reason: &str| PortfolioError::InvalidHolding {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };

        if self.symbol.trim().is_empty() {
            return Err(invalid("symbol cannot be empty"));
        }
        if !self.shares.is_finite() || self.shares < 0.0 {
            return Err(invalid("shares must be non-negative"));
        }
        if !self.current_price.is_finite() || self.current_price < 0.0 {
            return Err(invalid("current price must be non-negative"));
        }
        if !self.purchase_price.is_finite() || self.purchase_price < 0.0 {
            return Err(invalid("purchase price must be non-negative"));
        }
        Ok(())
    }
}

/// Aggregate portfolio figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioMetrics {
    /// Market value of all holdings.
    pub total_value: f64,
    /// Amount invested in all holdings.
    pub total_investment: f64,
    /// Unrealised profit or loss.
    pub total_pnl: f64,
    /// Unrealised P&L relative to the investment, in percent.
    pub total_pnl_percentage: f64,
}

/// Share of the portfolio held in one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AllocationEntry {
    /// Ticker symbol.
    pub symbol: String,
    /// Market value.
    pub value: f64,
    /// Percentage of the total market value.
    pub percentage: f64,
}

/// Suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    /// Suggested action.
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Symbol the recommendation refers to.
    pub symbol: String,
    /// Explanation shown to the user.
    pub reason: String,
    /// Urgency.
    pub priority: Priority,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioAnalysis {
    /// Aggregate figures.
    pub metrics: PortfolioMetrics,
    /// Allocation per holding, in input order.
    pub allocation: Vec<AllocationEntry>,
    /// Recommendations: concentration first, then per-holding P&L, then
    /// diversification.
    pub recommendations: Vec<Recommendation>,
}

/// Validates every holding.
///
/// # Errors
/// Returns the first [`PortfolioError`] encountered.
pub fn validate_holdings(holdings: &[Holding]) -> Result<(), PortfolioError> {
    holdings.iter().try_for_each(Holding::validate)
}

/// Computes metrics, allocation and recommendations for a snapshot.
#[must_use]
pub fn analyze(holdings: &[Holding]) -> PortfolioAnalysis {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();
    let total_investment: f64 = holdings.iter().map(Holding::investment).sum();
    let total_pnl = total_value - total_investment;
    let total_pnl_percentage = if total_investment > 0.0 {
        total_pnl / total_investment * 100.0
    } else {
        0.0
    };

    let allocation: Vec<AllocationEntry> = holdings
        .iter()
        .map(|holding| {
            let value = holding.market_value();
            AllocationEntry {
                symbol: holding.symbol.clone(),
                value,
                percentage: if total_value > 0.0 {
                    value / total_value * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    let recommendations = recommend(holdings, &allocation);

    PortfolioAnalysis {
        metrics: PortfolioMetrics {
            total_value,
            total_investment,
            total_pnl,
            total_pnl_percentage,
        },
        allocation,
        recommendations,
    }
}

fn recommend(holdings: &[Holding], allocation: &[AllocationEntry]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for entry in allocation {
        if entry.percentage > CONCENTRATION_THRESHOLD_PCT {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Rebalance,
                symbol: entry.symbol.clone(),
                reason: format!(
                    "{} represents {:.1}% of your portfolio. Consider reducing concentration risk by diversifying.",
                    entry.symbol, entry.percentage
                ),
                priority: Priority::High,
            });
        }
    }

    for holding in holdings {
        let Some(pnl) = holding.pnl_percentage() else {
            continue;
        };
        if pnl < DRAWDOWN_THRESHOLD_PCT {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Sell,
                symbol: holding.symbol.clone(),
                reason: format!(
                    "{} is down {:.1}%. Consider reviewing your investment thesis or setting a stop-loss.",
                    holding.symbol,
                    pnl.abs()
                ),
                priority: Priority::Medium,
            });
        } else if pnl > GAIN_THRESHOLD_PCT {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Hold,
                symbol: holding.symbol.clone(),
                reason: format!(
                    "{} is up {:.1}%. Consider taking partial profits or holding for long-term gains.",
                    holding.symbol, pnl
                ),
                priority: Priority::Low,
            });
        }
    }

    if holdings.len() < MIN_DIVERSIFIED_HOLDINGS {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Buy,
            symbol: DIVERSIFY_SYMBOL.to_string(),
            reason: format!(
                "Your portfolio has fewer than {} holdings. Consider adding more diversified investments to reduce risk.",
                MIN_DIVERSIFIED_HOLDINGS
            ),
            priority: Priority::Medium,
        });
    }

    recommendations
}
