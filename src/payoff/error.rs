//! Error types for the payoff engine.

use thiserror::Error;

/// Errors raised while validating payoff inputs.
///
/// All of them are caller contract violations detected before any P&L is
/// computed, so a caller never receives a partial curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayoffError {
    /// A leg carries a non-positive strike, zero quantity or negative premium.
    #[error("invalid leg at index {index}: {reason}")]
    InvalidLeg {
        /// Position of the offending leg in the strategy.
        index: usize,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// The price sweep has fewer than two distinct points.
    #[error("price sweep needs at least 2 distinct points, got {points}")]
    EmptySweep {
        /// Number of distinct points that were supplied.
        points: usize,
    },

    /// A sweep price is negative or not finite.
    #[error("invalid sweep price: {0}")]
    InvalidSweepPoint(f64),

    /// The underlying price used to centre a sweep is not positive.
    #[error("underlying price must be positive and finite, got {0}")]
    InvalidUnderlyingPrice(f64),

    /// Lot size must be at least one.
    #[error("lot size must be at least 1")]
    InvalidLotSize,
}
