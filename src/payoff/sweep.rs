//! Hypothetical underlying prices at which a strategy is evaluated.

use super::error::PayoffError;
use super::leg::OptionLeg;
use serde::Deserialize;

/// Controls how [`PriceSweep::around`] spreads points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Evenly spaced points added below the lowest and above the highest key price.
    pub points_per_side: usize,
    /// Width of each tail as a fraction of the highest reference price.
    pub padding_ratio: f64,
    /// Evenly spaced points between the lowest and highest key price.
    pub interior_points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            points_per_side: 20,
            padding_ratio: 0.10,
            interior_points: 50,
        }
    }
}

/// Ascending, duplicate-free sequence of non-negative prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSweep {
    prices: Vec<f64>,
}

impl PriceSweep {
    /// Builds a sweep from arbitrary points, sorting and deduplicating them.
    ///
    /// # Errors
    /// Returns [`PayoffError::InvalidSweepPoint`] for a negative or non-finite
    /// price and [`PayoffError::EmptySweep`] when fewer than two distinct
    /// prices remain.
    pub fn from_points(mut points: Vec<f64>) -> Result<Self, PayoffError> {
        if let Some(&bad) = points.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(PayoffError::InvalidSweepPoint(bad));
        }

        points.sort_by(f64::total_cmp);
        points.dedup();

        if points.len() < 2 {
            return Err(PayoffError::EmptySweep {
                points: points.len(),
            });
        }

        Ok(Self { prices: points })
    }

    /// Builds a sweep covering every leg's key price and the current
    /// underlying price, with tails on both sides so breakevens and the
    /// asymptotic behaviour are visible.
    ///
    /// # Arguments
    /// * `legs` - Strategy legs; their strikes (or entry prices) are included.
    /// * `underlying_price` - Current spot of the underlying.
    /// * `config` - Point density and tail width.
    ///
    /// # Errors
    /// Returns [`PayoffError::InvalidUnderlyingPrice`] when the spot is not
    /// positive, or [`PayoffError::EmptySweep`] when the configuration yields
    /// fewer than two points.
    pub fn around(
        legs: &[OptionLeg],
        underlying_price: f64,
        config: &SweepConfig,
    ) -> Result<Self, PayoffError> {
        if !underlying_price.is_finite() || underlying_price <= 0.0 {
            return Err(PayoffError::InvalidUnderlyingPrice(underlying_price));
        }

        let mut points: Vec<f64> = legs
            .iter()
            .map(OptionLeg::key_price)
            .filter(|p| p.is_finite() && *p > 0.0)
            .collect();
        points.push(underlying_price);

        let low = points.iter().copied().fold(f64::INFINITY, f64::min);
        let high = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if config.interior_points > 0 && high > low {
            let step = (high - low) / (config.interior_points + 1) as f64;
            points.extend((1..=config.interior_points).map(|k| low + k as f64 * step));
        }

        let padding = config.padding_ratio * high;
        if config.points_per_side > 0 && padding.is_finite() && padding > 0.0 {
            let step = padding / config.points_per_side as f64;
            for k in 1..=config.points_per_side {
                let offset = k as f64 * step;
                points.push((low - offset).max(0.0));
                points.push(high + offset);
            }
        }

        Self::from_points(points)
    }

    /// Returns this sweep with the given prices added wherever they fall
    /// inside its range. Points outside `[first, last]` are ignored.
    #[must_use]
    pub fn with_points_within(&self, extra: impl IntoIterator<Item = f64>) -> Self {
        let (low, high) = (self.first(), self.last());
        let mut prices = self.prices.clone();
        prices.extend(
            extra
                .into_iter()
                .filter(|p| p.is_finite() && (low..=high).contains(p)),
        );
        prices.sort_by(f64::total_cmp);
        prices.dedup();
        Self { prices }
    }

    /// Prices in ascending order.
    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always `false`; a sweep holds at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Lowest price.
    #[must_use]
    pub fn first(&self) -> f64 {
        self.prices[0]
    }

    /// Highest price.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}
