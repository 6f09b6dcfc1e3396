//! Aggregate P&L curve, breakevens and extremes of a multi-leg strategy.

use super::error::PayoffError;
use super::leg::OptionLeg;
use super::sweep::PriceSweep;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Best or worst outcome of a strategy at expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extremum {
    /// Finite extremum, in the same currency units as the P&L curve.
    Bounded(f64),
    /// The payoff grows without limit as the underlying rises.
    Unbounded,
}

impl Extremum {
    /// Finite value, `None` when unbounded.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Bounded(value) => Some(value),
            Self::Unbounded => None,
        }
    }

    /// Returns `true` for [`Extremum::Unbounded`].
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Payoff of a strategy across a price sweep.
///
/// A derived value: recomputed from the legs on every edit and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    /// Sweep prices, ascending.
    pub prices: Vec<f64>,
    /// Aggregate P&L at each price.
    pub pnl: Vec<f64>,
    /// Prices where the P&L crosses or touches zero.
    pub breakevens: Vec<f64>,
    /// Maximum profit at expiry.
    pub max_profit: Extremum,
    /// Maximum loss at expiry (a non-positive number when bounded).
    pub max_loss: Extremum,
    /// Net cash flow at entry; positive means a net credit.
    pub net_premium: f64,
    /// The legs reference more than one expiry, so the curve ignores the
    /// time value left in the later-dated legs.
    pub mixed_expiries: bool,
}

impl PayoffResult {
    fn flat(sweep: &PriceSweep) -> Self {
        Self {
            prices: sweep.prices().to_vec(),
            pnl: vec![0.0; sweep.len()],
            breakevens: Vec::new(),
            max_profit: Extremum::Bounded(0.0),
            max_loss: Extremum::Bounded(0.0),
            net_premium: 0.0,
            mixed_expiries: false,
        }
    }

    /// `(price, pnl)` pairs in sweep order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.prices.iter().copied().zip(self.pnl.iter().copied())
    }

    /// Maximum profit divided by the magnitude of the maximum loss.
    ///
    /// `None` when either side is unbounded or the strategy cannot lose.
    #[must_use]
    pub fn risk_reward_ratio(&self) -> Option<f64> {
        match (self.max_profit, self.max_loss) {
            (Extremum::Bounded(profit), Extremum::Bounded(loss)) if loss < 0.0 => {
                Some(profit / loss.abs())
            }
            _ => None,
        }
    }
}

/// P&L of a single leg at expiry for the given underlying price.
#[must_use]
pub fn leg_payoff(leg: &OptionLeg, price: f64, lot_size: u32) -> f64 {
    leg.pnl_at(price, lot_size)
}

/// Sum of [`leg_payoff`] over all legs at one price.
#[must_use]
pub fn aggregate_payoff(legs: &[OptionLeg], price: f64, lot_size: u32) -> f64 {
    legs.iter().map(|leg| leg_payoff(leg, price, lot_size)).sum()
}

/// Computes the payoff curve and its analytics.
///
/// Every leg is validated before any arithmetic takes place. An empty
/// strategy yields a flat zero curve so callers can render an empty chart.
///
/// # Arguments
/// * `legs` - Strategy legs, in display order.
/// * `sweep` - Prices at which the curve is evaluated.
/// * `lot_size` - Contract multiplier applied to every leg's quantity.
///
/// # Errors
/// Returns [`PayoffError::InvalidLotSize`] for a zero lot size and
/// [`PayoffError::InvalidLeg`] for the first leg violating its contract.
pub fn compute_payoff(
    legs: &[OptionLeg],
    sweep: &PriceSweep,
    lot_size: u32,
) -> Result<PayoffResult, PayoffError> {
    if lot_size == 0 {
        return Err(PayoffError::InvalidLotSize);
    }

    for (index, leg) in legs.iter().enumerate() {
        leg.validate(index)?;
    }

    if legs.is_empty() {
        return Ok(PayoffResult::flat(sweep));
    }

    // Kinks inside the range must be sampled or interpolation cuts across them.
    let prices = sweep
        .with_points_within(legs.iter().map(OptionLeg::key_price))
        .prices()
        .to_vec();
    let pnl: Vec<f64> = prices
        .iter()
        .map(|&price| aggregate_payoff(legs, price, lot_size))
        .collect();

    let breakevens = find_breakevens(&prices, &pnl);
    let (max_profit, max_loss) = extremes(legs, &pnl, lot_size);
    let net_premium = legs.iter().map(|leg| leg.net_premium(lot_size)).sum();
    let mixed_expiries = has_mixed_expiries(legs);

    debug!(
        "payoff over {} points for {} legs: {} breakevens, max_profit={:?}, max_loss={:?}",
        prices.len(),
        legs.len(),
        breakevens.len(),
        max_profit,
        max_loss
    );

    Ok(PayoffResult {
        prices,
        pnl,
        breakevens,
        max_profit,
        max_loss,
        net_premium,
        mixed_expiries,
    })
}

/// Finds the prices where a sampled P&L curve reaches zero.
///
/// A sign change between two samples is located by linear interpolation.
/// A sample that is exactly zero is reported as-is; a run of consecutive
/// zero samples is reported by its first and last price only.
#[must_use]
pub fn find_breakevens(prices: &[f64], pnl: &[f64]) -> Vec<f64> {
    let n = prices.len().min(pnl.len());
    let mut breakevens = Vec::new();
    let mut i = 0;

    while i < n {
        if pnl[i] == 0.0 {
            let start = i;
            while i + 1 < n && pnl[i + 1] == 0.0 {
                i += 1;
            }
            breakevens.push(prices[start]);
            if i > start {
                breakevens.push(prices[i]);
            }
            i += 1;
            continue;
        }

        if i + 1 < n {
            let (current, next) = (pnl[i], pnl[i + 1]);
            // An exact zero at `next` is reported on the following iteration.
            if next != 0.0 && (current < 0.0) != (next < 0.0) {
                let width = prices[i + 1] - prices[i];
                breakevens.push(prices[i] + width * (0.0 - current) / (next - current));
            }
        }
        i += 1;
    }

    breakevens
}

/// Maximum profit and loss, accounting for the tails outside the sweep.
///
/// Above the highest key price the payoff is linear with the net upside
/// slope, so a positive slope makes the profit unbounded and a negative one
/// the loss. Below the lowest key price the payoff is linear down to a zero
/// underlying price, where it is evaluated exactly.
fn extremes(legs: &[OptionLeg], pnl: &[f64], lot_size: u32) -> (Extremum, Extremum) {
    let mut candidates: Vec<f64> = pnl.to_vec();
    candidates.extend(
        legs.iter()
            .map(|leg| aggregate_payoff(legs, leg.key_price(), lot_size)),
    );

    let downside_slope: f64 = legs.iter().map(|leg| leg.downside_slope(lot_size)).sum();
    if downside_slope != 0.0 {
        candidates.push(aggregate_payoff(legs, 0.0, lot_size));
    }

    let highest = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = candidates.iter().copied().fold(f64::INFINITY, f64::min);

    let upside_slope: f64 = legs.iter().map(|leg| leg.upside_slope(lot_size)).sum();
    let max_profit = if upside_slope > 0.0 {
        Extremum::Unbounded
    } else {
        Extremum::Bounded(highest)
    };
    let max_loss = if upside_slope < 0.0 {
        Extremum::Unbounded
    } else {
        Extremum::Bounded(lowest)
    };

    (max_profit, max_loss)
}

fn has_mixed_expiries(legs: &[OptionLeg]) -> bool {
    let expiries: BTreeSet<&str> = legs
        .iter()
        .filter_map(|leg| leg.expiry.as_deref())
        .filter(|expiry| !expiry.is_empty())
        .collect();
    expiries.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::{LegAction, SweepConfig};

    fn grid(low: f64, high: f64, step: f64) -> PriceSweep {
        let count = ((high - low) / step).round() as usize;
        let points = (0..=count).map(|k| low + k as f64 * step).collect();
        PriceSweep::from_points(points).unwrap()
    }

    // ========================================================================
    // Per-leg payoff
    // ========================================================================

    #[test]
    fn test_long_call_at_strike_loses_exactly_the_premium() {
        let leg = OptionLeg::call(LegAction::Buy, 100.0, 5.0, 3);
        assert_eq!(leg_payoff(&leg, 100.0, 25), -5.0 * 3.0 * 25.0);
    }

    #[test]
    fn test_put_at_strike_has_no_intrinsic() {
        let leg = OptionLeg::put(LegAction::Sell, 100.0, 4.0, 1);
        assert_eq!(leg_payoff(&leg, 100.0, 1), 4.0);
    }

    // ========================================================================
    // Curve shape
    // ========================================================================

    #[test]
    fn test_straddle_minimum_at_strike() {
        let legs = vec![
            OptionLeg::call(LegAction::Buy, 100.0, 5.0, 2),
            OptionLeg::put(LegAction::Buy, 100.0, 5.0, 2),
        ];
        let sweep = PriceSweep::around(&legs, 100.0, &SweepConfig::default()).unwrap();
        let result = compute_payoff(&legs, &sweep, 10).unwrap();

        let (min_index, min_value) = result
            .pnl
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(min_value, -2.0 * 5.0 * 2.0 * 10.0);
        assert_eq!(result.prices[min_index], 100.0);

        // V shape: symmetric distances from the strike give equal P&L.
        assert_eq!(aggregate_payoff(&legs, 90.0, 10), aggregate_payoff(&legs, 110.0, 10));
        assert_eq!(result.max_profit, Extremum::Unbounded);
        assert_eq!(result.max_loss, Extremum::Bounded(-200.0));
    }

    #[test]
    fn test_deep_itm_call_is_monotonic() {
        let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
        let sweep = grid(100.0, 200.0, 5.0);
        let result = compute_payoff(&legs, &sweep, 1).unwrap();
        assert!(result.pnl.windows(2).all(|w| w[1] > w[0]));
    }

    // ========================================================================
    // Breakevens
    // ========================================================================

    #[test]
    fn test_long_call_breakeven() {
        let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
        let sweep = grid(80.0, 120.0, 3.0);
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.breakevens.len(), 1);
        assert!((result.breakevens[0] - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_key_prices_missing_from_sweep_are_sampled() {
        let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
        let sweep = PriceSweep::from_points(vec![80.0, 90.0, 110.0, 120.0]).unwrap();
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.prices, vec![80.0, 90.0, 100.0, 110.0, 120.0]);
        assert_eq!(result.breakevens.len(), 1);
        assert!((result.breakevens[0] - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakeven_on_exact_grid_point_is_not_duplicated() {
        let prices = [100.0, 105.0, 110.0];
        let pnl = [-5.0, 0.0, 5.0];
        assert_eq!(find_breakevens(&prices, &pnl), vec![105.0]);
    }

    #[test]
    fn test_breakeven_zero_run_reports_edges() {
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        let pnl = [-1.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(find_breakevens(&prices, &pnl), vec![2.0, 4.0]);
    }

    #[test]
    fn test_breakeven_trailing_zero() {
        let prices = [1.0, 2.0];
        let pnl = [-1.0, 0.0];
        assert_eq!(find_breakevens(&prices, &pnl), vec![2.0]);
    }

    #[test]
    fn test_straddle_has_two_breakevens() {
        let legs = vec![
            OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1),
            OptionLeg::put(LegAction::Buy, 100.0, 5.0, 1),
        ];
        let sweep = grid(70.0, 130.0, 4.0);
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.breakevens.len(), 2);
        assert!((result.breakevens[0] - 90.0).abs() < 1e-9);
        assert!((result.breakevens[1] - 110.0).abs() < 1e-9);
    }

    // ========================================================================
    // Extremes
    // ========================================================================

    #[test]
    fn test_naked_long_call_unbounded_profit() {
        let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
        let sweep = PriceSweep::around(&legs, 100.0, &SweepConfig::default()).unwrap();
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.max_profit, Extremum::Unbounded);
        assert_eq!(result.max_loss, Extremum::Bounded(-5.0));
        assert_eq!(result.risk_reward_ratio(), None);
    }

    #[test]
    fn test_naked_short_call_unbounded_loss() {
        let legs = vec![OptionLeg::call(LegAction::Sell, 100.0, 5.0, 1)];
        let sweep = PriceSweep::around(&legs, 100.0, &SweepConfig::default()).unwrap();
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.max_loss, Extremum::Unbounded);
        assert_eq!(result.max_profit, Extremum::Bounded(5.0));
        assert_eq!(result.net_premium, 5.0);
    }

    #[test]
    fn test_bear_put_spread_bounded_both_sides() {
        let legs = vec![
            OptionLeg::put(LegAction::Buy, 100.0, 8.0, 1),
            OptionLeg::put(LegAction::Sell, 90.0, 3.0, 1),
        ];
        let sweep = PriceSweep::around(&legs, 95.0, &SweepConfig::default()).unwrap();
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.max_loss, Extremum::Bounded(-5.0));
        assert_eq!(result.max_profit, Extremum::Bounded(5.0));
        assert_eq!(result.net_premium, -5.0);
        assert_eq!(result.risk_reward_ratio(), Some(1.0));
        assert_eq!(result.breakevens.len(), 1);
        assert!((result.breakevens[0] - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_put_loss_is_floored_at_zero_price() {
        let legs = vec![OptionLeg::put(LegAction::Sell, 100.0, 5.0, 1)];
        // The sweep stops well above zero; the loss still reflects a zero spot.
        let sweep = grid(90.0, 110.0, 5.0);
        let result = compute_payoff(&legs, &sweep, 2).unwrap();

        assert_eq!(result.max_profit, Extremum::Bounded(10.0));
        assert_eq!(result.max_loss, Extremum::Bounded(-190.0));
    }

    #[test]
    fn test_covered_call_caps_upside() {
        let legs = vec![
            OptionLeg::future(LegAction::Buy, 100.0, 1),
            OptionLeg::call(LegAction::Sell, 110.0, 4.0, 1),
        ];
        let sweep = PriceSweep::around(&legs, 100.0, &SweepConfig::default()).unwrap();
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        let max_profit = result.max_profit.value().unwrap();
        assert!((max_profit - 14.0).abs() < 1e-9);
        assert_eq!(result.max_loss, Extremum::Bounded(-96.0));
    }

    #[test]
    fn test_extremes_found_outside_explicit_sweep() {
        let legs = vec![OptionLeg::call(LegAction::Sell, 100.0, 5.0, 1)];
        let sweep = grid(50.0, 60.0, 5.0);
        let result = compute_payoff(&legs, &sweep, 1).unwrap();

        assert_eq!(result.max_profit, Extremum::Bounded(5.0));
        assert_eq!(result.max_loss, Extremum::Unbounded);
    }

    // ========================================================================
    // Contract and edge cases
    // ========================================================================

    #[test]
    fn test_empty_strategy_is_flat_zero() {
        let sweep = grid(90.0, 110.0, 5.0);
        let result = compute_payoff(&[], &sweep, 1).unwrap();

        assert_eq!(result.prices.len(), result.pnl.len());
        assert!(result.pnl.iter().all(|&v| v == 0.0));
        assert!(result.breakevens.is_empty());
        assert_eq!(result.max_profit, Extremum::Bounded(0.0));
        assert_eq!(result.max_loss, Extremum::Bounded(0.0));
        assert_eq!(result.net_premium, 0.0);
    }

    #[test]
    fn test_invalid_leg_fails_fast() {
        let legs = vec![
            OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1),
            OptionLeg::call(LegAction::Buy, 100.0, 5.0, 0),
        ];
        let sweep = grid(90.0, 110.0, 5.0);
        assert!(matches!(
            compute_payoff(&legs, &sweep, 1),
            Err(PayoffError::InvalidLeg { index: 1, .. })
        ));
    }

    #[test]
    fn test_zero_lot_size_rejected() {
        let sweep = grid(90.0, 110.0, 5.0);
        assert_eq!(
            compute_payoff(&[], &sweep, 0),
            Err(PayoffError::InvalidLotSize)
        );
    }

    #[test]
    fn test_identical_inputs_give_identical_output() {
        let legs = vec![
            OptionLeg::call(LegAction::Buy, 22000.0, 151.3, 1),
            OptionLeg::call(LegAction::Sell, 22300.0, 61.7, 2),
            OptionLeg::put(LegAction::Buy, 21700.0, 88.05, 1),
        ];
        let original = legs.clone();
        let sweep = PriceSweep::around(&legs, 22050.0, &SweepConfig::default()).unwrap();

        let first = compute_payoff(&legs, &sweep, 75).unwrap();
        let second = compute_payoff(&legs, &sweep, 75).unwrap();

        let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first.pnl), bits(&second.pnl));
        assert_eq!(bits(&first.breakevens), bits(&second.breakevens));
        assert_eq!(first, second);
        assert_eq!(legs, original);
    }

    #[test]
    fn test_mixed_expiries_flagged() {
        let legs = vec![
            OptionLeg::call(LegAction::Sell, 100.0, 3.0, 1).with_expiry("28-Nov-2024"),
            OptionLeg::call(LegAction::Buy, 100.0, 6.0, 1).with_expiry("26-Dec-2024"),
        ];
        let sweep = grid(90.0, 110.0, 5.0);
        assert!(compute_payoff(&legs, &sweep, 1).unwrap().mixed_expiries);

        let same = vec![
            OptionLeg::call(LegAction::Sell, 105.0, 3.0, 1).with_expiry("28-Nov-2024"),
            OptionLeg::call(LegAction::Buy, 100.0, 6.0, 1).with_expiry("28-Nov-2024"),
        ];
        assert!(!compute_payoff(&same, &sweep, 1).unwrap().mixed_expiries);
    }

    #[test]
    fn test_points_pairs_prices_with_pnl() {
        let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
        let sweep = grid(95.0, 105.0, 5.0);
        let result = compute_payoff(&legs, &sweep, 1).unwrap();
        let points: Vec<(f64, f64)> = result.points().collect();
        assert_eq!(points, vec![(95.0, -5.0), (100.0, -5.0), (105.0, 0.0)]);
    }
}
