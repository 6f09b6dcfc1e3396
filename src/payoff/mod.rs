//! Option strategy payoff engine.
//!
//! Maps a list of option, future or underlying legs plus a sweep of
//! hypothetical underlying prices onto a P&L curve at expiry, together with
//! breakevens, maximum profit and loss (with unbounded tails detected from
//! the net slope beyond the sweep) and the net premium.
//!
//! The engine is pure and synchronous: no I/O, no shared state, no caching.
//! Premiums are inputs; no pricing model is involved.
//!
//! ```
//! use strategy_payoff_backend::payoff::{
//!     compute_payoff, Extremum, LegAction, OptionLeg, PriceSweep, SweepConfig,
//! };
//!
//! let legs = vec![OptionLeg::call(LegAction::Buy, 100.0, 5.0, 1)];
//! let sweep = PriceSweep::around(&legs, 100.0, &SweepConfig::default()).unwrap();
//! let result = compute_payoff(&legs, &sweep, 1).unwrap();
//!
//! assert_eq!(result.max_profit, Extremum::Unbounded);
//! assert_eq!(result.max_loss, Extremum::Bounded(-5.0));
//! ```

mod engine;
mod error;
mod leg;
mod sweep;

pub use engine::{
    Extremum, PayoffResult, aggregate_payoff, compute_payoff, find_breakevens, leg_payoff,
};
pub use error::PayoffError;
pub use leg::{InstrumentType, LegAction, OptionLeg};
pub use sweep::{PriceSweep, SweepConfig};
