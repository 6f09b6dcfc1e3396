//! Strategy legs and their per-leg payoff at expiry.

use super::error::PayoffError;
use serde::{Deserialize, Serialize};

/// Kind of instrument a leg holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentType {
    /// Call option (CE).
    #[serde(alias = "CE")]
    Call,
    /// Put option (PE).
    #[serde(alias = "PE")]
    Put,
    /// Index or stock future, a delta-1 position.
    #[serde(alias = "FUT")]
    Future,
    /// The underlying itself, a delta-1 position.
    Underlying,
}

impl InstrumentType {
    /// Returns `true` for calls and puts.
    #[must_use]
    pub fn is_option(self) -> bool {
        matches!(self, Self::Call | Self::Put)
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CE"),
            Self::Put => write!(f, "PE"),
            Self::Future => write!(f, "FUT"),
            Self::Underlying => write!(f, "UNDERLYING"),
        }
    }
}

/// Direction of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegAction {
    /// Long position.
    Buy,
    /// Short position.
    Sell,
}

impl LegAction {
    /// `+1.0` for a long position, `-1.0` for a short one.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for LegAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// One constituent of a multi-leg strategy.
///
/// Lot size is not part of the leg; it is a multiplier supplied by the
/// caller for the whole strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    /// Instrument held by this leg.
    pub instrument_type: InstrumentType,
    /// Long or short.
    pub action: LegAction,
    /// Strike price. Required for calls and puts, ignored otherwise.
    #[serde(default)]
    pub strike: Option<f64>,
    /// Premium per unit at entry. For delta-1 legs this is the entry price.
    pub premium: f64,
    /// Number of lots.
    pub quantity: u32,
    /// Expiry identifier, e.g. `28-Nov-2024`.
    #[serde(default)]
    pub expiry: Option<String>,
}

impl OptionLeg {
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

    /// Sets the expiry identifier.
    #[must_use]
    pub fn with_expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Checks the leg against the engine's input contract.
    ///
    /// # Arguments
    /// * `index` - Position of the leg, reported back in the error.
    ///
    /// # Errors
    /// Returns [`PayoffError::InvalidLeg`] on a missing or non-positive
    /// option strike, a negative or non-finite premium, or a zero quantity.
    pub fn validate(&self, index: usize) -> Result<(), PayoffError> {
        let invalid = |reason: String| PayoffError::InvalidLeg { index, reason };

        if self.instrument_type.is_option() {
            match self.strike {
                None => {
                    return Err(invalid(format!(
                        "{} leg requires a strike",
                        self.instrument_type
                    )));
                }
                Some(strike) if !strike.is_finite() || strike <= 0.0 => {
                    return Err(invalid(format!("strike must be positive, got {}", strike)));
                }
                Some(_) => {}
            }
        }

        if !self.premium.is_finite() || self.premium < 0.0 {
            return Err(invalid(format!(
                "premium must be non-negative, got {}",
                self.premium
            )));
        }

        if self.quantity == 0 {
            return Err(invalid("quantity must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Price at which this leg's P&L changes slope: the strike for options,
    /// the entry price for delta-1 legs.
    #[must_use]
    pub fn key_price(&self) -> f64 {
        match self.instrument_type {
            InstrumentType::Call | InstrumentType::Put => self.strike.unwrap_or(0.0),
            InstrumentType::Future | InstrumentType::Underlying => self.premium,
        }
    }

    /// Value of one unit of the leg at expiry for the given underlying price.
    #[must_use]
    pub fn intrinsic(&self, price: f64) -> f64 {
        match self.instrument_type {
            InstrumentType::Call => (price - self.key_price()).max(0.0),
            InstrumentType::Put => (self.key_price() - price).max(0.0),
            InstrumentType::Future | InstrumentType::Underlying => price,
        }
    }

    fn units(&self, lot_size: u32) -> f64 {
        f64::from(self.quantity) * f64::from(lot_size)
    }

    /// P&L of the whole leg at expiry.
    #[must_use]
    pub fn pnl_at(&self, price: f64, lot_size: u32) -> f64 {
        let per_unit = match self.action {
            LegAction::Buy => self.intrinsic(price) - self.premium,
            LegAction::Sell => self.premium - self.intrinsic(price),
        };
        per_unit * self.units(lot_size)
    }

    /// Slope of the leg's P&L for prices above its key price.
    #[must_use]
    pub fn upside_slope(&self, lot_size: u32) -> f64 {
        match self.instrument_type {
            InstrumentType::Put => 0.0,
            InstrumentType::Call | InstrumentType::Future | InstrumentType::Underlying => {
                self.action.sign() * self.units(lot_size)
            }
        }
    }

    /// Slope of the leg's P&L below its key price, measured as the price falls.
    #[must_use]
    pub fn downside_slope(&self, lot_size: u32) -> f64 {
        match self.instrument_type {
            InstrumentType::Call => 0.0,
            InstrumentType::Put => self.action.sign() * self.units(lot_size),
            InstrumentType::Future | InstrumentType::Underlying => {
                -self.action.sign() * self.units(lot_size)
            }
        }
    }

    /// Cash flow at entry: negative when premium is paid, positive when received.
    #[must_use]
    pub fn net_premium(&self, lot_size: u32) -> f64 {
        -self.action.sign() * self.premium * self.units(lot_size)
    }
}
