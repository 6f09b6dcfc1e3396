//! Option chain snapshots and open-interest aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Date format NSE uses for expiries, e.g. `28-Nov-2024`.
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

/// Parses an NSE expiry string.
#[must_use]
pub fn parse_expiry(expiry: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(expiry, EXPIRY_FORMAT).ok()
}

/// Market data for one side (call or put) of a strike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OptionQuote {
    /// Outstanding contracts.
    pub open_interest: f64,
    /// Change in open interest since the previous session.
    pub change_in_open_interest: f64,
    /// Implied volatility in percent.
    pub implied_volatility: f64,
    /// Last traded price.
    pub last_price: f64,
}

/// One strike of one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StrikeRow {
    /// Strike price.
    pub strike: f64,
    /// Expiry in `dd-Mon-yyyy` form.
    pub expiry: String,
    /// Call side, absent when the strike has no listed call.
    pub call: Option<OptionQuote>,
    /// Put side, absent when the strike has no listed put.
    pub put: Option<OptionQuote>,
}

/// Rows sharing one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExpiryGroup {
    /// Expiry in `dd-Mon-yyyy` form.
    pub expiry: String,
    /// Rows sorted by strike.
    pub rows: Vec<StrikeRow>,
}

/// Open-interest totals across a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct OiTotals {
    /// Sum of call open interest.
    pub call_oi: f64,
    /// Sum of put open interest.
    pub put_oi: f64,
    /// Sum of call open-interest change.
    pub call_oi_change: f64,
    /// Sum of put open-interest change.
    pub put_oi_change: f64,
    /// Put-call ratio, defined only when both sides have open interest.
    pub pcr: Option<f64>,
}

/// Option chain of one underlying at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OptionChainSnapshot {
    /// Underlying identifier, e.g. `NIFTY`.
    pub identifier: String,
    /// Spot of the underlying.
    pub underlying_value: f64,
    /// Exchange timestamp of the snapshot.
    pub timestamp: Option<String>,
    /// Listed expiries, nearest first.
    pub expiries: Vec<String>,
    /// All strike rows.
    pub rows: Vec<StrikeRow>,
}

impl OptionChainSnapshot {
    /// Keeps only rows whose expiry is in `expiries`. An empty list keeps everything.
    #[must_use]
    pub fn with_expiries(mut self, expiries: &[String]) -> Self {
        if expiries.is_empty() {
            return self;
        }
        self.rows.retain(|row| expiries.contains(&row.expiry));
        self.expiries.retain(|expiry| expiries.contains(expiry));
        self
    }

    /// Keeps only rows whose strike lies in `[min, max]`; missing bounds are open.
    #[must_use]
    pub fn with_strike_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rows.retain(|row| {
            min.is_none_or(|min| row.strike >= min) && max.is_none_or(|max| row.strike <= max)
        });
        self
    }

    /// Distinct strikes in ascending order.
    #[must_use]
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.rows.iter().map(|row| row.strike).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    /// Rows grouped by expiry, nearest expiry first.
    ///
    /// Expiries that do not parse as dates sort after the ones that do.
    #[must_use]
    pub fn group_by_expiry(&self) -> Vec<ExpiryGroup> {
        let mut groups: Vec<ExpiryGroup> = Vec::new();
        for row in &self.rows {
            match groups.iter_mut().find(|group| group.expiry == row.expiry) {
                Some(group) => group.rows.push(row.clone()),
                None => groups.push(ExpiryGroup {
                    expiry: row.expiry.clone(),
                    rows: vec![row.clone()],
                }),
            }
        }

        for group in &mut groups {
            group.rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        }
        groups.sort_by(|a, b| {
            match (parse_expiry(&a.expiry), parse_expiry(&b.expiry)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.expiry.cmp(&b.expiry),
            }
        });
        groups
    }

    /// Open-interest totals and put-call ratio over the current rows.
    #[must_use]
    pub fn totals(&self) -> OiTotals {
        let mut totals = OiTotals::default();
        for row in &self.rows {
            if let Some(call) = &row.call {
                totals.call_oi += call.open_interest;
                totals.call_oi_change += call.change_in_open_interest;
            }
            if let Some(put) = &row.put {
                totals.put_oi += put.open_interest;
                totals.put_oi_change += put.change_in_open_interest;
            }
        }
        if totals.call_oi > 0.0 && totals.put_oi > 0.0 {
            totals.pcr = Some(totals.put_oi / totals.call_oi);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(oi: f64, change: f64) -> OptionQuote {
        OptionQuote {
            open_interest: oi,
            change_in_open_interest: change,
            implied_volatility: 12.5,
            last_price: 100.0,
        }
    }

    fn row(strike: f64, expiry: &str, call_oi: f64, put_oi: f64) -> StrikeRow {
        StrikeRow {
            strike,
            expiry: expiry.to_string(),
            call: Some(quote(call_oi, 10.0)),
            put: Some(quote(put_oi, -5.0)),
        }
    }

    fn snapshot() -> OptionChainSnapshot {
        OptionChainSnapshot {
            identifier: "NIFTY".to_string(),
            underlying_value: 22100.0,
            timestamp: None,
            expiries: vec!["28-Nov-2024".to_string(), "05-Dec-2024".to_string()],
            rows: vec![
                row(22200.0, "05-Dec-2024", 50.0, 20.0),
                row(22000.0, "28-Nov-2024", 100.0, 150.0),
                row(22100.0, "28-Nov-2024", 200.0, 100.0),
                row(22000.0, "05-Dec-2024", 30.0, 30.0),
            ],
        }
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(
            parse_expiry("28-Nov-2024"),
            NaiveDate::from_ymd_opt(2024, 11, 28)
        );
        assert_eq!(parse_expiry("2024-11-28"), None);
    }

    #[test]
    fn test_strikes_are_sorted_and_unique() {
        assert_eq!(snapshot().strikes(), vec![22000.0, 22100.0, 22200.0]);
    }

    #[test]
    fn test_with_strike_range() {
        let filtered = snapshot().with_strike_range(Some(22050.0), None);
        assert_eq!(filtered.strikes(), vec![22100.0, 22200.0]);

        let filtered = snapshot().with_strike_range(Some(22000.0), Some(22100.0));
        assert_eq!(filtered.rows.len(), 3);
    }

    #[test]
    fn test_with_expiries() {
        let filtered = snapshot().with_expiries(&["05-Dec-2024".to_string()]);
        assert_eq!(filtered.rows.len(), 2);
        assert_eq!(filtered.expiries, vec!["05-Dec-2024".to_string()]);

        let unfiltered = snapshot().with_expiries(&[]);
        assert_eq!(unfiltered.rows.len(), 4);
    }

    #[test]
    fn test_group_by_expiry_orders_by_date() {
        let groups = snapshot().group_by_expiry();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].expiry, "28-Nov-2024");
        assert_eq!(groups[1].expiry, "05-Dec-2024");
        assert_eq!(groups[1].rows[0].strike, 22000.0);
        assert_eq!(groups[1].rows[1].strike, 22200.0);
    }

    #[test]
    fn test_totals_and_pcr() {
        let totals = snapshot().totals();
        assert_eq!(totals.call_oi, 380.0);
        assert_eq!(totals.put_oi, 300.0);
        assert_eq!(totals.call_oi_change, 40.0);
        assert_eq!(totals.put_oi_change, -20.0);
        assert!((totals.pcr.unwrap() - 300.0 / 380.0).abs() < 1e-12);
    }

    #[test]
    fn test_pcr_undefined_without_calls() {
        let mut chain = snapshot();
        for row in &mut chain.rows {
            row.call = None;
        }
        assert_eq!(chain.totals().pcr, None);
    }
}
