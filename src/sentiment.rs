//! Put-call ratio sentiment buckets.

use crate::open_interest::OiTotals;
use serde::Serialize;
use utoipa::ToSchema;

/// PCR above which the market reads bearish.
pub const BEARISH_PCR: f64 = 1.2;
/// PCR below which the market reads bullish.
pub const BULLISH_PCR: f64 = 0.8;
/// PCR above which bearishness is considered extreme.
pub const EXTREME_BEARISH_PCR: f64 = 1.5;
/// PCR below which bullishness is considered extreme.
pub const EXTREME_BULLISH_PCR: f64 = 0.5;

/// Market sentiment inferred from the put-call ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More call activity than put activity.
    Bullish,
    /// Balanced activity.
    Neutral,
    /// More put activity than call activity.
    Bearish,
}

impl Sentiment {
    /// Buckets a put-call ratio.
    #[must_use]
    pub fn from_pcr(pcr: f64) -> Self {
        if pcr > BEARISH_PCR {
            Self::Bearish
        } else if pcr < BULLISH_PCR {
            Self::Bullish
        } else {
            Self::Neutral
        }
    }

    /// Short explanation shown next to the ratio.
    #[must_use]
    pub fn interpretation(self) -> &'static str {
        match self {
            Self::Bearish => {
                "High Put-Call Ratio suggests bearish sentiment with more put options being traded."
            }
            Self::Bullish => {
                "Low Put-Call Ratio suggests bullish sentiment with more call options being traded."
            }
            Self::Neutral => "Balanced Put-Call Ratio indicates neutral market sentiment.",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Returns `true` when the ratio sits in a contrarian extreme.
#[must_use]
pub fn is_extreme(pcr: f64) -> bool {
    pcr > EXTREME_BEARISH_PCR || pcr < EXTREME_BULLISH_PCR
}

/// Sentiment summary for an option chain.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SentimentReport {
    /// Put-call ratio.
    pub pcr: f64,
    /// Bucketed sentiment.
    pub sentiment: Sentiment,
    /// Whether the ratio is in an extreme zone.
    pub extreme: bool,
    /// Human-readable reading of the ratio.
    pub interpretation: String,
}

impl SentimentReport {
    /// Builds a report from chain totals; `None` when the PCR is undefined.
    #[must_use]
    pub fn from_totals(totals: &OiTotals) -> Option<Self> {
        let pcr = totals.pcr?;
        let sentiment = Sentiment::from_pcr(pcr);
        let extreme = is_extreme(pcr);

        let mut interpretation = sentiment.interpretation().to_string();
        if extreme {
            interpretation.push_str(" The ratio is at an extreme, which often precedes a reversal.");
        }

        Some(Self {
            pcr,
            sentiment,
            extreme,
            interpretation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        assert_eq!(Sentiment::from_pcr(1.3), Sentiment::Bearish);
        assert_eq!(Sentiment::from_pcr(0.7), Sentiment::Bullish);
        assert_eq!(Sentiment::from_pcr(1.0), Sentiment::Neutral);
    }

    #[test]
    fn test_bucket_boundaries_are_neutral() {
        assert_eq!(Sentiment::from_pcr(1.2), Sentiment::Neutral);
        assert_eq!(Sentiment::from_pcr(0.8), Sentiment::Neutral);
    }

    #[test]
    fn test_extremes() {
        assert!(is_extreme(1.6));
        assert!(is_extreme(0.4));
        assert!(!is_extreme(1.5));
        assert!(!is_extreme(1.0));
    }

    #[test]
    fn test_report_from_totals() {
        let totals = OiTotals {
            call_oi: 100.0,
            put_oi: 160.0,
            pcr: Some(1.6),
            ..Default::default()
        };
        let report = SentimentReport::from_totals(&totals).unwrap();
        assert_eq!(report.sentiment, Sentiment::Bearish);
        assert!(report.extreme);
        assert!(report.interpretation.contains("extreme"));
    }

    #[test]
    fn test_report_requires_pcr() {
        assert!(SentimentReport::from_totals(&OiTotals::default()).is_none());
    }

    #[test]
    fn test_sentiment_serialization() {
        assert_eq!(serde_json::to_string(&Sentiment::Bullish).unwrap(), "\"bullish\"");
    }
}
