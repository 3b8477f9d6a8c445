use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the recent temperature movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// The recent average is strictly above the lookback average.
    Rising,
    /// Anything else, including ties.
    Falling,
}

impl Trend {
    /// Compares the recent average with the lookback average.
    ///
    /// Only a strict increase counts as rising. A missing average on either side
    /// gives no evidence of a rise and classifies as falling.
    pub fn classify(recent: Option<f64>, lookback: Option<f64>) -> Self {
        match (recent, lookback) {
            (Some(recent), Some(lookback)) if recent > lookback => Trend::Rising,
            _ => Trend::Falling,
        }
    }

    /// Lowercase label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis cycle over a non-empty long window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Clock time the cycle ran at.
    pub generated_at_ms: u64,
    /// Readings in the long (5 minute) window.
    pub long_window_count: usize,
    /// Mean temperature of the long window.
    pub long_window_avg: f64,
    /// Mean temperature of the recent (15 second) window.
    pub recent_avg: Option<f64>,
    /// Mean temperature of the lookback window.
    pub lookback_avg: Option<f64>,
    /// Classification of `recent_avg` against `lookback_avg`.
    pub trend: Trend,
}

impl fmt::Display for TrendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Past 5 min readings count: {}. Average temp (last 5 min): {}, Trend: {}",
            self.long_window_count, self.long_window_avg, self.trend
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Trend::classify(Some(21.0), Some(20.0)), Trend::Rising);
        assert_eq!(Trend::classify(Some(20.0), Some(20.0)), Trend::Falling);
        assert_eq!(Trend::classify(Some(19.0), Some(20.0)), Trend::Falling);
        assert_eq!(Trend::classify(None, Some(20.0)), Trend::Falling);
        assert_eq!(Trend::classify(Some(20.0), None), Trend::Falling);
        assert_eq!(Trend::classify(None, None), Trend::Falling);
    }

    #[test]
    fn test_report_line_format() {
        let report = TrendReport {
            generated_at_ms: 1_000,
            long_window_count: 1234,
            long_window_avg: 20.5,
            recent_avg: Some(21.0),
            lookback_avg: Some(20.0),
            trend: Trend::Rising,
        };

        assert_eq!(
            report.to_string(),
            "Past 5 min readings count: 1234. Average temp (last 5 min): 20.5, Trend: rising"
        );
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Falling).unwrap(), "\"falling\"");
        let trend: Trend = serde_json::from_str("\"rising\"").unwrap();
        assert_eq!(trend, Trend::Rising);
    }
}
