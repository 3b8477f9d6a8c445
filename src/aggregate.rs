//! Statistical summaries over windows of readings.

use crate::reading::Reading;
use serde::{Deserialize, Serialize};

/// Running sum and count over a window of temperatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Sum of all temperatures in the window.
    pub sum: f64,
    /// Number of readings in the window.
    pub count: u64,
}

impl Aggregate {
    /// Creates an aggregate from a single value.
    pub fn from_value(value: f64) -> Self {
        Self { sum: value, count: 1 }
    }

    /// Creates an empty aggregate (used as a starting point for accumulation).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Accumulates a value into this aggregate.
    pub fn accumulate(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Computes the mean, or `None` when nothing was accumulated.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Returns true if this aggregate contains no data points.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<'a> FromIterator<&'a Reading> for Aggregate {
    fn from_iter<I: IntoIterator<Item = &'a Reading>>(iter: I) -> Self {
        let mut agg = Self::empty();
        for reading in iter {
            agg.accumulate(reading.temperature);
        }
        agg
    }
}

/// Arithmetic mean of the readings' temperatures; `None` for an empty slice.
pub fn average(readings: &[Reading]) -> Option<f64> {
    readings.iter().collect::<Aggregate>().mean()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_empty_is_none() {
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_average_of_two() {
        let readings = [Reading::new(1, 5.0), Reading::new(2, 15.0)];
        assert_eq!(average(&readings), Some(10.0));
    }

    #[test]
    fn test_aggregate_accumulate() {
        let mut agg = Aggregate::from_value(10.0);
        agg.accumulate(20.0);
        agg.accumulate(5.0);
        agg.accumulate(15.0);

        assert_eq!(agg.sum, 50.0);
        assert_eq!(agg.count, 4);
        assert_eq!(agg.mean(), Some(12.5));
    }

    #[test]
    fn test_aggregate_from_readings() {
        let readings = [
            Reading::new(1, 21.0),
            Reading::new(2, 19.0),
            Reading::new(3, 23.0),
        ];
        let agg: Aggregate = readings.iter().collect();

        assert_eq!(agg.count, 3);
        assert_eq!(agg.sum, 63.0);
        assert_eq!(agg.mean(), Some(21.0));
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = Aggregate::empty();
        assert!(agg.is_empty());
        assert_eq!(agg.mean(), None);
        assert_eq!(Aggregate::default(), agg);
    }
}
