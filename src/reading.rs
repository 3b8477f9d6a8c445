//! A single timestamped temperature sample.

use serde::{Deserialize, Serialize};

/// One temperature sample.
///
/// `timestamp` is wall-clock milliseconds since the Unix epoch; it doubles as the
/// store key, so two readings taken in the same millisecond collapse into one entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

impl Reading {
    /// Creates a reading.
    pub fn new(timestamp: u64, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }
}

impl From<(u64, f64)> for Reading {
    fn from((timestamp, temperature): (u64, f64)) -> Self {
        Self::new(timestamp, temperature)
    }
}

impl From<(&u64, &f64)> for Reading {
    fn from((timestamp, temperature): (&u64, &f64)) -> Self {
        Self::new(*timestamp, *temperature)
    }
}
