//! Synthetic temperature sensor.
//!
//! The "true" temperature follows a sine wave whose period is one compressed day
//! (five minutes by default). Each tick perturbs it by up to ±`variance_fraction` of
//! its own value and writes the result into the store.

use crate::clock::Clock;
use crate::error::FeedError;
use crate::reading::Reading;
use crate::store::TimeSeriesStore;
use crate::worker::PeriodicTask;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::sync::Arc;

/// Parameters of the synthetic temperature curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureModel {
    /// Mean temperature of the cycle, in °C.
    pub base_temp: f64,
    /// Peak deviation from `base_temp`, in °C.
    pub amplitude: f64,
    /// Length of one full cycle, in milliseconds.
    pub day_period_ms: u64,
    /// Largest relative deviation of a simulated reading from the true value.
    pub variance_fraction: f64,
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self {
            base_temp: 20.0,
            amplitude: 10.0,
            day_period_ms: 300_000,
            variance_fraction: 0.15,
        }
    }
}

impl TemperatureModel {
    /// The noiseless temperature at `now_ms`.
    ///
    /// Equal to `base + amplitude * sin(2π * now / period)`. The phase is taken from
    /// `now mod period`, so values one period apart are bit-identical.
    #[allow(clippy::cast_precision_loss)]
    pub fn true_temperature(&self, now_ms: u64) -> f64 {
        let phase = (now_ms % self.day_period_ms) as f64 / self.day_period_ms as f64;
        self.base_temp + self.amplitude * (TAU * phase).sin()
    }

    /// Perturbs `true_temp` given two uniform draws in `[0, 1)`.
    ///
    /// `u1` scales the deviation, `u2` picks its sign: above `0.5` adds, otherwise
    /// subtracts.
    pub fn simulate(&self, true_temp: f64, u1: f64, u2: f64) -> f64 {
        let variance = u1 * self.variance_fraction * true_temp;
        if u2 > 0.5 {
            true_temp + variance
        } else {
            true_temp - variance
        }
    }

    /// Draws a simulated reading at `now_ms` using `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, now_ms: u64, rng: &mut R) -> f64 {
        let u1: f64 = rng.random();
        let u2: f64 = rng.random();
        self.simulate(self.true_temperature(now_ms), u1, u2)
    }

    pub(crate) fn validate(&self) -> Result<(), FeedError> {
        if self.day_period_ms == 0 {
            return Err(FeedError::InvalidConfig(
                "day_period_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.variance_fraction) {
            return Err(FeedError::InvalidConfig(format!(
                "variance_fraction must be within [0, 1], got {}",
                self.variance_fraction
            )));
        }
        if !self.base_temp.is_finite() || !self.amplitude.is_finite() {
            return Err(FeedError::InvalidConfig(
                "base_temp and amplitude must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Periodic writer of simulated readings.
pub struct SensorFeed<C: Clock> {
    store: Arc<TimeSeriesStore>,
    clock: C,
    model: TemperatureModel,
    rng: StdRng,
}

impl<C: Clock> SensorFeed<C> {
    /// Creates a feed seeded from the operating system's entropy source.
    pub fn new(store: Arc<TimeSeriesStore>, clock: C, model: TemperatureModel) -> Self {
        Self {
            store,
            clock,
            model,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a feed with a reproducible noise sequence.
    pub fn with_seed(
        store: Arc<TimeSeriesStore>,
        clock: C,
        model: TemperatureModel,
        seed: u64,
    ) -> Self {
        Self {
            store,
            clock,
            model,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Takes one reading and inserts it into the store.
    pub fn tick(&mut self) -> Reading {
        let now = self.clock.now_ms();
        let reading = Reading::new(now, self.model.sample(now, &mut self.rng));
        self.store.insert_reading(reading);
        reading
    }
}

impl<C: Clock + 'static> PeriodicTask for SensorFeed<C> {
    fn name(&self) -> &'static str {
        "sensor-feed"
    }

    fn run_once(&mut self) {
        self.tick();
    }
}
