//! Simulation configuration and its builder.

use crate::analysis::AnalysisWindows;
use crate::error::FeedError;
use crate::sensor::TemperatureModel;
use crate::worker::RestartPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default size bound of the store, in entries.
///
/// The evictor also subtracts this value from "now" as a millisecond age, so the
/// bound only holds while the feed inserts roughly one reading per millisecond.
pub const DEFAULT_MAX_ENTRIES: usize = 500_000;

/// Default evictor cadence.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_millis(1_000);

/// Default sensor feed cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Default trend analyzer cadence.
pub const DEFAULT_ANALYSIS_INTERVAL: Duration = Duration::from_millis(10_000);

/// Configuration for a simulation run.
///
/// Fixed at start; workers copy what they need and never observe later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Size bound of the store, in entries.
    ///
    /// Default: 500,000
    pub max_entries: usize,

    /// How often the evictor checks the size bound.
    ///
    /// Default: 1 second
    pub cleanup_interval: Duration,

    /// Delay between sensor feed ticks.
    ///
    /// Default: 1 millisecond
    pub tick_interval: Duration,

    /// Delay between trend analysis cycles.
    ///
    /// Default: 10 seconds
    pub analysis_interval: Duration,

    /// Synthetic temperature curve.
    pub model: TemperatureModel,

    /// Window lengths used by the trend analyzer.
    pub windows: AnalysisWindows,

    /// What a worker does when its task panics.
    ///
    /// Default: [`RestartPolicy::Never`]
    pub restart_policy: RestartPolicy,
}

impl SimulationConfig {
    /// Returns a builder starting from the defaults.
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
    }

    /// Checks the invariants the workers rely on.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.max_entries == 0 {
            return Err(FeedError::InvalidConfig(
                "max_entries must be positive".to_string(),
            ));
        }
        for (name, interval) in [
            ("cleanup_interval", self.cleanup_interval),
            ("tick_interval", self.tick_interval),
            ("analysis_interval", self.analysis_interval),
        ] {
            if interval.is_zero() {
                return Err(FeedError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        self.model.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            tick_interval: DEFAULT_TICK_INTERVAL,
            analysis_interval: DEFAULT_ANALYSIS_INTERVAL,
            model: TemperatureModel::default(),
            windows: AnalysisWindows::default(),
            restart_policy: RestartPolicy::default(),
        }
    }
}

/// Builder for [`SimulationConfig`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tempseries::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .max_entries(10_000)
///     .analysis_interval(Duration::from_secs(1))
///     .build()
///     .unwrap();
/// assert_eq!(config.max_entries, 10_000);
/// ```
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
        }
    }

    /// Sets the store's size bound.
    #[must_use]
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    /// Sets the evictor cadence.
    #[must_use]
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = interval;
        self
    }

    /// Sets the sensor feed cadence.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    /// Sets the trend analyzer cadence.
    #[must_use]
    pub fn analysis_interval(mut self, interval: Duration) -> Self {
        self.config.analysis_interval = interval;
        self
    }

    /// Replaces the synthetic temperature curve.
    #[must_use]
    pub fn model(mut self, model: TemperatureModel) -> Self {
        self.config.model = model;
        self
    }

    /// Replaces the analysis window lengths.
    #[must_use]
    pub fn windows(mut self, windows: AnalysisWindows) -> Self {
        self.config.windows = windows;
        self
    }

    /// Sets the restart policy applied to every worker.
    #[must_use]
    pub fn restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.config.restart_policy = policy;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<SimulationConfig, FeedError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.max_entries, 500_000);
        assert_eq!(config.cleanup_interval, Duration::from_millis(1_000));
        assert_eq!(config.tick_interval, Duration::from_millis(1));
        assert_eq!(config.analysis_interval, Duration::from_millis(10_000));
        assert_eq!(config.model.day_period_ms, 300_000);
        assert_eq!(config.model.base_temp, 20.0);
        assert_eq!(config.model.amplitude, 10.0);
        assert_eq!(config.model.variance_fraction, 0.15);
        assert_eq!(config.restart_policy, RestartPolicy::Never);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SimulationConfig::builder()
            .max_entries(1_000)
            .cleanup_interval(Duration::from_millis(50))
            .tick_interval(Duration::from_micros(500))
            .analysis_interval(Duration::from_millis(200))
            .build()
            .unwrap();

        assert_eq!(config.max_entries, 1_000);
        assert_eq!(config.cleanup_interval, Duration::from_millis(50));
        assert_eq!(config.tick_interval, Duration::from_micros(500));
        assert_eq!(config.analysis_interval, Duration::from_millis(200));
    }

    #[test]
    fn test_builder_rejects_zero_max_entries() {
        let err = SimulationConfig::builder().max_entries(0).build().unwrap_err();
        assert!(matches!(err, FeedError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_rejects_zero_intervals() {
        assert!(
            SimulationConfig::builder()
                .tick_interval(Duration::ZERO)
                .build()
                .is_err()
        );
        assert!(
            SimulationConfig::builder()
                .cleanup_interval(Duration::ZERO)
                .build()
                .is_err()
        );
        let err = SimulationConfig::builder()
            .analysis_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("analysis_interval"));
    }

    #[test]
    fn test_builder_rejects_bad_model() {
        let model = TemperatureModel {
            variance_fraction: 1.5,
            ..TemperatureModel::default()
        };
        assert!(SimulationConfig::builder().model(model).build().is_err());

        let model = TemperatureModel {
            day_period_ms: 0,
            ..TemperatureModel::default()
        };
        assert!(SimulationConfig::builder().model(model).build().is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = SimulationConfig::builder()
            .restart_policy(RestartPolicy::OnPanic {
                backoff: Duration::from_millis(100),
                max_restarts: Some(3),
            })
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let decoded: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }
}
