//! Circuit breaker configuration.

use crate::core::CallError;
use std::time::Duration;

/// Configuration for a circuit breaker.
///
/// Every knob is explicit and externally supplied; the `Default` impl is
/// a documented starting point, not hidden behavior.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Failure rate at or above which the circuit opens (0.0 to 1.0).
    pub failure_rate_threshold: f64,

    /// Minimum recorded outcomes before the failure rate is evaluated.
    pub minimum_sample_size: usize,

    /// Number of outcomes retained in the sliding window.
    pub window_size: usize,

    /// How long the circuit stays open before probing.
    pub wait_duration_in_open: Duration,

    /// Maximum concurrent probe calls in the half-open state.
    pub permitted_calls_in_half_open: u32,

    /// Consecutive probe successes required to close the circuit.
    pub success_threshold: u32,

    /// Successful calls slower than this count as failures for the rate.
    pub slow_call_duration_threshold: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 0.5,
            minimum_sample_size: 5,
            window_size: 20,
            wait_duration_in_open: Duration::from_secs(10),
            permitted_calls_in_half_open: 1,
            success_threshold: 3,
            slow_call_duration_threshold: Duration::from_secs(2),
        }
    }
}

impl BreakerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure rate threshold.
    pub fn with_failure_rate_threshold(mut self, threshold: f64) -> Self {
        self.failure_rate_threshold = threshold;
        self
    }

    /// Sets the minimum sample size.
    pub fn with_minimum_sample_size(mut self, size: usize) -> Self {
        self.minimum_sample_size = size;
        self
    }

    /// Sets the sliding window size.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Sets the open-state wait duration.
    pub fn with_wait_duration_in_open(mut self, duration: Duration) -> Self {
        self.wait_duration_in_open = duration;
        self
    }

    /// Sets the number of permitted half-open probe calls.
    pub fn with_permitted_calls_in_half_open(mut self, calls: u32) -> Self {
        self.permitted_calls_in_half_open = calls;
        self
    }

    /// Sets the consecutive success threshold for closing.
    pub fn with_success_threshold(mut self, threshold: u32) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Sets the slow call duration threshold.
    pub fn with_slow_call_duration_threshold(mut self, threshold: Duration) -> Self {
        self.slow_call_duration_threshold = threshold;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Configuration` when a parameter is outside its
    /// valid range.
    pub fn validate(&self) -> Result<(), CallError> {
        if !(self.failure_rate_threshold > 0.0 && self.failure_rate_threshold <= 1.0) {
            return Err(CallError::configuration(
                "failure_rate_threshold must be in (0.0, 1.0]",
            ));
        }
        if self.minimum_sample_size == 0 {
            return Err(CallError::configuration(
                "minimum_sample_size must be at least 1",
            ));
        }
        if self.window_size < self.minimum_sample_size {
            return Err(CallError::configuration(
                "window_size must be at least minimum_sample_size",
            ));
        }
        if self.permitted_calls_in_half_open == 0 {
            return Err(CallError::configuration(
                "permitted_calls_in_half_open must be at least 1",
            ));
        }
        if self.success_threshold == 0 {
            return Err(CallError::configuration(
                "success_threshold must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BreakerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.failure_rate_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.minimum_sample_size, 5);
        assert_eq!(config.window_size, 20);
    }

    #[test]
    fn test_config_builder() {
        let config = BreakerConfig::new()
            .with_failure_rate_threshold(0.3)
            .with_minimum_sample_size(10)
            .with_window_size(50)
            .with_wait_duration_in_open(Duration::from_secs(5));

        assert!((config.failure_rate_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.minimum_sample_size, 10);
        assert_eq!(config.window_size, 50);
        assert_eq!(config.wait_duration_in_open, Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = BreakerConfig::new().with_failure_rate_threshold(0.0);
        assert!(config.validate().is_err());

        let config = BreakerConfig::new().with_failure_rate_threshold(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_window_below_minimum_sample() {
        let config = BreakerConfig::new()
            .with_minimum_sample_size(10)
            .with_window_size(5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_probes() {
        let config = BreakerConfig::new().with_permitted_calls_in_half_open(0);
        assert!(config.validate().is_err());
    }
}
