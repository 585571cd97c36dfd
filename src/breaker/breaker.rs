//! Circuit breaker implementation.

use crate::breaker::config::BreakerConfig;
use crate::breaker::state::{BreakerMetrics, BreakerState};
use crate::core::outcome::CallOutcome;
use crate::recorder::OutcomeWindow;

use std::time::{Duration, Instant};

/// The breaker's answer to a call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// The call may be issued. The caller must report exactly one of
    /// [`CircuitBreaker::on_success`] or [`CircuitBreaker::on_failure`]
    /// afterwards, exactly once.
    Permitted,
    /// The call must not be issued; fail fast.
    Denied,
}

impl Permission {
    /// Returns `true` if the call may be issued.
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Permitted)
    }
}

/// A per-resource circuit breaker.
///
/// Owns its resource's sliding outcome window; no other component mutates
/// the breaker's state except through outcome reporting.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Resource name for logging.
    resource: String,
    /// Configuration.
    config: BreakerConfig,
    /// Current state.
    state: std::sync::RwLock<BreakerState>,
    /// Sliding window of recent outcomes.
    window: OutcomeWindow,
    /// Observability counters.
    metrics: std::sync::RwLock<BreakerMetrics>,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker for the given resource.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Configuration` when the configuration fails
    /// [`BreakerConfig::validate`].
    pub fn new(
        resource: impl Into<String>,
        config: BreakerConfig,
    ) -> Result<Self, crate::core::CallError> {
        config.validate()?;
        let window = OutcomeWindow::new(config.window_size, config.minimum_sample_size);
        Ok(Self {
            resource: resource.into(),
            config,
            state: std::sync::RwLock::new(BreakerState::Closed),
            window,
            metrics: std::sync::RwLock::new(BreakerMetrics::new()),
        })
    }

    /// Returns the resource name.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> BreakerState {
        *self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a copy of the current metrics.
    pub fn metrics(&self) -> BreakerMetrics {
        self.metrics
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the current failure rate, or `None` while the window holds
    /// fewer outcomes than the minimum sample size.
    pub fn current_failure_rate(&self) -> Option<f64> {
        self.window.stats().map(|s| s.failure_rate)
    }

    /// Decides whether a call attempt may proceed.
    ///
    /// In the open state, once the wait duration has elapsed the next
    /// attempt transitions the circuit to half-open and is permitted as the
    /// probe. A denial has no side effect beyond a rejected counter
    /// increment.
    pub fn try_acquire(&self) -> Permission {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match *state {
            BreakerState::Closed => Permission::Permitted,

            BreakerState::Open { opened_at } => {
                if opened_at.elapsed() >= self.config.wait_duration_in_open {
                    *state = BreakerState::HalfOpen {
                        consecutive_successes: 0,
                        probes_in_flight: 1,
                    };
                    tracing::info!(
                        resource = %self.resource,
                        from = "open",
                        to = "half_open",
                        "circuit breaker probing"
                    );
                    Permission::Permitted
                } else {
                    self.record_rejected();
                    Permission::Denied
                }
            }

            BreakerState::HalfOpen {
                consecutive_successes,
                probes_in_flight,
            } => {
                if probes_in_flight < self.config.permitted_calls_in_half_open {
                    *state = BreakerState::HalfOpen {
                        consecutive_successes,
                        probes_in_flight: probes_in_flight + 1,
                    };
                    Permission::Permitted
                } else {
                    self.record_rejected();
                    Permission::Denied
                }
            }
        }
    }

    /// Reports a successful call with its measured duration.
    ///
    /// A success slower than the configured slow-call threshold is
    /// classified slow and counts as a failure for rate purposes.
    pub fn on_success(&self, duration: Duration) {
        let outcome = CallOutcome::classify(
            true,
            duration,
            self.config.slow_call_duration_threshold,
        );
        self.report(outcome);
    }

    /// Reports a failed call with its measured duration.
    pub fn on_failure(&self, _duration: Duration) {
        self.report(CallOutcome::Failure);
    }

    /// Forces the circuit open (for testing or emergency).
    pub fn force_open(&self) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.is_open() {
            *state = BreakerState::Open {
                opened_at: Instant::now(),
            };
            self.record_opened();
        }
    }

    /// Forces the circuit closed (for testing or manual recovery).
    pub fn force_close(&self) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.is_closed() {
            *state = BreakerState::Closed;
            self.window.reset();
            self.metrics
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .record_closed();
            tracing::info!(resource = %self.resource, to = "closed", "circuit breaker closed");
        }
    }

    /// Applies one reported outcome to the state machine.
    fn report(&self, outcome: CallOutcome) {
        {
            let mut metrics = self
                .metrics
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match outcome {
                CallOutcome::Success => metrics.record_success(),
                CallOutcome::Failure => metrics.record_failure(),
                CallOutcome::Slow { .. } => metrics.record_slow(),
            }
        }

        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match *state {
            BreakerState::Closed => {
                self.window.record(outcome);
                if let Some(stats) = self.window.stats() {
                    if stats.failure_rate >= self.config.failure_rate_threshold {
                        *state = BreakerState::Open {
                            opened_at: Instant::now(),
                        };
                        self.record_opened();
                        tracing::warn!(
                            resource = %self.resource,
                            failure_rate = stats.failure_rate,
                            sample_count = stats.sample_count,
                            "circuit breaker opened"
                        );
                    }
                }
            }

            BreakerState::HalfOpen {
                consecutive_successes,
                probes_in_flight,
            } => {
                if outcome.counts_as_failure() {
                    // Any probe failure reopens the circuit with a fresh wait
                    *state = BreakerState::Open {
                        opened_at: Instant::now(),
                    };
                    self.record_opened();
                    tracing::warn!(
                        resource = %self.resource,
                        from = "half_open",
                        to = "open",
                        "probe failed, circuit breaker reopened"
                    );
                } else {
                    let successes = consecutive_successes + 1;
                    if successes >= self.config.success_threshold {
                        *state = BreakerState::Closed;
                        self.window.reset();
                        self.metrics
                            .write()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .record_closed();
                        tracing::info!(
                            resource = %self.resource,
                            from = "half_open",
                            to = "closed",
                            "circuit breaker closed"
                        );
                    } else {
                        *state = BreakerState::HalfOpen {
                            consecutive_successes: successes,
                            probes_in_flight: probes_in_flight.saturating_sub(1),
                        };
                    }
                }
            }

            BreakerState::Open { .. } => {
                // A probe permitted before a concurrent reopen can complete
                // here; a late failure refreshes the wait, a late success is
                // dropped.
                if outcome.counts_as_failure() {
                    *state = BreakerState::Open {
                        opened_at: Instant::now(),
                    };
                }
            }
        }
    }

    fn record_rejected(&self) {
        self.metrics
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record_rejected();
    }

    fn record_opened(&self) {
        self.metrics
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record_opened();
    }
}
