//! Circuit breaker state machine data.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The current state of a circuit breaker.
///
/// Exactly one state is active per resource at any instant. Transition
/// bookkeeping (when the circuit opened, probe progress in half-open) lives
/// inside the variants and is owned exclusively by the breaker instance.
#[derive(Debug, Clone, Copy)]
pub enum BreakerState {
    /// Circuit is closed; calls pass through normally.
    Closed,

    /// Circuit is open; calls are denied.
    Open {
        /// When the circuit was opened.
        opened_at: Instant,
    },

    /// Circuit is half-open; a bounded number of probe calls are permitted.
    HalfOpen {
        /// Consecutive successful probes so far.
        consecutive_successes: u32,
        /// Probe calls currently permitted and not yet reported.
        probes_in_flight: u32,
    },
}

impl BreakerState {
    /// Returns `true` if the circuit is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if the circuit is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Returns `true` if the circuit is half-open.
    pub fn is_half_open(&self) -> bool {
        matches!(self, Self::HalfOpen { .. })
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open { .. } => "open",
            Self::HalfOpen { .. } => "half_open",
        }
    }
}

impl Default for BreakerState {
    fn default() -> Self {
        Self::Closed
    }
}

/// Observability counters for one circuit breaker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakerMetrics {
    /// Total outcomes reported.
    pub total_calls: u64,
    /// Calls that completed normally and fast.
    pub successful_calls: u64,
    /// Calls that failed outright.
    pub failed_calls: u64,
    /// Calls that succeeded but were classified slow.
    pub slow_calls: u64,
    /// Call attempts denied by the breaker.
    pub rejected_calls: u64,
    /// Number of times the circuit has opened.
    pub times_opened: u64,
    /// Number of times the circuit has closed from half-open.
    pub times_closed: u64,
}

impl BreakerMetrics {
    /// Creates new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fast successful call.
    pub fn record_success(&mut self) {
        self.total_calls += 1;
        self.successful_calls += 1;
    }

    /// Records a failed call.
    pub fn record_failure(&mut self) {
        self.total_calls += 1;
        self.failed_calls += 1;
    }

    /// Records a slow successful call.
    pub fn record_slow(&mut self) {
        self.total_calls += 1;
        self.slow_calls += 1;
    }

    /// Records a denied call attempt.
    pub fn record_rejected(&mut self) {
        self.rejected_calls += 1;
    }

    /// Records that the circuit opened.
    pub fn record_opened(&mut self) {
        self.times_opened += 1;
    }

    /// Records that the circuit closed from half-open.
    pub fn record_closed(&mut self) {
        self.times_closed += 1;
    }
}
