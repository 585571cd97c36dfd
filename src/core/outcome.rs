//! Call outcome classification for breaker statistics.
//!
//! Every guarded call ends in exactly one outcome. A call that succeeds but
//! exceeds the slow-call duration threshold is classified `Slow`: the caller
//! still receives the value, but the outcome counts as a failure for rate
//! purposes so latency degradation trips the breaker, not just hard errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The outcome of a single guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallOutcome {
    /// The call completed within the slow-call threshold.
    Success,

    /// The call failed with a downstream error or timed out.
    Failure,

    /// The call succeeded but exceeded the slow-call threshold.
    Slow {
        /// How long the call took.
        duration: Duration,
    },
}

impl CallOutcome {
    /// Classifies a completed call from its result and elapsed duration.
    pub fn classify(succeeded: bool, elapsed: Duration, slow_threshold: Duration) -> Self {
        if !succeeded {
            Self::Failure
        } else if elapsed > slow_threshold {
            Self::Slow { duration: elapsed }
        } else {
            Self::Success
        }
    }

    /// Returns `true` if the call completed normally and fast.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` if the call failed outright.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Returns `true` if the call succeeded slowly.
    pub fn is_slow(&self) -> bool {
        matches!(self, Self::Slow { .. })
    }

    /// Returns `true` if this outcome counts toward the failure rate.
    ///
    /// Slow successes count: the breaker penalizes latency degradation.
    pub fn counts_as_failure(&self) -> bool {
        matches!(self, Self::Failure | Self::Slow { .. })
    }
}

/// A call outcome together with the instant it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedOutcome {
    /// The classified outcome.
    pub outcome: CallOutcome,

    /// When the outcome was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl RecordedOutcome {
    /// Records an outcome at the current time.
    pub fn now(outcome: CallOutcome) -> Self {
        Self {
            outcome,
            recorded_at: Utc::now(),
        }
    }
}
