//! Circuit breaker for downstream protection.
//!
//! A per-resource state machine driven by the outcome recorder's
//! statistics. It decides, for each call attempt, whether the call may be
//! issued.
//!
//! # States
//!
//! - **Closed**: normal operation, calls pass through, outcomes feed the
//!   sliding window.
//! - **Open**: downstream presumed unhealthy, calls fail fast.
//! - **Half-Open**: a bounded number of probe calls test recovery.
//!
//! # State Transitions
//!
//! ```text
//! Closed → Open:      failure rate ≥ threshold over ≥ minimum sample size
//! Open → Half-Open:   wait duration elapsed; next attempt is the probe
//! Half-Open → Closed: success threshold consecutive probe successes
//! Half-Open → Open:   any probe failure (opened_at reset)
//! ```

mod breaker;
mod config;
mod state;

pub use breaker::{CircuitBreaker, Permission};
pub use config::BreakerConfig;
pub use state::{BreakerMetrics, BreakerState};
