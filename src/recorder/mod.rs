//! Sliding window of recent call outcomes.
//!
//! The recorder is the leaf of the resilience core: a fixed-size, count-based
//! ring buffer of [`RecordedOutcome`]s per resource. The circuit breaker
//! reads its statistics to decide transitions; nothing else mutates it.
//!
//! Statistics are only reported once the window holds at least
//! `minimum_sample_size` outcomes. Below that the window answers "insufficient
//! data" (`None`) so the breaker cannot make a premature decision.

use crate::core::outcome::{CallOutcome, RecordedOutcome};

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;

/// Aggregate statistics over the current window contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Number of outcomes the statistics were computed over.
    pub sample_count: usize,

    /// Share of outcomes counting as failures (0.0 to 1.0).
    ///
    /// Slow successes count as failures here; see
    /// [`CallOutcome::counts_as_failure`].
    pub failure_rate: f64,

    /// Share of outcomes classified as slow (0.0 to 1.0).
    pub slow_call_rate: f64,
}

/// A count-based ring buffer of recent call outcomes for one resource.
///
/// Thread-safe under concurrent `record` calls from multiple in-flight
/// calls to the same resource.
#[derive(Debug)]
pub struct OutcomeWindow {
    /// Maximum number of outcomes retained.
    window_size: usize,
    /// Below this many outcomes, `stats` reports insufficient data.
    minimum_sample_size: usize,
    /// The retained outcomes, oldest first.
    entries: RwLock<VecDeque<RecordedOutcome>>,
}

impl OutcomeWindow {
    /// Creates a window retaining up to `window_size` outcomes, reporting
    /// statistics once `minimum_sample_size` have been recorded.
    pub fn new(window_size: usize, minimum_sample_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            minimum_sample_size: minimum_sample_size.max(1),
            entries: RwLock::new(VecDeque::with_capacity(window_size.max(1))),
        }
    }

    /// Appends an outcome, evicting the oldest entry beyond the window size.
    pub fn record(&self, outcome: CallOutcome) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        entries.push_back(RecordedOutcome::now(outcome));
        while entries.len() > self.window_size {
            entries.pop_front();
        }
    }

    /// Returns current statistics, or `None` while the window holds fewer
    /// than the minimum sample size.
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> Option<WindowStats> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if entries.len() < self.minimum_sample_size {
            return None;
        }

        let failures = entries
            .iter()
            .filter(|e| e.outcome.counts_as_failure())
            .count();
        let slow = entries.iter().filter(|e| e.outcome.is_slow()).count();

        Some(WindowStats {
            sample_count: entries.len(),
            failure_rate: failures as f64 / entries.len() as f64,
            slow_call_rate: slow as f64 / entries.len() as f64,
        })
    }

    /// Returns how many outcomes the window currently holds.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if no outcomes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all recorded outcomes.
    pub fn reset(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_insufficient_data_below_minimum() {
        let window = OutcomeWindow::new(10, 3);

        window.record(CallOutcome::Failure);
        window.record(CallOutcome::Failure);
        assert!(window.stats().is_none());

        window.record(CallOutcome::Failure);
        let stats = window.stats().unwrap();
        assert_eq!(stats.sample_count, 3);
        assert!((stats.failure_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failure_rate_counts_slow_calls() {
        let window = OutcomeWindow::new(10, 1);

        window.record(CallOutcome::Success);
        window.record(CallOutcome::Slow {
            duration: Duration::from_secs(3),
        });

        let stats = window.stats().unwrap();
        assert!((stats.failure_rate - 0.5).abs() < f64::EPSILON);
        assert!((stats.slow_call_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let window = OutcomeWindow::new(3, 1);

        window.record(CallOutcome::Failure);
        window.record(CallOutcome::Failure);
        window.record(CallOutcome::Failure);
        // Pushes the three failures out one by one
        window.record(CallOutcome::Success);
        window.record(CallOutcome::Success);
        window.record(CallOutcome::Success);

        let stats = window.stats().unwrap();
        assert_eq!(stats.sample_count, 3);
        assert!((stats.failure_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_clears_window() {
        let window = OutcomeWindow::new(5, 1);
        window.record(CallOutcome::Failure);
        assert_eq!(window.len(), 1);

        window.reset();
        assert!(window.is_empty());
        assert!(window.stats().is_none());
    }

    #[test]
    fn test_concurrent_record() {
        use std::sync::Arc;

        let window = Arc::new(OutcomeWindow::new(1000, 1));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let window = Arc::clone(&window);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    window.record(CallOutcome::Success);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(window.len(), 800);
    }
}
