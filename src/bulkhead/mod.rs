//! Concurrency admission gate.
//!
//! A bulkhead caps the number of concurrent in-flight calls per resource so
//! one slow downstream cannot exhaust the caller's tasks or connections.
//! Admission is non-blocking: a call at the cap is rejected immediately with
//! [`CallError::BulkheadFull`], never queued.
//!
//! Admission hands out a [`BulkheadPermit`]; dropping the permit releases
//! the slot. Tying release to `Drop` makes it exactly-once on every exit
//! path, including task cancellation.

use crate::core::CallError;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Observability counters for one bulkhead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkheadMetrics {
    /// Calls admitted past the gate.
    pub admitted_calls: u64,
    /// Calls rejected at the concurrency cap.
    pub rejected_calls: u64,
    /// Highest concurrent occupancy observed.
    pub peak_in_flight: u64,
}

/// Shared occupancy state between a bulkhead and its outstanding permits.
#[derive(Debug)]
struct Occupancy {
    in_flight: AtomicUsize,
    admitted: AtomicU64,
    rejected: AtomicU64,
    peak: AtomicU64,
}

/// A per-resource concurrency limiter.
#[derive(Debug)]
pub struct Bulkhead {
    /// Resource name for logging and errors.
    resource: String,
    /// Maximum concurrent in-flight calls.
    max_concurrent_calls: usize,
    /// Occupancy shared with outstanding permits.
    occupancy: Arc<Occupancy>,
}

impl Bulkhead {
    /// Creates a bulkhead admitting up to `max_concurrent_calls` calls at
    /// once. A limit of zero is raised to one.
    pub fn new(resource: impl Into<String>, max_concurrent_calls: usize) -> Self {
        Self {
            resource: resource.into(),
            max_concurrent_calls: max_concurrent_calls.max(1),
            occupancy: Arc::new(Occupancy {
                in_flight: AtomicUsize::new(0),
                admitted: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                peak: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the resource name.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the concurrency limit.
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_concurrent_calls
    }

    /// Returns the current number of in-flight calls.
    pub fn in_flight(&self) -> usize {
        self.occupancy.in_flight.load(Ordering::SeqCst)
    }

    /// Attempts to admit a call without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::BulkheadFull`] when the resource is already at
    /// its concurrency cap.
    pub fn try_acquire(&self) -> Result<BulkheadPermit, CallError> {
        let mut current = self.occupancy.in_flight.load(Ordering::SeqCst);
        loop {
            if current >= self.max_concurrent_calls {
                self.occupancy.rejected.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(
                    resource = %self.resource,
                    in_flight = current,
                    limit = self.max_concurrent_calls,
                    "bulkhead rejected call"
                );
                return Err(CallError::bulkhead_full(&self.resource));
            }
            match self.occupancy.in_flight.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    self.occupancy.admitted.fetch_add(1, Ordering::SeqCst);
                    self.occupancy
                        .peak
                        .fetch_max(current as u64 + 1, Ordering::SeqCst);
                    return Ok(BulkheadPermit {
                        occupancy: Arc::clone(&self.occupancy),
                    });
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns a snapshot of the bulkhead's counters.
    pub fn metrics(&self) -> BulkheadMetrics {
        BulkheadMetrics {
            admitted_calls: self.occupancy.admitted.load(Ordering::SeqCst),
            rejected_calls: self.occupancy.rejected.load(Ordering::SeqCst),
            peak_in_flight: self.occupancy.peak.load(Ordering::SeqCst),
        }
    }
}

/// Proof of admission past a bulkhead.
///
/// The slot is released when the permit is dropped, exactly once, on every
/// exit path.
#[derive(Debug)]
pub struct BulkheadPermit {
    occupancy: Arc<Occupancy>,
}

impl Drop for BulkheadPermit {
    fn drop(&mut self) {
        self.occupancy.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_limit() {
        let bulkhead = Bulkhead::new("menu", 2);

        let first = bulkhead.try_acquire();
        let second = bulkhead.try_acquire();
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(bulkhead.in_flight(), 2);

        let third = bulkhead.try_acquire();
        assert!(matches!(third, Err(CallError::BulkheadFull { .. })));
    }

    #[test]
    fn test_drop_releases_slot() {
        let bulkhead = Bulkhead::new("menu", 1);

        let permit = bulkhead.try_acquire().unwrap();
        assert!(bulkhead.try_acquire().is_err());

        drop(permit);
        assert_eq!(bulkhead.in_flight(), 0);
        assert!(bulkhead.try_acquire().is_ok());
    }

    #[test]
    fn test_zero_limit_raised_to_one() {
        let bulkhead = Bulkhead::new("menu", 0);
        assert_eq!(bulkhead.max_concurrent_calls(), 1);
        assert!(bulkhead.try_acquire().is_ok());
    }

    #[test]
    fn test_metrics_track_admissions_and_rejections() {
        let bulkhead = Bulkhead::new("order", 1);

        let _permit = bulkhead.try_acquire().unwrap();
        let _ = bulkhead.try_acquire();
        let _ = bulkhead.try_acquire();

        let metrics = bulkhead.metrics();
        assert_eq!(metrics.admitted_calls, 1);
        assert_eq!(metrics.rejected_calls, 2);
        assert_eq!(metrics.peak_in_flight, 1);
    }

    #[test]
    fn test_concurrent_acquire_never_exceeds_limit() {
        let bulkhead = Arc::new(Bulkhead::new("order", 4));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..16 {
            let bulkhead = Arc::clone(&bulkhead);
            let max_seen = Arc::clone(&max_seen);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    if let Ok(permit) = bulkhead.try_acquire() {
                        max_seen.fetch_max(bulkhead.in_flight(), Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_micros(50));
                        drop(permit);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(max_seen.load(Ordering::SeqCst) <= 4);
        assert_eq!(bulkhead.in_flight(), 0);
    }
}
