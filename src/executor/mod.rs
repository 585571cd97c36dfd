//! Resilient call composition.
//!
//! The executor is the single entry point for guarded downstream calls. It
//! looks up the per-resource guard pair (bulkhead plus circuit breaker) in
//! the [`ResourceRegistry`], runs the admission checks in order, invokes the
//! call, and feeds the measured outcome back to the breaker before the
//! bulkhead slot is released.

mod executor;
mod registry;

pub use executor::CallExecutor;
pub use registry::{ResourceConfig, ResourceGuard, ResourceRegistry, ResourceRegistryBuilder};
