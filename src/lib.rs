//! # Callguard
//!
//! A client-side resilience layer that guards the outbound calls a service
//! makes to its downstream collaborators.
//!
//! ## Overview
//!
//! Callguard wraps each downstream call in two admission checks and an
//! outcome feedback loop:
//!
//! - A **circuit breaker** per named resource detects sustained downstream
//!   failure from a sliding window of recent call outcomes and stops issuing
//!   calls until the downstream is judged healthy again.
//! - A **bulkhead** per named resource caps the number of concurrent
//!   in-flight calls so one slow downstream cannot exhaust the caller's
//!   resources.
//! - A **call executor** composes bulkhead admission, breaker permission,
//!   the downstream invocation, and outcome reporting behind a single entry
//!   point.
//! - A **fallback policy** per call site maps denials and failures to a
//!   substitute result, or re-raises them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use callguard::prelude::*;
//! use callguard::providers::{MockCatalog, MockOrderProcessor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ResourceRegistry::builder()
//!         .register("menu", ResourceConfig::default())
//!         .register("order", ResourceConfig::default())
//!         .build()?;
//!
//!     let gateway = CustomerGateway::new(
//!         CallExecutor::new(registry),
//!         Arc::new(MockCatalog::new()),
//!         Arc::new(MockOrderProcessor::new()),
//!     );
//!
//!     // Degrades to an empty menu when the catalog circuit is open.
//!     let menu = gateway.read_menu().await?;
//!     println!("{} items on the menu", menu.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: fundamental types, provider traits, and error handling
//! - **Recorder**: the sliding window of recent call outcomes
//! - **Breaker**: the CLOSED / OPEN / HALF_OPEN state machine
//! - **Bulkhead**: the concurrency admission gate
//! - **Executor**: per-resource registry and resilient call composition
//! - **Fallback**: per-call-site substitute behavior
//! - **Gateway**: the two concrete call sites (catalog read, order write)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod breaker;
pub mod bulkhead;
pub mod core;
pub mod executor;
pub mod fallback;
pub mod gateway;
pub mod providers;
pub mod recorder;

// Re-export commonly used types at the crate root
pub use crate::breaker::{BreakerConfig, BreakerMetrics, BreakerState, CircuitBreaker, Permission};
pub use crate::bulkhead::{Bulkhead, BulkheadMetrics, BulkheadPermit};
pub use crate::core::{
    ArcCatalog, ArcOrderProcessor, CallContext, CallError, CallOutcome, CatalogProvider, MenuItem,
    NewOrderRequest, Order, OrderProcessor, OrderState,
};
pub use crate::executor::{CallExecutor, ResourceConfig, ResourceRegistry};
pub use crate::fallback::FallbackPolicy;
pub use crate::gateway::CustomerGateway;
pub use crate::recorder::{OutcomeWindow, WindowStats};

/// Prelude module for convenient imports.
///
/// ```rust
/// use callguard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::breaker::{
        BreakerConfig, BreakerMetrics, BreakerState, CircuitBreaker, Permission,
    };
    pub use crate::bulkhead::{Bulkhead, BulkheadMetrics, BulkheadPermit};
    pub use crate::core::{
        ArcCatalog, ArcOrderProcessor, CallContext, CallError, CallOutcome, CatalogProvider,
        MenuItem, NewOrderRequest, Order, OrderProcessor, OrderState,
    };
    pub use crate::executor::{CallExecutor, ResourceConfig, ResourceRegistry};
    pub use crate::fallback::FallbackPolicy;
    pub use crate::gateway::CustomerGateway;
    pub use crate::recorder::{OutcomeWindow, WindowStats};
}
