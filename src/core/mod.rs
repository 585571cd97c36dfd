//! Core types and traits for the callguard library.
//!
//! This module provides the fundamental building blocks used throughout
//! the library:
//!
//! - [`error`] - Structured error types
//! - [`outcome`] - Call outcome classification for breaker statistics
//! - [`types`] - Domain types for the catalog and order call sites
//! - [`traits`] - The downstream provider traits

pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;

// Re-export commonly used types at the core level
pub use error::CallError;
pub use outcome::{CallOutcome, RecordedOutcome};
pub use traits::{ArcCatalog, ArcOrderProcessor, CatalogProvider, OrderProcessor};
pub use types::{CallContext, MenuItem, NewOrderRequest, Order, OrderState};
