//! Core traits for the callguard library.
//!
//! This module defines the traits the two downstream collaborators
//! implement. The resilience core never talks to a transport directly; it
//! invokes these traits through the executor, so HTTP clients, stubs, and
//! test doubles are interchangeable.

use crate::core::error::CallError;
use crate::core::types::{MenuItem, NewOrderRequest, Order};

use async_trait::async_trait;
use std::fmt::Debug;

/// The downstream catalog provider.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync` for use in async contexts.
/// - Implementations should never panic; all failures should be returned
///   as `CallError::DownstreamFailure` or `CallError::Timeout`.
#[async_trait]
pub trait CatalogProvider: Send + Sync + Debug {
    /// Fetches every available item from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CallError::DownstreamFailure` when the provider is
    /// unreachable or returns an error, `CallError::Timeout` when the call
    /// exceeds a hard deadline.
    async fn fetch_all(&self) -> Result<Vec<MenuItem>, CallError>;
}

/// The downstream order-processing provider.
#[async_trait]
pub trait OrderProcessor: Send + Sync + Debug {
    /// Submits a new order and returns the created order.
    ///
    /// # Errors
    ///
    /// Returns `CallError::DownstreamFailure` when the provider rejects or
    /// cannot process the request, `CallError::Timeout` on a hard deadline.
    async fn submit(&self, request: NewOrderRequest) -> Result<Order, CallError>;
}

/// An arc-wrapped catalog provider for shared ownership.
pub type ArcCatalog = std::sync::Arc<dyn CatalogProvider>;

/// An arc-wrapped order processor for shared ownership.
pub type ArcOrderProcessor = std::sync::Arc<dyn OrderProcessor>;
