//! Domain types for the catalog and order call sites.
//!
//! These are the request and response shapes the two downstream
//! collaborators exchange. Callguard does not validate order contents or
//! persist anything; the types exist so the call sites have concrete values
//! to move through the executor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// A single item in the downstream catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable catalog identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in the smallest currency unit.
    pub price_cents: u32,
}

impl MenuItem {
    /// Creates a new menu item.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents,
        }
    }
}

/// A request to create a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    /// Name of the ordering customer.
    pub customer: String,

    /// Names of the ordered items.
    pub items: Vec<String>,
}

impl NewOrderRequest {
    /// Creates a request for the given customer with no items.
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            items: Vec::new(),
        }
    }

    /// Adds a single item to the request.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Replaces the item list.
    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }
}

/// Lifecycle state of an order on the downstream side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Created, not yet paid.
    Init,
    /// Payment received.
    Paid,
    /// Being prepared.
    Brewing,
    /// Ready for pickup.
    Brewed,
    /// Picked up by the customer.
    Taken,
    /// Cancelled.
    Cancelled,
}

/// An order created by the order-processing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier assigned by the downstream.
    pub id: Uuid,

    /// Name of the ordering customer.
    pub customer: String,

    /// Names of the ordered items.
    pub items: Vec<String>,

    /// Current lifecycle state.
    pub state: OrderState,

    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a freshly accepted order from a request.
    pub fn accepted(request: &NewOrderRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer: request.customer.clone(),
            items: request.items.clone(),
            state: OrderState::Init,
            created_at: Utc::now(),
        }
    }
}

/// Ephemeral value representing one call attempt.
///
/// Carries the resource name, a correlation id for tracing, and the start
/// time. Never persisted beyond the call's lifetime.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Name of the resource being called.
    pub resource: String,

    /// Correlation id for log lines belonging to this attempt.
    pub call_id: Uuid,

    /// When the attempt started.
    pub started_at: Instant,
}

impl CallContext {
    /// Starts a new call attempt against the given resource.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            call_id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }

    /// Returns how long this attempt has been running.
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_builder() {
        let request = NewOrderRequest::new("Ray Chu").with_item("capuccino");
        assert_eq!(request.customer, "Ray Chu");
        assert_eq!(request.items, vec!["capuccino".to_string()]);
    }

    #[test]
    fn test_order_accepted_from_request() {
        let request = NewOrderRequest::new("Ray Chu").with_item("latte");
        let order = Order::accepted(&request);

        assert_eq!(order.customer, "Ray Chu");
        assert_eq!(order.items, vec!["latte".to_string()]);
        assert_eq!(order.state, OrderState::Init);
    }

    #[test]
    fn test_distinct_orders_get_distinct_ids() {
        let request = NewOrderRequest::new("Ray Chu");
        let a = Order::accepted(&request);
        let b = Order::accepted(&request);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_call_context_carries_resource() {
        let ctx = CallContext::new("menu");
        assert_eq!(ctx.resource, "menu");
    }
}
