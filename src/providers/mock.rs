//! Mock downstream providers for tests and demos.

use crate::core::{CallError, CatalogProvider, MenuItem, NewOrderRequest, Order, OrderProcessor};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// A scriptable in-memory catalog provider.
///
/// Behavior is controlled at runtime so a test can flip the provider
/// between healthy and failing mid-scenario.
#[derive(Debug)]
pub struct MockCatalog {
    items: RwLock<Vec<MenuItem>>,
    latency: RwLock<Duration>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Creates a healthy catalog with a small default menu.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(vec![
                MenuItem::new("espresso", "espresso", 200),
                MenuItem::new("latte", "latte", 250),
                MenuItem::new("capuccino", "capuccino", 300),
            ]),
            latency: RwLock::new(Duration::ZERO),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the catalog contents.
    pub fn with_items(self, items: Vec<MenuItem>) -> Self {
        *self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = items;
        self
    }

    /// Sets a fixed latency added to every call.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self
            .latency
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = latency;
        self
    }

    /// Switches the provider between healthy and failing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns how many times `fetch_all` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn fetch_all(&self) -> Result<Vec<MenuItem>, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self
            .latency
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(CallError::downstream("menu", "catalog unavailable"));
        }

        Ok(self
            .items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }
}

/// A scriptable in-memory order processor.
///
/// Accepted orders are retained so tests can assert what was submitted.
#[derive(Debug)]
pub struct MockOrderProcessor {
    accepted: RwLock<Vec<Order>>,
    latency: RwLock<Duration>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockOrderProcessor {
    /// Creates a healthy order processor.
    pub fn new() -> Self {
        Self {
            accepted: RwLock::new(Vec::new()),
            latency: RwLock::new(Duration::ZERO),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sets a fixed latency added to every call.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self
            .latency
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = latency;
        self
    }

    /// Switches the provider between healthy and failing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns how many times `submit` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the orders accepted so far.
    pub fn accepted_orders(&self) -> Vec<Order> {
        self.accepted
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockOrderProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderProcessor for MockOrderProcessor {
    async fn submit(&self, request: NewOrderRequest) -> Result<Order, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self
            .latency
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(CallError::downstream("order", "order service unavailable"));
        }

        let order = Order::accepted(&request);
        self.accepted
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_returns_items_and_counts_calls() {
        let catalog = MockCatalog::new();

        let items = catalog.fetch_all().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(catalog.calls(), 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_toggle() {
        let catalog = MockCatalog::new();
        catalog.set_failing(true);
        assert!(catalog.fetch_all().await.is_err());

        catalog.set_failing(false);
        assert!(catalog.fetch_all().await.is_ok());
    }

    #[tokio::test]
    async fn test_order_processor_retains_accepted_orders() {
        let processor = MockOrderProcessor::new();
        let request = NewOrderRequest::new("Ray Chu").with_item("capuccino");

        let order = processor.submit(request).await.unwrap();
        assert_eq!(order.customer, "Ray Chu");

        let accepted = processor.accepted_orders();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].id, order.id);
    }

    #[tokio::test]
    async fn test_failing_processor_accepts_nothing() {
        let processor = MockOrderProcessor::new();
        processor.set_failing(true);

        let result = processor.submit(NewOrderRequest::new("Ray Chu")).await;
        assert!(result.is_err());
        assert!(processor.accepted_orders().is_empty());
        assert_eq!(processor.calls(), 1);
    }
}
