//! The customer-facing call sites.
//!
//! [`CustomerGateway`] wires the two downstream providers through the
//! executor with the asymmetric fallback behavior the two paths need:
//!
//! - **Menu read**: an admission denial degrades to an empty menu. The
//!   caller sees a valid, if useless, response while the catalog recovers.
//! - **Order submission**: every error surfaces. A write that did not
//!   happen must never look like one that did.

use crate::core::{ArcCatalog, ArcOrderProcessor, CallError, MenuItem, NewOrderRequest, Order};
use crate::executor::CallExecutor;
use crate::fallback::FallbackPolicy;

use std::sync::Arc;

/// Registry name of the catalog resource.
pub const MENU_RESOURCE: &str = "menu";

/// Registry name of the order-processing resource.
pub const ORDER_RESOURCE: &str = "order";

/// Guarded facade over the catalog and order-processing providers.
#[derive(Debug, Clone)]
pub struct CustomerGateway {
    executor: CallExecutor,
    catalog: ArcCatalog,
    orders: ArcOrderProcessor,
}

impl CustomerGateway {
    /// Creates a gateway over the given executor and providers.
    ///
    /// The executor's registry must contain the [`MENU_RESOURCE`] and
    /// [`ORDER_RESOURCE`] resources.
    pub fn new(executor: CallExecutor, catalog: ArcCatalog, orders: ArcOrderProcessor) -> Self {
        Self {
            executor,
            catalog,
            orders,
        }
    }

    /// Returns the executor, for observability lookups.
    pub fn executor(&self) -> &CallExecutor {
        &self.executor
    }

    /// Reads the full menu from the catalog provider.
    ///
    /// When the catalog's circuit is open or its bulkhead is saturated this
    /// returns an empty menu instead of an error.
    ///
    /// # Errors
    ///
    /// Returns the downstream error when the catalog was actually invoked
    /// and failed.
    pub async fn read_menu(&self) -> Result<Vec<MenuItem>, CallError> {
        let catalog = Arc::clone(&self.catalog);
        let fallback = FallbackPolicy::on_admission_denied(Vec::new);

        self.executor
            .execute_with_fallback(
                MENU_RESOURCE,
                move || async move { catalog.fetch_all().await },
                &fallback,
            )
            .await
    }

    /// Submits a new order to the order-processing provider.
    ///
    /// # Errors
    ///
    /// Every failure surfaces: admission denials as
    /// [`CallError::CircuitOpen`] or [`CallError::BulkheadFull`], executed
    /// failures as the downstream's error. No substitute order is ever
    /// fabricated.
    pub async fn place_order(&self, request: NewOrderRequest) -> Result<Order, CallError> {
        let orders = Arc::clone(&self.orders);

        let order = self
            .executor
            .execute(ORDER_RESOURCE, move || async move {
                orders.submit(request).await
            })
            .await?;

        tracing::info!(order_id = %order.id, customer = %order.customer, "order placed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::BreakerConfig;
    use crate::executor::{ResourceConfig, ResourceRegistry};
    use crate::providers::{MockCatalog, MockOrderProcessor};
    use std::time::Duration;

    struct Harness {
        gateway: CustomerGateway,
        catalog: Arc<MockCatalog>,
        orders: Arc<MockOrderProcessor>,
    }

    fn harness() -> Harness {
        let breaker = BreakerConfig::new()
            .with_minimum_sample_size(2)
            .with_window_size(4)
            .with_wait_duration_in_open(Duration::from_millis(20))
            .with_success_threshold(1);
        let config = ResourceConfig::new()
            .with_breaker(breaker)
            .with_bulkhead_max_concurrent_calls(2);
        let registry = ResourceRegistry::builder()
            .register(MENU_RESOURCE, config.clone())
            .register(ORDER_RESOURCE, config)
            .build()
            .unwrap();

        let catalog = Arc::new(MockCatalog::new());
        let orders = Arc::new(MockOrderProcessor::new());
        let gateway = CustomerGateway::new(
            CallExecutor::new(registry),
            Arc::clone(&catalog) as ArcCatalog,
            Arc::clone(&orders) as ArcOrderProcessor,
        );
        Harness {
            gateway,
            catalog,
            orders,
        }
    }

    fn force_open(gateway: &CustomerGateway, resource: &str) {
        gateway
            .executor()
            .registry()
            .get(resource)
            .unwrap()
            .breaker()
            .force_open();
    }

    #[tokio::test]
    async fn test_read_menu_healthy() {
        let h = harness();
        let menu = h.gateway.read_menu().await.unwrap();
        assert_eq!(menu.len(), 3);
        assert_eq!(h.catalog.calls(), 1);
    }

    #[tokio::test]
    async fn test_read_menu_with_open_circuit_degrades_to_empty() {
        let h = harness();
        force_open(&h.gateway, MENU_RESOURCE);

        let menu = h.gateway.read_menu().await.unwrap();
        assert!(menu.is_empty());
        // The catalog was never invoked
        assert_eq!(h.catalog.calls(), 0);
    }

    #[tokio::test]
    async fn test_read_menu_downstream_failure_surfaces() {
        let h = harness();
        h.catalog.set_failing(true);

        let result = h.gateway.read_menu().await;
        assert!(matches!(result, Err(CallError::DownstreamFailure { .. })));
        assert_eq!(h.catalog.calls(), 1);
    }

    #[tokio::test]
    async fn test_place_order_healthy() {
        let h = harness();
        let request = NewOrderRequest::new("Ray Chu").with_item("capuccino");

        let order = h.gateway.place_order(request).await.unwrap();
        assert_eq!(order.customer, "Ray Chu");
        assert_eq!(h.orders.accepted_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_with_open_circuit_fails_explicitly() {
        let h = harness();
        force_open(&h.gateway, ORDER_RESOURCE);

        let result = h.gateway.place_order(NewOrderRequest::new("Ray Chu")).await;
        assert!(matches!(result, Err(CallError::CircuitOpen { .. })));
        // No order was fabricated and the processor was never invoked
        assert_eq!(h.orders.calls(), 0);
        assert!(h.orders.accepted_orders().is_empty());
    }

    #[tokio::test]
    async fn test_order_failures_open_circuit_then_menu_still_works() {
        let h = harness();
        h.orders.set_failing(true);

        for _ in 0..2 {
            let _ = h.gateway.place_order(NewOrderRequest::new("Ray Chu")).await;
        }
        let guard = h.gateway.executor().registry().get(ORDER_RESOURCE).unwrap();
        assert!(guard.breaker().state().is_open());

        // The menu resource is independent of the order resource
        let menu = h.gateway.read_menu().await.unwrap();
        assert_eq!(menu.len(), 3);
    }

    #[tokio::test]
    async fn test_order_circuit_recovers_after_wait() {
        let h = harness();
        h.orders.set_failing(true);
        for _ in 0..2 {
            let _ = h.gateway.place_order(NewOrderRequest::new("Ray Chu")).await;
        }

        h.orders.set_failing(false);
        tokio::time::sleep(Duration::from_millis(30)).await;

        // The probe succeeds and closes the circuit (success threshold 1)
        let order = h
            .gateway
            .place_order(NewOrderRequest::new("Ray Chu").with_item("latte"))
            .await
            .unwrap();
        assert_eq!(order.items, vec!["latte".to_string()]);

        let guard = h.gateway.executor().registry().get(ORDER_RESOURCE).unwrap();
        assert!(guard.breaker().state().is_closed());
    }
}
