//! Walkthrough of the resilience layer guarding a catalog and an order
//! service.
//!
//! Run with:
//! ```bash
//! cargo run --example resilient_calls
//! ```

use callguard::gateway::{MENU_RESOURCE, ORDER_RESOURCE};
use callguard::prelude::*;
use callguard::providers::{MockCatalog, MockOrderProcessor};

use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,callguard=debug".into()),
        )
        .init();

    println!("=== Callguard Demo ===\n");

    let breaker = BreakerConfig::new()
        .with_failure_rate_threshold(0.5)
        .with_minimum_sample_size(4)
        .with_window_size(8)
        .with_wait_duration_in_open(Duration::from_millis(500))
        .with_success_threshold(1);
    let config = ResourceConfig::new()
        .with_breaker(breaker)
        .with_bulkhead_max_concurrent_calls(4);

    let registry = ResourceRegistry::builder()
        .register(MENU_RESOURCE, config.clone())
        .register(ORDER_RESOURCE, config)
        .build()?;

    let catalog = Arc::new(MockCatalog::new());
    let orders = Arc::new(MockOrderProcessor::new());
    let gateway = CustomerGateway::new(
        CallExecutor::new(registry),
        Arc::clone(&catalog) as ArcCatalog,
        Arc::clone(&orders) as ArcOrderProcessor,
    );

    // 1. Healthy reads and a healthy order.
    println!("1. Reading the menu from a healthy catalog...");
    let menu = gateway.read_menu().await?;
    for item in &menu {
        println!("   {} ({} cents)", item.name, item.price_cents);
    }

    println!("\n2. Placing an order...");
    let order = gateway
        .place_order(NewOrderRequest::new("Ray Chu").with_item("capuccino"))
        .await?;
    println!("   order {} accepted for {}", order.id, order.customer);

    // 2. The catalog starts failing; enough failures open its circuit.
    println!("\n3. Catalog starts failing; driving the circuit open...");
    catalog.set_failing(true);
    for attempt in 1..=4 {
        match gateway.read_menu().await {
            Ok(items) => println!("   attempt {attempt}: {} items", items.len()),
            Err(error) => println!("   attempt {attempt}: {error}"),
        }
    }

    let guard = gateway.executor().registry().get(MENU_RESOURCE)?;
    println!("   menu circuit is now: {}", guard.breaker().state().name());

    // 3. With the circuit open, reads degrade to an empty menu and the
    //    catalog is no longer invoked.
    println!("\n4. Reading the menu with the circuit open...");
    let calls_before = catalog.calls();
    let menu = gateway.read_menu().await?;
    println!(
        "   got {} items; catalog invoked {} more times",
        menu.len(),
        catalog.calls() - calls_before
    );

    // 4. Orders keep flowing; the two resources are independent.
    println!("\n5. Orders are unaffected by the menu circuit...");
    let order = gateway
        .place_order(NewOrderRequest::new("Ray Chu").with_item("latte"))
        .await?;
    println!("   order {} accepted", order.id);

    // 5. The catalog recovers; after the wait the probe closes the circuit.
    println!("\n6. Catalog recovers; waiting for the probe window...");
    catalog.set_failing(false);
    tokio::time::sleep(Duration::from_millis(600)).await;

    let menu = gateway.read_menu().await?;
    println!(
        "   menu is back with {} items; circuit is {}",
        menu.len(),
        guard.breaker().state().name()
    );

    let metrics = guard.breaker().metrics();
    println!("\n=== Menu breaker metrics ===");
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}
