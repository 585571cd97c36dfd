//! Downstream provider implementations.
//!
//! Production deployments implement [`crate::core::CatalogProvider`] and
//! [`crate::core::OrderProcessor`] over their own transport. The mock
//! providers here back the tests and the runnable demo.

mod mock;

pub use mock::{MockCatalog, MockOrderProcessor};
