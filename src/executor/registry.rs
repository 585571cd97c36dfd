//! Per-resource guard registry.

use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::bulkhead::Bulkhead;
use crate::core::CallError;

use std::collections::HashMap;
use std::sync::Arc;

/// Resilience configuration for one named resource.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Circuit breaker parameters.
    pub breaker: BreakerConfig,
    /// Maximum concurrent in-flight calls admitted by the bulkhead.
    pub bulkhead_max_concurrent_calls: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            breaker: BreakerConfig::default(),
            bulkhead_max_concurrent_calls: 25,
        }
    }
}

impl ResourceConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the breaker configuration.
    pub fn with_breaker(mut self, breaker: BreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Sets the bulkhead concurrency limit.
    pub fn with_bulkhead_max_concurrent_calls(mut self, limit: usize) -> Self {
        self.bulkhead_max_concurrent_calls = limit;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Configuration` when a parameter is outside its
    /// valid range.
    pub fn validate(&self) -> Result<(), CallError> {
        self.breaker.validate()?;
        if self.bulkhead_max_concurrent_calls == 0 {
            return Err(CallError::configuration(
                "bulkhead_max_concurrent_calls must be at least 1",
            ));
        }
        Ok(())
    }
}

/// The guard pair owned by the registry for one resource.
#[derive(Debug)]
pub struct ResourceGuard {
    breaker: CircuitBreaker,
    bulkhead: Bulkhead,
}

impl ResourceGuard {
    fn new(resource: &str, config: &ResourceConfig) -> Result<Self, CallError> {
        Ok(Self {
            breaker: CircuitBreaker::new(resource, config.breaker.clone())?,
            bulkhead: Bulkhead::new(resource, config.bulkhead_max_concurrent_calls),
        })
    }

    /// Returns the resource's circuit breaker.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Returns the resource's bulkhead.
    pub fn bulkhead(&self) -> &Bulkhead {
        &self.bulkhead
    }
}

/// Immutable map from resource name to its guard pair.
///
/// Built once at startup through the builder; guards for distinct resources
/// share no state, so calls against different resources never contend.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    guards: Arc<HashMap<String, Arc<ResourceGuard>>>,
}

impl ResourceRegistry {
    /// Starts building a registry.
    pub fn builder() -> ResourceRegistryBuilder {
        ResourceRegistryBuilder::default()
    }

    /// Looks up the guard pair for a resource.
    ///
    /// # Errors
    ///
    /// Returns `CallError::UnknownResource` for a name that was never
    /// registered.
    pub fn get(&self, resource: &str) -> Result<Arc<ResourceGuard>, CallError> {
        self.guards
            .get(resource)
            .cloned()
            .ok_or_else(|| CallError::unknown_resource(resource))
    }

    /// Returns the registered resource names.
    pub fn resources(&self) -> Vec<&str> {
        self.guards.keys().map(String::as_str).collect()
    }
}

/// Builder for [`ResourceRegistry`].
#[derive(Debug, Default)]
pub struct ResourceRegistryBuilder {
    configs: Vec<(String, ResourceConfig)>,
}

impl ResourceRegistryBuilder {
    /// Registers a resource with its configuration. Registering the same
    /// name twice keeps the last configuration.
    pub fn register(mut self, resource: impl Into<String>, config: ResourceConfig) -> Self {
        self.configs.push((resource.into(), config));
        self
    }

    /// Validates all configurations and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Configuration` when any registered configuration
    /// is invalid, or when no resource was registered.
    pub fn build(self) -> Result<ResourceRegistry, CallError> {
        if self.configs.is_empty() {
            return Err(CallError::configuration(
                "registry must contain at least one resource",
            ));
        }

        let mut guards = HashMap::with_capacity(self.configs.len());
        for (resource, config) in self.configs {
            config.validate().map_err(|e| {
                CallError::configuration(format!("resource '{resource}': {e}"))
            })?;
            let guard = ResourceGuard::new(&resource, &config).map_err(|e| {
                CallError::configuration(format!("resource '{resource}': {e}"))
            })?;
            guards.insert(resource, Arc::new(guard));
        }

        tracing::debug!(resources = guards.len(), "resource registry built");
        Ok(ResourceRegistry {
            guards: Arc::new(guards),
        })
    }
}
