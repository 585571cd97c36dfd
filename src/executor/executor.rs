//! The resilient call executor.

use crate::breaker::BreakerState;
use crate::bulkhead::BulkheadPermit;
use crate::core::{CallContext, CallError};
use crate::executor::registry::{ResourceGuard, ResourceRegistry};
use crate::fallback::FallbackPolicy;

use std::future::Future;
use std::sync::Arc;

/// Composes bulkhead admission, breaker permission, the downstream call,
/// and outcome reporting behind one entry point.
///
/// Cheap to clone; clones share the registry and therefore the per-resource
/// guard state.
#[derive(Debug, Clone)]
pub struct CallExecutor {
    registry: ResourceRegistry,
}

/// Tracks one admitted call until its outcome is reported.
///
/// Dropping an `InFlight` whose outcome was never reported counts the call
/// as a failure, so an abandoned call (task cancellation) still feeds the
/// breaker. The bulkhead permit is released only after the outcome report,
/// on every path.
struct InFlight {
    guard: Arc<ResourceGuard>,
    permit: Option<BulkheadPermit>,
    context: CallContext,
    reported: bool,
}

impl InFlight {
    fn new(guard: Arc<ResourceGuard>, permit: BulkheadPermit, context: CallContext) -> Self {
        Self {
            guard,
            permit: Some(permit),
            context,
            reported: false,
        }
    }

    fn succeed(mut self) {
        self.guard.breaker().on_success(self.context.elapsed());
        self.reported = true;
    }

    fn fail(mut self) {
        self.guard.breaker().on_failure(self.context.elapsed());
        self.reported = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.reported {
            self.guard.breaker().on_failure(self.context.elapsed());
        }
        drop(self.permit.take());
    }
}

impl CallExecutor {
    /// Creates an executor over the given registry.
    pub fn new(registry: ResourceRegistry) -> Self {
        Self { registry }
    }

    /// Returns the underlying registry, for observability lookups.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Runs one guarded call against a named resource.
    ///
    /// Admission order is bulkhead first, then breaker. A denial at either
    /// gate returns before the downstream is invoked. After a permitted
    /// invocation the measured outcome is reported to the breaker before
    /// the bulkhead slot is released, whether the call succeeded, failed,
    /// or was abandoned.
    ///
    /// # Errors
    ///
    /// - [`CallError::UnknownResource`] for an unregistered resource.
    /// - [`CallError::BulkheadFull`] when the resource is saturated.
    /// - [`CallError::CircuitOpen`] while the breaker denies calls.
    /// - The downstream's own error, after it was recorded as a failure.
    pub async fn execute<T, F, Fut>(&self, resource: &str, call: F) -> Result<T, CallError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let context = CallContext::new(resource);
        let guard = self.registry.get(resource)?;

        let permit = guard.bulkhead().try_acquire()?;

        if !guard.breaker().try_acquire().is_permitted() {
            drop(permit);
            tracing::warn!(
                resource,
                call_id = %context.call_id,
                "call denied by open circuit"
            );
            return Err(CallError::circuit_open(resource, recovery_hint(&guard)));
        }

        let call_id = context.call_id;
        let in_flight = InFlight::new(Arc::clone(&guard), permit, context);
        tracing::debug!(resource, call_id = %call_id, "issuing guarded call");

        match call().await {
            Ok(value) => {
                in_flight.succeed();
                Ok(value)
            }
            Err(error) => {
                in_flight.fail();
                tracing::warn!(
                    resource,
                    call_id = %call_id,
                    error = %error,
                    "guarded call failed"
                );
                Err(error)
            }
        }
    }

    /// Runs one guarded call, applying a fallback policy to any error.
    ///
    /// # Errors
    ///
    /// Returns whatever error the policy propagates.
    pub async fn execute_with_fallback<T, F, Fut>(
        &self,
        resource: &str,
        call: F,
        fallback: &FallbackPolicy<T>,
    ) -> Result<T, CallError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        match self.execute(resource, call).await {
            Ok(value) => Ok(value),
            Err(error) => fallback.apply(error),
        }
    }
}

/// Estimates when an open circuit will next permit a probe.
fn recovery_hint(guard: &ResourceGuard) -> Option<String> {
    match guard.breaker().state() {
        BreakerState::Open { opened_at } => {
            let remaining = guard
                .breaker()
                .config()
                .wait_duration_in_open
                .saturating_sub(opened_at.elapsed());
            Some(format!("retry in approximately {remaining:?}"))
        }
        _ => None,
    }
}
