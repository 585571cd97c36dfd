//! Per-call-site fallback behavior.
//!
//! A [`FallbackPolicy`] decides what happens to a guarded call's error. Read
//! paths typically recover admission denials with a cheap default (an empty
//! menu); write paths propagate everything so no order is ever fabricated.

use crate::core::CallError;

use std::fmt;

type RecoverFn<T> = Box<dyn Fn(&CallError) -> Option<T> + Send + Sync>;

/// Maps a guarded call's error to a substitute value, or re-raises it.
pub enum FallbackPolicy<T> {
    /// Every error surfaces to the caller unchanged.
    Propagate,
    /// A closure inspects the error; `Some` replaces it with a substitute
    /// value, `None` propagates it.
    Recover(RecoverFn<T>),
}

impl<T> FallbackPolicy<T> {
    /// Builds a policy from an arbitrary recovery closure.
    pub fn recover<F>(f: F) -> Self
    where
        F: Fn(&CallError) -> Option<T> + Send + Sync + 'static,
    {
        Self::Recover(Box::new(f))
    }

    /// Recovers admission denials (bulkhead saturation, open circuit) with
    /// the supplied default; downstream failures still propagate.
    pub fn on_admission_denied<F>(default: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::recover(move |error| {
            if error.is_admission_denied() {
                Some(default())
            } else {
                None
            }
        })
    }

    /// Applies the policy to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error when the policy propagates it.
    pub fn apply(&self, error: CallError) -> Result<T, CallError> {
        match self {
            Self::Propagate => Err(error),
            Self::Recover(f) => match f(&error) {
                Some(value) => {
                    tracing::debug!(error = %error, "fallback recovered guarded call");
                    Ok(value)
                }
                None => Err(error),
            },
        }
    }
}

impl<T> fmt::Debug for FallbackPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => write!(f, "FallbackPolicy::Propagate"),
            Self::Recover(_) => write!(f, "FallbackPolicy::Recover(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MenuItem;
    use std::time::Duration;

    #[test]
    fn test_propagate_surfaces_every_error() {
        let policy: FallbackPolicy<Vec<MenuItem>> = FallbackPolicy::Propagate;

        let result = policy.apply(CallError::circuit_open("order", None));
        assert!(matches!(result, Err(CallError::CircuitOpen { .. })));
    }

    #[test]
    fn test_admission_denial_recovers_with_default() {
        let policy: FallbackPolicy<Vec<MenuItem>> =
            FallbackPolicy::on_admission_denied(Vec::new);

        let menu = policy.apply(CallError::circuit_open("menu", None)).unwrap();
        assert!(menu.is_empty());

        let menu = policy.apply(CallError::bulkhead_full("menu")).unwrap();
        assert!(menu.is_empty());
    }

    #[test]
    fn test_downstream_failures_still_propagate() {
        let policy: FallbackPolicy<Vec<MenuItem>> =
            FallbackPolicy::on_admission_denied(Vec::new);

        let result = policy.apply(CallError::downstream("menu", "connection refused"));
        assert!(matches!(result, Err(CallError::DownstreamFailure { .. })));

        let result = policy.apply(CallError::timeout("menu", Duration::from_secs(2)));
        assert!(matches!(result, Err(CallError::Timeout { .. })));
    }

    #[test]
    fn test_custom_recover_closure() {
        let policy = FallbackPolicy::recover(|error| match error {
            CallError::BulkheadFull { .. } => Some(42),
            _ => None,
        });

        assert_eq!(policy.apply(CallError::bulkhead_full("menu")).unwrap(), 42);
        assert!(policy.apply(CallError::circuit_open("menu", None)).is_err());
    }
}
