//! Error types for the callguard library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values.
//! Nothing here is fatal to the process: admission denials are local,
//! retry-safe signals, and downstream failures are surfaced after being
//! recorded.

use std::time::Duration;
use thiserror::Error;

/// The main error type for guarded call operations.
///
/// All error variants include the resource they relate to where one exists,
/// enabling proper error handling and per-resource observability.
#[derive(Debug, Error)]
pub enum CallError {
    /// The bulkhead rejected the call: the resource is saturated with
    /// concurrent in-flight calls.
    #[error("bulkhead full for resource '{resource}': concurrent call limit reached")]
    BulkheadFull {
        /// Name of the saturated resource.
        resource: String,
    },

    /// The circuit breaker denied the call: the downstream is presumed
    /// unhealthy and calls fail fast until it recovers.
    #[error("circuit breaker open for resource '{resource}'")]
    CircuitOpen {
        /// Name of the resource with an open circuit.
        resource: String,
        /// When the circuit might permit calls again (if known).
        recovery_hint: Option<String>,
    },

    /// The call was executed and the downstream returned an error.
    #[error("downstream call for resource '{resource}' failed: {message}")]
    DownstreamFailure {
        /// Name of the resource that failed.
        resource: String,
        /// Error message from the downstream.
        message: String,
    },

    /// The call exceeded a hard timeout.
    #[error("call for resource '{resource}' timed out after {elapsed:?}")]
    Timeout {
        /// Name of the resource that timed out.
        resource: String,
        /// How long the call ran before timing out.
        elapsed: Duration,
    },

    /// The executor was asked for a resource the registry does not know.
    #[error("unknown resource '{resource}'")]
    UnknownResource {
        /// The unregistered resource name.
        resource: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl CallError {
    /// Returns `true` if this error is an admission-control denial
    /// (bulkhead saturation or open circuit) rather than an executed call
    /// that failed.
    ///
    /// Admission denials are recoverable locally by a fallback policy;
    /// downstream failures always surface to the caller.
    pub fn is_admission_denied(&self) -> bool {
        matches!(self, Self::BulkheadFull { .. } | Self::CircuitOpen { .. })
    }

    /// Returns `true` if the call was executed and failed downstream.
    pub fn is_downstream_failure(&self) -> bool {
        matches!(self, Self::DownstreamFailure { .. } | Self::Timeout { .. })
    }

    /// Returns the resource name if this error is associated with one.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::BulkheadFull { resource }
            | Self::CircuitOpen { resource, .. }
            | Self::DownstreamFailure { resource, .. }
            | Self::Timeout { resource, .. }
            | Self::UnknownResource { resource } => Some(resource),
            Self::Configuration { .. } => None,
        }
    }

    /// Creates a `BulkheadFull` error.
    pub fn bulkhead_full(resource: impl Into<String>) -> Self {
        Self::BulkheadFull {
            resource: resource.into(),
        }
    }

    /// Creates a `CircuitOpen` error.
    pub fn circuit_open(resource: impl Into<String>, recovery_hint: Option<String>) -> Self {
        Self::CircuitOpen {
            resource: resource.into(),
            recovery_hint,
        }
    }

    /// Creates a `DownstreamFailure` error.
    pub fn downstream(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownstreamFailure {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Creates a `Timeout` error.
    pub fn timeout(resource: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            resource: resource.into(),
            elapsed,
        }
    }

    /// Creates an `UnknownResource` error.
    pub fn unknown_resource(resource: impl Into<String>) -> Self {
        Self::UnknownResource {
            resource: resource.into(),
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_denied_predicate() {
        assert!(CallError::bulkhead_full("menu").is_admission_denied());
        assert!(CallError::circuit_open("menu", None).is_admission_denied());
        assert!(!CallError::downstream("menu", "boom").is_admission_denied());
        assert!(!CallError::configuration("bad").is_admission_denied());
    }

    #[test]
    fn test_downstream_failure_predicate() {
        assert!(CallError::downstream("order", "boom").is_downstream_failure());
        assert!(CallError::timeout("order", Duration::from_secs(5)).is_downstream_failure());
        assert!(!CallError::circuit_open("order", None).is_downstream_failure());
    }

    #[test]
    fn test_resource_accessor() {
        let err = CallError::bulkhead_full("order");
        assert_eq!(err.resource(), Some("order"));

        let err = CallError::configuration("missing threshold");
        assert_eq!(err.resource(), None);
    }

    #[test]
    fn test_error_display() {
        let err = CallError::circuit_open("menu", None);
        assert!(err.to_string().contains("menu"));

        let err = CallError::timeout("order", Duration::from_millis(250));
        assert!(err.to_string().contains("order"));
        assert!(err.to_string().contains("250"));
    }
}
