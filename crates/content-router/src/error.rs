//! Unified error types for the content-router framework.
//!
//! Handler and middleware errors are opaque to the engine: they travel as
//! [`BoxError`] and propagate verbatim through the middleware stack. The
//! engine's own failure modes are small and explicit — scope expiry
//! ([`ScopeError`]), pattern DSL rejection ([`PatternError`]), and captured
//! runtime faults ([`Fault`]).

use std::backtrace::Backtrace;

use thiserror::Error;

/// A type-erased, thread-safe error.
///
/// Handlers and middleware return whatever error type suits them; the
/// dispatch engine never inspects it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The result of executing a handler, a middleware chain, or a dispatch.
pub type RouteResult = Result<(), BoxError>;

// =============================================================================
// Scope Errors
// =============================================================================

/// Why a [`Scope`](crate::scope::Scope) is no longer live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The scope (or one of its ancestors) was cancelled.
    #[error("scope cancelled")]
    Cancelled,

    /// The scope's deadline has passed.
    #[error("scope deadline exceeded")]
    DeadlineExceeded,
}

// =============================================================================
// Pattern Errors
// =============================================================================

/// Errors raised while parsing a route pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern starts with `/` but names no known form.
    ///
    /// Known forms: `/prefix/`, `/suffix/`, `/contains/`, `/regex/`.
    #[error("unknown pattern form: '{0}'")]
    UnknownForm(String),

    /// The `/regex/` body failed to compile.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

// =============================================================================
// Faults
// =============================================================================

/// A captured abnormal termination of a handler or middleware.
///
/// Produced by [`catch_fault`](crate::middleware::catch_fault), which turns
/// an unwinding panic into this structured error value. Carries the panic
/// message and a backtrace snapshot taken at the capture site.
#[derive(Debug)]
pub struct Fault {
    message: String,
    backtrace: Backtrace,
}

// Hand-written impls: a derive would special-case the `Backtrace` field
// and tie the crate to an unstable `Error::provide` API.
impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "handler fault: {}", self.message)
    }
}

impl std::error::Error for Fault {}

impl Fault {
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            message,
            backtrace: Backtrace::capture(),
        }
    }

    /// The panic message, when the payload was a string.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The stack snapshot taken when the fault was captured.
    ///
    /// Populated only when backtraces are enabled for the process (e.g.
    /// `RUST_BACKTRACE=1`).
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_from_str_payload() {
        let fault = Fault::from_panic(Box::new("boom"));
        assert_eq!(fault.message(), "boom");
        assert_eq!(fault.to_string(), "handler fault: boom");
    }

    #[test]
    fn test_fault_converts_to_box_error() {
        let fault = Fault::from_panic(Box::new("boom"));
        let err: BoxError = fault.into();
        assert_eq!(err.to_string(), "handler fault: boom");
        assert!(err.downcast_ref::<Fault>().is_some());
    }

    #[test]
    fn test_fault_from_string_payload() {
        let fault = Fault::from_panic(Box::new(String::from("kaput")));
        assert_eq!(fault.message(), "kaput");
    }

    #[test]
    fn test_fault_from_opaque_payload() {
        let fault = Fault::from_panic(Box::new(7usize));
        assert_eq!(fault.message(), "non-string panic payload");
    }

    #[test]
    fn test_scope_error_display() {
        assert_eq!(ScopeError::Cancelled.to_string(), "scope cancelled");
        assert_eq!(
            ScopeError::DeadlineExceeded.to_string(),
            "scope deadline exceeded"
        );
    }
}
