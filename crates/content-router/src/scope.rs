//! Cancellation scopes for dispatch lifetimes.
//!
//! A [`Scope`] is the cancellation/deadline-bearing parent that callers pass
//! into [`Router::route`](crate::router::Router::route). It is threaded
//! through to the [`Context`](crate::context::Context) and observable by
//! handlers and middleware — but the engine itself never polls or enforces
//! it. A handler that ignores its scope runs to completion regardless.
//!
//! Scopes are cheap to clone and form a tree: [`child`](Scope::child) makes
//! a scope that is cancelled when its parent is cancelled, but whose own
//! [`cancel`](Scope::cancel) leaves the parent untouched. Request-scoped
//! metadata rides along through [`with_value`](Scope::with_value) and is
//! looked up parent-ward.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::context::Value;
use crate::error::ScopeError;

/// A cancellation scope with an optional deadline and a value chain.
///
/// # Example
///
/// ```
/// use content_router::Scope;
/// use std::time::Duration;
///
/// let scope = Scope::background()
///     .with_timeout(Duration::from_secs(5))
///     .with_value("request_id", "r-17");
///
/// assert!(!scope.is_cancelled());
/// assert_eq!(scope.value("request_id").and_then(|v| v.as_str()), Some("r-17"));
///
/// scope.cancel();
/// assert!(scope.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scope {
    token: CancellationToken,
    deadline: Option<Instant>,
    values: Option<Arc<ValueNode>>,
}

#[derive(Debug)]
struct ValueNode {
    key: String,
    value: Value,
    parent: Option<Arc<ValueNode>>,
}

impl Scope {
    /// Creates a root scope with no deadline and no values.
    pub fn background() -> Self {
        Self::default()
    }

    /// Creates a child scope.
    ///
    /// Cancelling the parent cancels the child; cancelling the child does
    /// not affect the parent. The deadline and value chain are inherited.
    pub fn child(&self) -> Scope {
        Scope {
            token: self.token.child_token(),
            deadline: self.deadline,
            values: self.values.clone(),
        }
    }

    /// Returns a scope bounded by `deadline`.
    ///
    /// When the scope already carries an earlier deadline, the earlier one
    /// is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns a scope bounded by `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns a scope carrying `key` → `value`.
    ///
    /// Values are immutable once attached; re-attaching a key shadows the
    /// older entry for this scope and its descendants.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values = Some(Arc::new(ValueNode {
            key: key.into(),
            value: value.into(),
            parent: self.values.take(),
        }));
        self
    }

    /// Cancels this scope and all scopes derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the scope is cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Explains why the scope is no longer live, or `None` while it is.
    ///
    /// A passed deadline reports [`ScopeError::DeadlineExceeded`] even when
    /// the scope was also cancelled explicitly.
    pub fn err(&self) -> Option<ScopeError> {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(ScopeError::DeadlineExceeded)
        } else if self.token.is_cancelled() {
            Some(ScopeError::Cancelled)
        } else {
            None
        }
    }

    /// An awaitable done-signal for async callers.
    ///
    /// Resolves when the scope is cancelled. The deadline is not wired into
    /// this future; deadline-aware callers should combine it with their own
    /// timer.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Looks up `key` in this scope's value chain, nearest entry first.
    pub fn value(&self, key: &str) -> Option<&Value> {
        let mut node = self.values.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return Some(&n.value);
            }
            node = n.parent.as_deref();
        }
        None
    }
}
