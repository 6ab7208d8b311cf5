//! Per-dispatch contexts and their value store.
//!
//! A [`Context`] is the carrier threaded through one dispatch: it wraps the
//! caller's cancellation [`Scope`], the payload [`Buffer`], and a key-value
//! store for cross-middleware state. Contexts are pooled by the router —
//! on release the store is purged, the buffer detached, and the scope
//! dropped, so a reused context never leaks state between dispatches.
//!
//! # Forking
//!
//! [`fork`](Context::fork) produces an independent child context: the value
//! store is copied (mutations on either side stay invisible to the other)
//! while the buffer is *shared* through an `Arc`. The first mutable access
//! to a shared buffer detaches it copy-on-write, so un-forked contexts
//! mutate their buffer in place with no copying at all.
//! [`fork_with_buffer`](Context::fork_with_buffer) substitutes a different
//! buffer instead of sharing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use content_router_core::{Buffer, Reset};

use crate::scope::Scope;

// =============================================================================
// Value — tagged store entries
// =============================================================================

/// A value stored in a [`Context`] or carried by a [`Scope`].
///
/// The store is heterogeneous but closed: every entry is one of these
/// variants, and the typed accessors distinguish "wrong variant" from
/// "absent key" without ever failing.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A UTF-8 string.
    String(String),
    /// A signed integer.
    Int(i64),
    /// A boolean flag.
    Bool(bool),
    /// A floating-point number.
    Float(f64),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A wall-clock timestamp.
    Time(SystemTime),
}

impl Value {
    /// Returns the string contents, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the flag, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a [`Value::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a [`Value::Time`].
    pub fn as_time(&self) -> Option<SystemTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::Time(t)
    }
}

// =============================================================================
// Context — the per-dispatch carrier
// =============================================================================

/// The context handed to matchers, handlers, and middleware during dispatch.
///
/// Holds exactly one buffer (replaceable only via the fork variants), the
/// caller's [`Scope`], and a last-write-wins value store with no
/// enumeration-order guarantee.
///
/// # Example
///
/// ```
/// use content_router::{Buffer, Context, Scope};
///
/// let mut ctx = Context::new(Scope::background(), Buffer::from("payload"));
/// ctx.set("attempt", 1i64);
///
/// let child = ctx.fork();
/// assert!(child.shares_buffer_with(&ctx));
/// assert_eq!(child.get_int("attempt"), Some(1));
/// ```
#[derive(Debug)]
pub struct Context {
    scope: Scope,
    buffer: Option<Arc<Buffer>>,
    values: HashMap<String, Value>,
}

impl Context {
    /// Creates a context over `buffer`, scoped to `scope`.
    pub fn new(scope: Scope, buffer: Buffer) -> Self {
        Self {
            scope,
            buffer: Some(Arc::new(buffer)),
            values: HashMap::new(),
        }
    }

    /// Creates the empty, detached context the router's pool is seeded with.
    pub(crate) fn detached() -> Self {
        Self {
            scope: Scope::background(),
            buffer: None,
            values: HashMap::new(),
        }
    }

    /// Binds a scope and buffer to a pooled (detached) context.
    pub(crate) fn attach(&mut self, scope: Scope, buffer: Buffer) {
        self.scope = scope;
        self.buffer = Some(Arc::new(buffer));
    }

    /// Removes and returns the buffer, leaving the context detached.
    ///
    /// When the buffer is still shared with a fork, the returned buffer is
    /// a copy of the shared contents.
    ///
    /// # Panics
    ///
    /// Panics if the context has no attached buffer.
    pub(crate) fn take_buffer(&mut self) -> Buffer {
        let arc = self
            .buffer
            .take()
            .expect("context has no attached buffer");
        Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone())
    }

    // ─── Value store ──────────────────────────────────────────────────────────

    /// Stores `key` → `value`, replacing any previous entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the stored value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the string stored under `key`.
    ///
    /// `None` covers both an absent key and a non-string entry; the typed
    /// accessors never fail.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Returns the integer stored under `key`.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_int()
    }

    /// Returns the flag stored under `key`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Returns the float stored under `key`.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_float()
    }

    /// Returns the bytes stored under `key`.
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.get(key)?.as_bytes()
    }

    /// Returns the timestamp stored under `key`.
    pub fn get_time(&self, key: &str) -> Option<SystemTime> {
        self.get(key)?.as_time()
    }

    /// Removes and returns the entry for `key`.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Iterates over the stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of stored entries.
    pub fn values_len(&self) -> usize {
        self.values.len()
    }

    // ─── Buffer access ────────────────────────────────────────────────────────

    /// Returns the associated buffer.
    ///
    /// # Panics
    ///
    /// Panics if the context has no attached buffer. Contexts observed by
    /// matchers, handlers, and middleware always have one; only a pooled
    /// context between dispatches is detached.
    pub fn buffer(&self) -> &Buffer {
        self.buffer
            .as_deref()
            .expect("context has no attached buffer")
    }

    /// Returns mutable access to the associated buffer.
    ///
    /// When the buffer is shared with a forked context this detaches it
    /// copy-on-write; the sole owner mutates in place.
    ///
    /// # Panics
    ///
    /// Panics if the context has no attached buffer.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        let arc = self
            .buffer
            .as_mut()
            .expect("context has no attached buffer");
        Arc::make_mut(arc)
    }

    /// Returns `true` when both contexts currently hand out the very same
    /// buffer storage.
    pub fn shares_buffer_with(&self, other: &Context) -> bool {
        match (&self.buffer, &other.buffer) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // ─── Forking ──────────────────────────────────────────────────────────────

    /// Creates a child context sharing this buffer, with a copied store.
    ///
    /// Never mutates the receiver. Store mutations on the child are
    /// invisible to the parent and vice versa.
    pub fn fork(&self) -> Context {
        Context {
            scope: self.scope.clone(),
            buffer: self.buffer.clone(),
            values: self.values.clone(),
        }
    }

    /// Like [`fork`](Self::fork), but over a different buffer.
    pub fn fork_with_buffer(&self, buffer: Buffer) -> Context {
        Context {
            scope: self.scope.clone(),
            buffer: Some(Arc::new(buffer)),
            values: self.values.clone(),
        }
    }

    // ─── Scope delegation ─────────────────────────────────────────────────────

    /// Returns the cancellation scope this dispatch runs under.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns `true` once the scope is cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Returns the scope's deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.scope.deadline()
    }
}

impl Reset for Context {
    fn reset(&mut self) {
        self.values.clear();
        self.buffer = None;
        self.scope = Scope::background();
    }
}
