//! Matchers decide whether a route applies to a payload.
//!
//! A [`Matcher`] is a pure, side-effect-free predicate over the bytes in a
//! context's buffer. The router evaluates the route table in registration
//! order and runs the first route whose matcher answers `true`.
//!
//! Built-ins cover the common byte-level checks — [`Prefix`], [`Suffix`],
//! [`Contains`], and regex-backed [`Pattern`] — and any closure
//! `Fn(&Context) -> bool` is a matcher through the blanket implementation.
//! All built-ins are case-sensitive, and the empty pattern matches every
//! payload, the empty payload included.

use regex::bytes::Regex;

use crate::context::Context;
use crate::error::PatternError;

/// A predicate deciding whether a route applies to a context.
///
/// Implementations must be pure: no side effects, no mutation, the same
/// answer for the same buffer contents.
pub trait Matcher: Send + Sync {
    /// Returns `true` when the route guarded by this matcher applies.
    fn matches(&self, ctx: &Context) -> bool;
}

/// Closures over the context are matchers.
///
/// ```
/// use content_router::{Buffer, Context, Matcher, Scope};
///
/// let long_payload = |ctx: &Context| ctx.buffer().len() > 16;
/// let ctx = Context::new(Scope::background(), Buffer::from("short"));
/// assert!(!long_payload.matches(&ctx));
/// ```
impl<F> Matcher for F
where
    F: Fn(&Context) -> bool + Send + Sync,
{
    fn matches(&self, ctx: &Context) -> bool {
        self(ctx)
    }
}

// =============================================================================
// Built-in byte matchers
// =============================================================================

/// Matches payloads starting with a byte pattern.
#[derive(Clone, Debug)]
pub struct Prefix {
    pattern: Vec<u8>,
}

impl Prefix {
    /// Creates a prefix matcher. An empty pattern matches every payload.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Matcher for Prefix {
    fn matches(&self, ctx: &Context) -> bool {
        ctx.buffer().bytes().starts_with(&self.pattern)
    }
}

/// Matches payloads ending with a byte pattern.
#[derive(Clone, Debug)]
pub struct Suffix {
    pattern: Vec<u8>,
}

impl Suffix {
    /// Creates a suffix matcher. An empty pattern matches every payload.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Matcher for Suffix {
    fn matches(&self, ctx: &Context) -> bool {
        ctx.buffer().bytes().ends_with(&self.pattern)
    }
}

/// Matches payloads containing a byte pattern anywhere.
#[derive(Clone, Debug)]
pub struct Contains {
    pattern: Vec<u8>,
}

impl Contains {
    /// Creates a substring matcher. An empty pattern matches every payload.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Matcher for Contains {
    fn matches(&self, ctx: &Context) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        ctx.buffer()
            .bytes()
            .windows(self.pattern.len())
            .any(|window| window == self.pattern.as_slice())
    }
}

/// Matches payloads against a compiled regular expression.
///
/// Uses the byte-oriented regex engine: payloads are not required to be
/// valid UTF-8. The search is unanchored; anchor explicitly with `^`/`$`
/// when full-payload matching is wanted.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `expr` into a matcher.
    pub fn new(expr: &str) -> Result<Self, PatternError> {
        Ok(Self {
            regex: Regex::new(expr)?,
        })
    }
}

impl Matcher for Pattern {
    fn matches(&self, ctx: &Context) -> bool {
        self.regex.is_match(ctx.buffer().bytes())
    }
}
