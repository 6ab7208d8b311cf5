//! Standalone matcher-bound middleware chains.
//!
//! A [`Pipeline`] is an isolated, ordered middleware chain tied to a
//! [`Matcher`], usable as a sub-dispatcher from inside a registered
//! handler. It has no implicit connection to the router's dispatch loop:
//! the owner decides when to consult [`matches`](Pipeline::matches) and
//! when to run [`handle`](Pipeline::handle).
//!
//! Unlike the router, a pipeline recomposes its chain on every `handle`
//! call. Pipelines are expected to be short and low-cardinality next to the
//! main route table, so the per-call composition cost is paid for
//! simplicity instead of carrying a second cache.

use std::sync::Arc;

use crate::context::Context;
use crate::error::RouteResult;
use crate::handler::{HandlerFn, IntoMiddleware, MiddlewareFn, compose};
use crate::matcher::Matcher;

/// An isolated middleware chain bound to a matcher.
///
/// # Example
///
/// ```
/// use content_router::{Buffer, Context, Pipeline, Scope};
/// use content_router::matcher_builders::prefix;
///
/// let mut audit = Pipeline::new(prefix("AUDIT:"));
/// audit.use_middleware(|ctx: &mut Context, next: &content_router::HandlerFn| {
///     ctx.set("audited", true);
///     next(ctx)
/// });
///
/// let mut ctx = Context::new(Scope::background(), Buffer::from("AUDIT:op"));
/// if audit.matches(&ctx) {
///     audit.handle(&mut ctx).unwrap();
/// }
/// assert_eq!(ctx.get_bool("audited"), Some(true));
/// ```
pub struct Pipeline {
    matcher: Arc<dyn Matcher>,
    middlewares: Vec<MiddlewareFn>,
}

impl Pipeline {
    /// Creates an empty pipeline bound to `matcher`.
    pub fn new(matcher: impl Matcher + 'static) -> Self {
        Self {
            matcher: Arc::new(matcher),
            middlewares: Vec::new(),
        }
    }

    /// Appends a middleware. Append-only; there is no removal.
    pub fn use_middleware<M: IntoMiddleware>(&mut self, middleware: M) {
        self.middlewares.push(middleware.into_middleware());
    }

    /// Returns `true` when the bound matcher applies to `ctx`.
    pub fn matches(&self, ctx: &Context) -> bool {
        self.matcher.matches(ctx)
    }

    /// Runs the middleware chain around a no-op terminal handler.
    ///
    /// The chain is recomposed on every call; mutations through
    /// [`use_middleware`](Self::use_middleware) take effect immediately.
    pub fn handle(&self, ctx: &mut Context) -> RouteResult {
        let terminal: HandlerFn = Arc::new(|_: &mut Context| Ok(()));
        compose(&self.middlewares, terminal)(ctx)
    }

    /// Returns the number of middlewares in this pipeline.
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("middleware_count", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher_builders::{contains, prefix};
    use crate::scope::Scope;
    use content_router_core::Buffer;
    use parking_lot::Mutex;

    fn ctx(payload: &str) -> Context {
        Context::new(Scope::background(), Buffer::from(payload))
    }

    #[test]
    fn test_empty_pipeline_is_a_noop() {
        let pipeline = Pipeline::new(prefix(""));
        let mut ctx = ctx("anything");
        pipeline.handle(&mut ctx).unwrap();
    }

    #[test]
    fn test_middleware_runs_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = Pipeline::new(prefix(""));

        for label in ["first", "second"] {
            let order = Arc::clone(&order);
            pipeline.use_middleware(move |ctx: &mut Context, next: &HandlerFn| {
                order.lock().push(label);
                next(ctx)
            });
        }

        pipeline.handle(&mut ctx("p")).unwrap();
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_matcher_is_advisory_only() {
        // handle() does not consult the matcher; the owner guards with matches().
        let pipeline = Pipeline::new(contains("never"));
        let mut ctx = ctx("unrelated");
        assert!(!pipeline.matches(&ctx));
        pipeline.handle(&mut ctx).unwrap();
    }

    #[test]
    fn test_later_registrations_take_effect() {
        let mut pipeline = Pipeline::new(prefix(""));
        let mut ctx = ctx("p");

        pipeline.handle(&mut ctx).unwrap();
        assert!(ctx.get("tagged").is_none());

        pipeline.use_middleware(|ctx: &mut Context, next: &HandlerFn| {
            ctx.set("tagged", true);
            next(ctx)
        });
        pipeline.handle(&mut ctx).unwrap();
        assert_eq!(ctx.get_bool("tagged"), Some(true));
        assert_eq!(pipeline.middleware_count(), 1);
    }
}
