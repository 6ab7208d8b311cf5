//! The router: route table, middleware chain cache, and dispatch.
//!
//! A [`Router`] owns an ordered route table of `(matcher, handler)` pairs,
//! a global middleware list, a [`BufferManager`], and a pool of dispatch
//! contexts. [`route`](Router::route) is the entry point: it wraps the
//! caller's buffer in a pooled context, runs the composed handler chain
//! synchronously, and hands the buffer back together with the chain's
//! result.
//!
//! # Chain caching
//!
//! Composing the middleware onion and the route-scanning terminal costs a
//! handful of allocations, so the composed chain is cached and only rebuilt
//! after a mutation. Every mutation — [`register`](Router::register),
//! [`on`](Router::on), [`use_middleware`](Router::use_middleware) — clears
//! the cache; the next dispatch rebuilds it. An empty cache *is* the dirty
//! flag.
//!
//! # Setup, then dispatch
//!
//! Mutation takes `&mut self` while dispatch takes `&self`: the borrow
//! checker enforces the required usage pattern of a single-threaded setup
//! phase followed by unlimited concurrent `route` calls. There is no way to
//! interleave registration with dispatch on a shared router.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{Level, debug, span, trace};

use content_router_core::{Buffer, BufferManager, Pool};

use crate::context::Context;
use crate::error::{PatternError, RouteResult};
use crate::handler::{HandlerFn, IntoMiddleware, MiddlewareFn, compose, into_handler};
use crate::matcher::Matcher;
use crate::matcher_builders;
use crate::pipeline::Pipeline;
use crate::scope::Scope;

#[derive(Clone)]
struct RouteEntry {
    matcher: Arc<dyn Matcher>,
    handler: HandlerFn,
}

/// Dispatches byte payloads to the first route whose matcher applies.
///
/// # Example
///
/// ```
/// use content_router::{Buffer, Context, Router, Scope};
///
/// let mut router = Router::new();
/// router.on("Hello", |ctx: &mut Context| {
///     ctx.buffer_mut().write_str(" [handled]");
///     Ok(())
/// }).unwrap();
///
/// let (buffer, result) = router.route(Scope::background(), Buffer::from("Hello, World!"));
/// result.unwrap();
/// assert_eq!(buffer.bytes(), b"Hello, World! [handled]");
/// ```
pub struct Router {
    buffer_manager: BufferManager,
    contexts: Pool<Context>,
    routes: Vec<RouteEntry>,
    middlewares: Vec<MiddlewareFn>,
    /// Cached composed chain; `None` means stale (dirty) and forces a
    /// rebuild on the next dispatch.
    chain: RwLock<Option<HandlerFn>>,
}

impl Router {
    /// Creates an empty router with fresh buffer and context pools.
    pub fn new() -> Self {
        Self {
            buffer_manager: BufferManager::new(),
            contexts: Pool::new(Context::detached),
            routes: Vec::new(),
            middlewares: Vec::new(),
            chain: RwLock::new(None),
        }
    }

    // ─── Registration (setup phase) ───────────────────────────────────────────

    /// Appends a route. Registration order is match-priority order: the
    /// first matching route wins and later routes are not evaluated.
    pub fn register<M, H>(&mut self, matcher: M, handler: H)
    where
        M: Matcher + 'static,
        H: Fn(&mut Context) -> RouteResult + Send + Sync + 'static,
    {
        self.routes.push(RouteEntry {
            matcher: Arc::new(matcher),
            handler: into_handler(handler),
        });
        self.invalidate();
    }

    /// Appends a route from a pattern-DSL string.
    ///
    /// Accepts `/prefix/X`, `/suffix/X`, `/contains/X`, `/regex/X`; a bare
    /// string is a prefix match. See [`matcher_builders::parse`].
    pub fn on<H>(&mut self, pattern: &str, handler: H) -> Result<(), PatternError>
    where
        H: Fn(&mut Context) -> RouteResult + Send + Sync + 'static,
    {
        let matcher = matcher_builders::parse(pattern)?;
        self.routes.push(RouteEntry {
            matcher: Arc::from(matcher),
            handler: into_handler(handler),
        });
        self.invalidate();
        Ok(())
    }

    /// Appends a global middleware. The first middleware registered runs
    /// outermost around every dispatch.
    pub fn use_middleware<M: IntoMiddleware>(&mut self, middleware: M) {
        self.middlewares.push(middleware.into_middleware());
        self.invalidate();
    }

    /// Creates a standalone [`Pipeline`] bound to `matcher`.
    ///
    /// The router retains no reference to it: pipelines are a manual
    /// composition tool, invoked by the owner from inside a handler, and
    /// are never consulted by the dispatch loop.
    pub fn pipeline<M: Matcher + 'static>(&self, matcher: M) -> Pipeline {
        Pipeline::new(matcher)
    }

    // ─── Factories ────────────────────────────────────────────────────────────

    /// Wraps `buffer` in a pooled context scoped to `scope`.
    ///
    /// Pass the context back through [`release_context`](Self::release_context)
    /// when done to keep the pool warm.
    pub fn new_context(&self, scope: Scope, buffer: Buffer) -> Context {
        let mut ctx = self.contexts.acquire();
        ctx.attach(scope, buffer);
        ctx
    }

    /// Resets `ctx` and returns it to the context pool.
    pub fn release_context(&self, ctx: Context) {
        self.contexts.release(ctx);
    }

    /// Returns the router's buffer pool.
    pub fn buffer_manager(&self) -> &BufferManager {
        &self.buffer_manager
    }

    // ─── Dispatch ─────────────────────────────────────────────────────────────

    /// Routes `buffer` through the middleware chain to the first matching
    /// route's handler.
    ///
    /// The buffer is always handed back, error or not, so callers can
    /// inspect partial state. When no route matches, nothing runs and the
    /// result is `Ok(())`.
    pub fn route(&self, scope: Scope, buffer: Buffer) -> (Buffer, RouteResult) {
        let span = span!(Level::DEBUG, "route", payload_len = buffer.len());
        let _enter = span.enter();

        let chain = self.handler_chain();

        let mut ctx = self.contexts.acquire();
        ctx.attach(scope, buffer);

        let result = chain(&mut ctx);

        let buffer = ctx.take_buffer();
        self.contexts.release(ctx);

        (buffer, result)
    }

    /// Marks the cached chain stale. Called on every mutation.
    fn invalidate(&mut self) {
        *self.chain.get_mut() = None;
    }

    /// Returns the cached composed chain, rebuilding it when stale.
    fn handler_chain(&self) -> HandlerFn {
        if let Some(chain) = self.chain.read().as_ref() {
            return Arc::clone(chain);
        }

        let mut guard = self.chain.write();
        // Another dispatcher may have rebuilt while we waited on the lock.
        if let Some(chain) = guard.as_ref() {
            return Arc::clone(chain);
        }

        let chain = self.build_chain();
        *guard = Some(Arc::clone(&chain));
        chain
    }

    /// Composes the global middleware around the route-scanning terminal.
    fn build_chain(&self) -> HandlerFn {
        debug!(
            routes = self.routes.len(),
            middlewares = self.middlewares.len(),
            "rebuilding handler chain"
        );

        let routes = self.routes.clone();
        let terminal: HandlerFn = Arc::new(move |ctx: &mut Context| {
            for (index, entry) in routes.iter().enumerate() {
                if entry.matcher.matches(ctx) {
                    trace!(route = index, "route matched");
                    return (entry.handler)(ctx);
                }
            }
            trace!("no route matched");
            Ok(())
        });

        compose(&self.middlewares, terminal)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("middlewares", &self.middlewares.len())
            .field("chain_cached", &self.chain.read().is_some())
            .finish()
    }
}
