//! # Content Router
//!
//! An in-process dispatch engine that routes opaque byte payloads to
//! handlers chosen by **predicate matching on the payload itself**, rather
//! than by URL path or topic name, with a composable before/after
//! middleware chain around every dispatch.
//!
//! ## Architecture
//!
//! ```text
//! caller ──Buffer──▶ Router ──▶ [M1 ▶ M2 ▶ … ▶ route table scan ▶ handler]
//!    ▲                  │                 (first matcher wins)
//!    └──Buffer + result─┘
//! ```
//!
//! - **Foundation** (`content-router-core`): [`Buffer`], [`Pool`],
//!   [`BufferManager`] — reusable byte storage and the pooling discipline
//!   that keeps the steady-state path allocation-free.
//! - **Dispatch**: [`Router`] owns the ordered route table, the global
//!   middleware list, and a cached composed chain invalidated on mutation.
//! - **Matching**: [`Matcher`] predicates ([`matcher::Prefix`],
//!   [`matcher::Suffix`], [`matcher::Contains`], [`matcher::Pattern`]) plus
//!   the [`matcher_builders`] pattern DSL.
//! - **Carriers**: [`Context`] binds the payload buffer, a value store, and
//!   the caller's cancellation [`Scope`] for the lifetime of one dispatch.
//! - **Middleware**: the [`middleware`] module ships logging and a
//!   panic-capturing recovery boundary.
//!
//! ## Example
//!
//! ```
//! use content_router::{Buffer, Context, Router, Scope, middleware};
//!
//! let mut router = Router::new();
//! router.use_middleware(middleware::recovery());
//! router.on("/contains/error", |ctx: &mut Context| {
//!     ctx.set("severity", "high");
//!     Ok(())
//! })?;
//!
//! let mut buffer = router.buffer_manager().acquire();
//! buffer.write_str("disk error on /dev/sda");
//!
//! let (buffer, result) = router.route(Scope::background(), buffer);
//! result?;
//! router.buffer_manager().release(buffer);
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```
//!
//! ## Concurrency Model
//!
//! Dispatch is fully synchronous — no internal suspension points, no
//! background workers. Registration takes `&mut Router` and dispatch takes
//! `&Router`, so the borrow checker enforces the intended lifecycle: build
//! the table single-threaded, then share the router (e.g. in an `Arc`) for
//! unlimited concurrent [`route`](Router::route) calls.

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod matcher_builders;
pub mod middleware;
pub mod pipeline;
pub mod router;
pub mod scope;

pub use content_router_core::{Buffer, BufferManager, Pool, Reset};

pub use context::{Context, Value};
pub use error::{BoxError, Fault, PatternError, RouteResult, ScopeError};
pub use handler::{HandlerFn, IntoMiddleware, MiddlewareFn, compose, into_handler, into_middleware};
pub use matcher::Matcher;
pub use pipeline::Pipeline;
pub use router::Router;
pub use scope::Scope;
