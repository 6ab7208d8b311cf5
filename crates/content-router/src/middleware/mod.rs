//! Stock middleware for common dispatch concerns.
//!
//! The engine treats middleware bodies as opaque; these implementations
//! exist because nearly every deployment wants them:
//!
//! - [`logging`]: structured timing and payload-preview logs around each
//!   dispatch, via `tracing`.
//! - [`recovery`] / [`recovery_with`]: an explicit fault boundary that
//!   captures a panicking handler and converts it into a structured error
//!   instead of unwinding through [`route`](crate::router::Router::route).
//!   Position it outermost (register it first) so it also covers inner
//!   middleware.

pub mod logging;
pub mod recovery;

pub use logging::logging;
pub use recovery::{catch_fault, recovery, recovery_with};
