//! Fault capture and the recovery middleware.
//!
//! Ordinary middleware composition is panic-free; runtime faults are
//! handled at one explicit boundary instead of leaking panic-as-control-
//! flow through the engine. [`catch_fault`] is that boundary: it converts
//! an abnormal termination into a structured [`Fault`] carrying the panic
//! message and a backtrace snapshot. [`recovery`] wraps a dispatch in it.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

use crate::context::Context;
use crate::error::{Fault, RouteResult};
use crate::handler::{HandlerFn, MiddlewareFn, into_middleware};

/// Runs `f`, converting a panic into a structured [`Fault`].
///
/// The closure is treated as unwind-safe: dispatch state a panicking
/// handler may leave behind (a half-written buffer, partial context
/// entries) is exactly the partial state [`route`](crate::router::Router::route)
/// hands back for inspection.
pub fn catch_fault<T>(f: impl FnOnce() -> T) -> Result<T, Fault> {
    catch_unwind(AssertUnwindSafe(f)).map_err(Fault::from_panic)
}

/// Creates a recovery middleware that converts faults into errors.
///
/// A captured fault is logged with its message and backtrace, then
/// returned as the dispatch error. Register this first so it sits
/// outermost and also covers inner middleware.
pub fn recovery() -> MiddlewareFn {
    recovery_with(|fault| Err(fault.into()))
}

/// Creates a recovery middleware with a caller-defined fault policy.
///
/// The policy decides what a captured fault becomes: an application error,
/// a substituted success, anything. Errors returned by a *non-panicking*
/// chain pass through untouched.
///
/// # Example
///
/// ```
/// use content_router::middleware::recovery_with;
///
/// // Swallow faults entirely; the dispatch reports success.
/// let mw = recovery_with(|_fault| Ok(()));
/// # let _ = mw;
/// ```
pub fn recovery_with<P>(policy: P) -> MiddlewareFn
where
    P: Fn(Fault) -> RouteResult + Send + Sync + 'static,
{
    into_middleware(move |ctx: &mut Context, next: &HandlerFn| {
        match catch_fault(|| next(ctx)) {
            Ok(result) => result,
            Err(fault) => {
                error!(
                    message = fault.message(),
                    backtrace = %fault.backtrace(),
                    "recovered from handler fault"
                );
                policy(fault)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use content_router_core::Buffer;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx() -> Context {
        Context::new(Scope::background(), Buffer::from("payload"))
    }

    #[test]
    fn test_catch_fault_passes_values_through() {
        let value = catch_fault(|| 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_catch_fault_captures_panic_message() {
        let fault = catch_fault(|| -> () { panic!("exploded") }).unwrap_err();
        assert_eq!(fault.message(), "exploded");
    }

    #[test]
    fn test_recovery_converts_fault_to_error() {
        let mw = recovery();
        let panicking: HandlerFn = Arc::new(|_: &mut Context| panic!("handler blew up"));

        let err = mw(&mut ctx(), &panicking).unwrap_err();
        assert!(err.to_string().contains("handler blew up"));
    }

    #[test]
    fn test_recovery_passes_ordinary_errors_through() {
        let mw = recovery();
        let failing: HandlerFn = Arc::new(|_: &mut Context| Err("plain error".into()));

        let err = mw(&mut ctx(), &failing).unwrap_err();
        assert_eq!(err.to_string(), "plain error");
    }

    #[test]
    fn test_recovery_with_can_swallow_faults() {
        let swallowed = Arc::new(AtomicUsize::new(0));
        let swallowed_p = Arc::clone(&swallowed);
        let mw = recovery_with(move |_fault| {
            swallowed_p.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let panicking: HandlerFn = Arc::new(|_: &mut Context| panic!("ignored"));

        mw(&mut ctx(), &panicking).unwrap();
        assert_eq!(swallowed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recovery_in_full_dispatch() {
        use crate::matcher_builders::prefix;
        use crate::router::Router;

        let mut router = Router::new();
        router.use_middleware(recovery());
        router.register(prefix("boom"), |_: &mut Context| panic!("kaboom"));

        let (buffer, result) = router.route(Scope::background(), Buffer::from("boom now"));
        assert!(result.unwrap_err().to_string().contains("kaboom"));
        assert_eq!(buffer.bytes(), b"boom now");
    }
}
