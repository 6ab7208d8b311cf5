//! Handler and middleware function types, and onion composition.
//!
//! Handlers and middleware are stored type-erased behind `Arc`s so a
//! composed chain can be cached and cheaply cloned out to concurrent
//! dispatch calls. [`compose`] nests a middleware list around a terminal
//! handler onion-style: the first middleware in the list runs outermost.

use std::sync::Arc;

use crate::context::Context;
use crate::error::RouteResult;

/// A type-erased handler: one unit of work over a dispatch context.
pub type HandlerFn = Arc<dyn Fn(&mut Context) -> RouteResult + Send + Sync>;

/// A type-erased middleware: wraps the rest of the chain (`next`) with
/// before/after logic. Middleware decides whether and when `next` runs,
/// and may replace or suppress its error.
pub type MiddlewareFn = Arc<dyn Fn(&mut Context, &HandlerFn) -> RouteResult + Send + Sync>;

/// Erases a handler closure into a storable [`HandlerFn`].
pub fn into_handler<H>(handler: H) -> HandlerFn
where
    H: Fn(&mut Context) -> RouteResult + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Erases a middleware closure into a storable [`MiddlewareFn`].
pub fn into_middleware<M>(middleware: M) -> MiddlewareFn
where
    M: Fn(&mut Context, &HandlerFn) -> RouteResult + Send + Sync + 'static,
{
    Arc::new(middleware)
}

/// Anything attachable as middleware: a closure, or an already-erased
/// [`MiddlewareFn`] such as the stock middleware constructors return.
pub trait IntoMiddleware {
    /// Converts into the storable form.
    fn into_middleware(self) -> MiddlewareFn;
}

impl IntoMiddleware for MiddlewareFn {
    fn into_middleware(self) -> MiddlewareFn {
        self
    }
}

impl<M> IntoMiddleware for M
where
    M: Fn(&mut Context, &HandlerFn) -> RouteResult + Send + Sync + 'static,
{
    fn into_middleware(self) -> MiddlewareFn {
        Arc::new(self)
    }
}

/// Composes `middlewares` around `terminal`, first entry outermost.
///
/// Registration order `[M1, M2]` around handler `H` executes as
/// `M1-before, M2-before, H, M2-after, M1-after`. An error from any layer
/// propagates outward unmodified unless an enclosing middleware chooses to
/// intercept it.
pub fn compose(middlewares: &[MiddlewareFn], terminal: HandlerFn) -> HandlerFn {
    let mut chain = terminal;
    for middleware in middlewares.iter().rev() {
        let middleware = Arc::clone(middleware);
        let next = chain;
        chain = Arc::new(move |ctx: &mut Context| middleware(ctx, &next));
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use content_router_core::Buffer;
    use parking_lot::Mutex;

    fn ctx() -> Context {
        Context::new(Scope::background(), Buffer::from("payload"))
    }

    #[test]
    fn test_compose_empty_is_terminal() {
        let terminal = into_handler(|ctx: &mut Context| {
            ctx.set("ran", true);
            Ok(())
        });
        let chain = compose(&[], terminal);

        let mut ctx = ctx();
        chain(&mut ctx).unwrap();
        assert_eq!(ctx.get_bool("ran"), Some(true));
    }

    #[test]
    fn test_onion_execution_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        let record = |label: &'static str, order: &Arc<Mutex<Vec<&'static str>>>| {
            let order = Arc::clone(order);
            move |ctx: &mut Context, next: &HandlerFn| {
                order.lock().push(label);
                let result = next(ctx);
                order.lock().push(label);
                result
            }
        };

        let middlewares = vec![
            into_middleware(record("m1", &order)),
            into_middleware(record("m2", &order)),
        ];
        let order_h = Arc::clone(&order);
        let terminal = into_handler(move |_: &mut Context| {
            order_h.lock().push("h");
            Ok(())
        });

        let chain = compose(&middlewares, terminal);
        chain(&mut ctx()).unwrap();

        assert_eq!(*order.lock(), vec!["m1", "m2", "h", "m2", "m1"]);
    }

    #[test]
    fn test_error_propagates_through_layers() {
        let middlewares = vec![into_middleware(|ctx: &mut Context, next: &HandlerFn| {
            next(ctx)
        })];
        let terminal = into_handler(|_: &mut Context| Err("handler failed".into()));

        let chain = compose(&middlewares, terminal);
        let err = chain(&mut ctx()).unwrap_err();
        assert_eq!(err.to_string(), "handler failed");
    }

    #[test]
    fn test_middleware_can_short_circuit() {
        let middlewares = vec![into_middleware(|_: &mut Context, _: &HandlerFn| Ok(()))];
        let terminal = into_handler(|_: &mut Context| panic!("terminal must not run"));

        let chain = compose(&middlewares, terminal);
        chain(&mut ctx()).unwrap();
    }
}
