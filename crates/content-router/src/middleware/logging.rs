//! Dispatch logging middleware.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::context::Context;
use crate::handler::{HandlerFn, MiddlewareFn, into_middleware};

/// Longest payload preview emitted in log fields, in bytes.
const PREVIEW_LIMIT: usize = 50;

/// Creates a middleware that logs timing and a payload preview.
///
/// Emits `debug!` when a dispatch starts, then `info!` on success or
/// `warn!` on error, with the elapsed time. The preview is truncated to 50
/// bytes and lossily decoded, so binary payloads and oversized bodies never
/// flood the log.
pub fn logging() -> MiddlewareFn {
    into_middleware(|ctx: &mut Context, next: &HandlerFn| {
        let start = Instant::now();
        debug!(
            payload = %preview(ctx.buffer().bytes()),
            len = ctx.buffer().len(),
            "dispatch started"
        );

        let result = next(ctx);

        let elapsed = start.elapsed();
        match &result {
            Ok(()) => info!(?elapsed, "dispatch completed"),
            Err(err) => warn!(?elapsed, error = %err, "dispatch failed"),
        }
        result
    })
}

fn preview(data: &[u8]) -> String {
    let cut = &data[..data.len().min(PREVIEW_LIMIT)];
    let mut text = String::from_utf8_lossy(cut).into_owned();
    if data.len() > PREVIEW_LIMIT {
        text.push_str("...");
    }
    text
}
