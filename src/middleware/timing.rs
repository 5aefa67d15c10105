use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::context::{MatchedRoute, RequestContext, RequestId};
use crate::recorder::RequestDurationRecorder;
use crate::AppState;

/// Outermost middleware: measures every top-level request.
///
/// Starts the measurement before the inner stack runs and finishes it with
/// the final status once a response exists. Also adds two headers:
///
///   X-Response-Time-Us  — total handler wall time in microseconds
///   Server-Timing       — same value in the standard Server-Timing format
pub async fn timing_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::attach(&mut req);
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    state.recorder.on_request_start(&ctx);
    let guard = DiscardOnDrop {
        recorder: &state.recorder,
        id: ctx.id,
    };

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    ctx.route = response.extensions().get::<MatchedRoute>().map(|r| r.0.clone());
    let status = response.status().as_u16();
    state.recorder.on_request_finish(&ctx, status);
    drop(guard);

    // Nested passes leave the headers to the outer one
    if !ctx.is_main() {
        return response;
    }

    // ── Inject response headers ─────────────────────────────────
    let us = elapsed.as_micros();
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("X-Response-Time-Us", val);
    }

    let server_timing = format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(val) = server_timing.parse() {
        response.headers_mut().insert("Server-Timing", val);
    }

    // ── Access log ──────────────────────────────────────────────
    // Skip the SSE stream, it would log once per connection forever
    if path.starts_with("/api/") && !path.ends_with("/stream") {
        tracing::info!(
            request_id = %ctx.id,
            %method,
            %path,
            status,
            us = us as u64,
            "request"
        );
    }

    response
}

/// Route layer: carries the matched route template out on the response,
/// where the timing middleware reads it.
pub async fn capture_route(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| MatchedRoute(p.as_str().to_owned()));

    let mut response = next.run(req).await;
    if let Some(route) = route {
        response.extensions_mut().insert(route);
    }
    response
}

/// Clears the pending entry if the request future is dropped before a
/// response exists (client gone, task cancelled). After a normal finish the
/// entry is already consumed and this does nothing.
struct DiscardOnDrop<'a> {
    recorder: &'a RequestDurationRecorder,
    id: RequestId,
}

impl Drop for DiscardOnDrop<'_> {
    fn drop(&mut self) {
        self.recorder.discard(&self.id);
    }
}
