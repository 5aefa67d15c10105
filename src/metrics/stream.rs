use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::summary::SummarySnapshot;
use crate::AppState;

const STREAM_TICK: Duration = Duration::from_millis(500);

// ─── GET /api/metrics ────────────────────────────────────────────
/// Local request-duration summary as JSON.

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<SummarySnapshot> {
    Json(state.metrics.summary.snapshot())
}

// ─── GET /api/metrics/stream ─────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full `SummarySnapshot` as JSON every 500 ms.

pub async fn metrics_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(STREAM_TICK);

    let stream = IntervalStream::new(interval).map(move |_| {
        let snapshot = state.metrics.summary.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        Ok(Event::default().event("snapshot").data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
