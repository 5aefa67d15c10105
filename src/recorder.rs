use std::time::Instant;

use dashmap::DashMap;
use opentelemetry::KeyValue;

use crate::context::{RequestContext, RequestId};
use crate::metrics::http::{
    HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE, NETWORK_PROTOCOL_VERSION, URL_SCHEME,
};
use crate::metrics::HttpMetrics;

/// What happened to a pending measurement when its request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exported and counted by the local summary.
    Recorded,
    /// Exported, but the local summary refused the sample.
    Rejected,
    /// No start was pending for this request.
    NoEntry,
    /// Nested request; nothing looked up.
    Skipped,
}

/// Measures each top-level request exactly once.
///
/// Start instants live in a concurrent map keyed by [`RequestId`]; the
/// finish hook consumes the entry and records into the shared
/// `http.server.request.duration` instrument.
#[derive(Debug)]
pub struct RequestDurationRecorder {
    metrics: HttpMetrics,
    pending: DashMap<RequestId, Instant>,
}

impl RequestDurationRecorder {
    pub fn new(metrics: HttpMetrics) -> Self {
        Self {
            metrics,
            pending: DashMap::new(),
        }
    }

    pub fn on_request_start(&self, ctx: &RequestContext) {
        if !ctx.is_main() {
            return;
        }
        self.pending.insert(ctx.id, Instant::now());
    }

    pub fn on_request_finish(&self, ctx: &RequestContext, status_code: u16) -> Outcome {
        if !ctx.is_main() {
            return Outcome::Skipped;
        }

        let Some((_, started)) = self.pending.remove(&ctx.id) else {
            return Outcome::NoEntry;
        };
        let seconds = started.elapsed().as_secs_f64();

        let mut attributes = vec![
            KeyValue::new(HTTP_REQUEST_METHOD, ctx.method.clone()),
            KeyValue::new(HTTP_RESPONSE_STATUS_CODE, i64::from(status_code)),
            KeyValue::new(URL_SCHEME, ctx.scheme.clone()),
            KeyValue::new(NETWORK_PROTOCOL_VERSION, ctx.protocol_version.clone()),
        ];
        if let Some(route) = ctx.route.as_deref().filter(|r| !r.is_empty()) {
            attributes.push(KeyValue::new(HTTP_ROUTE, route.to_owned()));
        }

        match self.metrics.record_request(seconds, &attributes) {
            Ok(()) => Outcome::Recorded,
            Err(e) => {
                tracing::warn!(request_id = %ctx.id, error = %e, "request duration outside summary bounds");
                Outcome::Rejected
            }
        }
    }

    /// Drop a pending entry without recording. Returns whether one existed.
    pub fn discard(&self, id: &RequestId) -> bool {
        let removed = self.pending.remove(id).is_some();
        if removed {
            tracing::debug!(request_id = %id, "request ended without a response, measurement discarded");
        }
        removed
    }

    /// Requests started but not yet finished or discarded.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn metrics(&self) -> &HttpMetrics {
        &self.metrics
    }
}
