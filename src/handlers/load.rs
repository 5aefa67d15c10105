use axum::Json;
use serde::Serialize;

use crate::latency;

// ─── Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoadTestResponse {
    pub status: &'static str,
    pub sleep_ms: u64,
    /// Unix seconds at the time the response was built
    pub timestamp: i64,
    pub worker_pid: u32,
}

// ─── GET /api/test ───────────────────────────────────────────────
/// Waits a randomly tiered amount of time, then reports how long.

pub async fn api_test() -> Json<LoadTestResponse> {
    let sample = latency::simulate().await;
    tracing::debug!(tier = sample.tier.as_str(), sleep_ms = sample.sleep_ms, "simulated latency");

    Json(LoadTestResponse {
        status: "ok",
        sleep_ms: sample.sleep_ms,
        timestamp: chrono::Utc::now().timestamp(),
        worker_pid: std::process::id(),
    })
}
