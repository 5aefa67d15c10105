//! Load-testing telemetry service.
//!
//! `GET /api/test` waits a randomly tiered amount of time and every
//! top-level request is measured into the `http.server.request.duration`
//! histogram, tagged with HTTP semantic-convention attributes.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod latency;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod recorder;
pub mod server;
pub mod telemetry;

use opentelemetry::metrics::Meter;

use metrics::{HttpMetrics, SummaryBounds};
use recorder::RequestDurationRecorder;

pub use error::{Error, Result};

/// Meter scope for every instrument this service creates.
pub const METER_SCOPE: &str = "latency-lab";

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Instruments built from the process meter at bootstrap.
    pub metrics: HttpMetrics,

    /// Start/finish correlation for in-flight requests.
    pub recorder: RequestDurationRecorder,
}

impl AppState {
    pub fn new(meter: &Meter, bounds: SummaryBounds) -> Result<Self> {
        let metrics = HttpMetrics::new(meter, bounds)?;
        Ok(Self {
            recorder: RequestDurationRecorder::new(metrics.clone()),
            metrics,
        })
    }
}
