use std::time::Instant;

use hdrhistogram::{CreationError, Histogram};
use parking_lot::Mutex;
use serde::Serialize;

use super::percentiles::PercentileSet;
use crate::error::RecordError;

// ─── Configuration ───────────────────────────────────────────────

/// Trackable range of the in-process summary.
#[derive(Debug, Clone, Copy)]
pub struct SummaryBounds {
    /// Highest duration that can be recorded, in seconds.
    pub max_secs: u64,
    /// Significant figures kept per value (0–5).
    pub sigfig: u8,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_secs: 60,
            sigfig: 3,
        }
    }
}

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe local view of request durations, fed next to the exported
/// instrument so `/api/metrics` can show percentiles without a collector.
/// Values are kept in microseconds.
pub struct DurationSummary {
    inner: Mutex<Inner>,
}

/// Snapshot shipped by `/api/metrics` and the SSE stream.
#[derive(Debug, Clone, Serialize)]
pub struct SummarySnapshot {
    pub total_samples: u64,
    pub requests_per_sec: f64,
    pub elapsed_secs: f64,
    pub latency: PercentileSet,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    hist: Histogram<u64>,
    // Wall-clock anchor for the request rate, set on the first sample
    start_time: Option<Instant>,
}

// ─── DurationSummary impl ────────────────────────────────────────

impl DurationSummary {
    /// Fails when the bounds cannot back a histogram; callers treat that as
    /// a fatal startup error.
    pub fn new(bounds: SummaryBounds) -> Result<Self, CreationError> {
        let high = bounds.max_secs.saturating_mul(1_000_000);
        let hist = Histogram::<u64>::new_with_bounds(1, high, bounds.sigfig)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                hist,
                start_time: None,
            }),
        })
    }

    /// Record one observation, in seconds.
    pub fn record(&self, seconds: f64) -> Result<(), RecordError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(RecordError::Invalid(seconds));
        }

        // Clamp to ≥ 1 μs, the histogram's lowest discernible value
        let micros = ((seconds * 1_000_000.0).round() as u64).max(1);

        let mut inner = self.inner.lock();
        let high = inner.hist.high();
        inner.hist.record(micros).map_err(|_| RecordError::OutOfRange {
            seconds,
            max_secs: high as f64 / 1_000_000.0,
        })?;
        inner.start_time.get_or_insert_with(Instant::now);
        Ok(())
    }

    pub fn sample_count(&self) -> u64 {
        self.inner.lock().hist.len()
    }

    pub fn snapshot(&self) -> SummarySnapshot {
        let inner = self.inner.lock();
        let elapsed_secs = inner
            .start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        let total_samples = inner.hist.len();

        let requests_per_sec = if elapsed_secs > 0.0 {
            total_samples as f64 / elapsed_secs
        } else {
            0.0
        };

        SummarySnapshot {
            total_samples,
            requests_per_sec,
            elapsed_secs,
            latency: PercentileSet::from_micros(&inner.hist),
        }
    }
}
