use hdrhistogram::Histogram;
use serde::Serialize;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Percentile breakdown of one series, in seconds.
/// Serialized straight into the snapshot JSON.
#[derive(Debug, Clone, Serialize)]
pub struct PercentileSet {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
    pub count: u64,
}

impl PercentileSet {
    /// Extract a percentile set from a histogram holding microseconds.
    /// Returns zeroed values if the histogram is empty.
    pub fn from_micros(hist: &Histogram<u64>) -> Self {
        if hist.len() == 0 {
            return Self::empty();
        }

        let secs = |us: u64| us as f64 / MICROS_PER_SEC;
        Self {
            min: secs(hist.min()),
            max: secs(hist.max()),
            mean: hist.mean() / MICROS_PER_SEC,
            p50: secs(hist.value_at_percentile(50.0)),
            p95: secs(hist.value_at_percentile(95.0)),
            p99: secs(hist.value_at_percentile(99.0)),
            p999: secs(hist.value_at_percentile(99.9)),
            count: hist.len(),
        }
    }

    /// All-zero placeholder used before any samples are recorded.
    pub fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            p50: 0.0,
            p95: 0.0,
            p99: 0.0,
            p999: 0.0,
            count: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}
