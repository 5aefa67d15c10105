use std::sync::Arc;

use opentelemetry::metrics::{Histogram, Meter};
use opentelemetry::KeyValue;

use super::summary::{DurationSummary, SummaryBounds};
use crate::error::RecordError;

// ─── Semantic convention names ───────────────────────────────────

pub const HTTP_SERVER_REQUEST_DURATION: &str = "http.server.request.duration";
pub const HTTP_SERVER_REQUEST_DURATION_UNIT: &str = "s";
pub const HTTP_SERVER_REQUEST_DURATION_DESCRIPTION: &str = "Duration of HTTP server requests";

pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
pub const URL_SCHEME: &str = "url.scheme";
pub const NETWORK_PROTOCOL_VERSION: &str = "network.protocol.version";
pub const HTTP_ROUTE: &str = "http.route";

/// HTTP server instruments, built once at bootstrap from the process meter.
///
/// Clones share both the exported histogram and the local summary.
#[derive(Clone)]
pub struct HttpMetrics {
    pub request_duration: Histogram<f64>,
    pub summary: Arc<DurationSummary>,
}

impl HttpMetrics {
    pub fn new(meter: &Meter, bounds: SummaryBounds) -> Result<Self, hdrhistogram::CreationError> {
        let request_duration = meter
            .f64_histogram(HTTP_SERVER_REQUEST_DURATION)
            .with_unit(HTTP_SERVER_REQUEST_DURATION_UNIT)
            .with_description(HTTP_SERVER_REQUEST_DURATION_DESCRIPTION)
            .build();

        Ok(Self {
            request_duration,
            summary: Arc::new(DurationSummary::new(bounds)?),
        })
    }

    /// Export one request duration and feed the local summary.
    ///
    /// The exported instrument always takes the sample; the error only
    /// reports that the summary refused it.
    pub fn record_request(&self, seconds: f64, attributes: &[KeyValue]) -> Result<(), RecordError> {
        self.request_duration.record(seconds, attributes);
        self.summary.record(seconds)
    }
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetrics")
            .field("instrument", &HTTP_SERVER_REQUEST_DURATION)
            .field("summary_samples", &self.summary.sample_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::metrics::MeterProvider;
    use opentelemetry_sdk::metrics::data::Histogram as HistogramData;
    use opentelemetry_sdk::metrics::{InMemoryMetricExporter, PeriodicReader, SdkMeterProvider};

    fn provider() -> (SdkMeterProvider, InMemoryMetricExporter) {
        let exporter = InMemoryMetricExporter::default();
        let reader = PeriodicReader::builder(exporter.clone()).build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();
        (provider, exporter)
    }

    #[test]
    fn two_handles_from_one_meter_export_one_instrument() {
        let (provider, exporter) = provider();
        let meter = provider.meter("test");
        let first = HttpMetrics::new(&meter, SummaryBounds::default()).unwrap();
        let second = HttpMetrics::new(&meter, SummaryBounds::default()).unwrap();

        let attrs = [KeyValue::new(HTTP_REQUEST_METHOD, "GET")];
        first.record_request(0.1, &attrs).unwrap();
        second.record_request(0.2, &attrs).unwrap();

        provider.force_flush().unwrap();
        let batches = exporter.get_finished_metrics().unwrap();
        let latest = batches.last().unwrap();
        let metrics: Vec<_> = latest
            .scope_metrics
            .iter()
            .flat_map(|s| s.metrics.iter())
            .filter(|m| m.name == HTTP_SERVER_REQUEST_DURATION)
            .collect();
        assert_eq!(metrics.len(), 1);

        let metric = metrics[0];
        assert_eq!(metric.unit, "s");
        assert_eq!(metric.description, "Duration of HTTP server requests");
        let hist = metric
            .data
            .as_any()
            .downcast_ref::<HistogramData<f64>>()
            .unwrap();
        assert_eq!(hist.data_points.len(), 1);
        assert_eq!(hist.data_points[0].count, 2);
    }

    #[test]
    fn summary_refusal_still_exports() {
        let (provider, _exporter) = provider();
        let meter = provider.meter("test");
        let metrics = HttpMetrics::new(&meter, SummaryBounds { max_secs: 1, sigfig: 3 }).unwrap();

        assert!(metrics.record_request(5.0, &[]).is_err());
        assert_eq!(metrics.summary.sample_count(), 0);
    }
}
