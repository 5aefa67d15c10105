use std::time::Duration;

use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

use crate::error::{Error, Result};

/// Service name reported on every exported metric.
pub const SERVICE_NAME: &str = "latency-lab";

/// Build the process meter provider.
///
/// With an endpoint, metrics are pushed over OTLP/HTTP every `interval`.
/// Without one the instruments still exist but nothing leaves the process.
pub fn init_meter_provider(otlp_endpoint: Option<&str>, interval: Duration) -> Result<SdkMeterProvider> {
    let resource = Resource::builder().with_service_name(SERVICE_NAME).build();
    let mut builder = SdkMeterProvider::builder().with_resource(resource);

    match otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::MetricExporter::builder()
                .with_http()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| Error::Telemetry(e.to_string()))?;
            let reader = PeriodicReader::builder(exporter).with_interval(interval).build();
            builder = builder.with_reader(reader);
            tracing::info!(endpoint, interval_secs = interval.as_secs(), "exporting metrics over OTLP");
        }
        None => {
            tracing::warn!("no OTLP endpoint configured; request durations stay in-process");
        }
    }

    Ok(builder.build())
}

/// Flush pending data points and stop the exporter.
pub fn shutdown(provider: SdkMeterProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::warn!(error = %e, "meter provider shutdown failed");
    }
}
