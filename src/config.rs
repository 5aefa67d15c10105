use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Runtime configuration. Every flag can also be set from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "latency-lab", version, about = "HTTP service emitting load-test latency telemetry")]
pub struct Config {
    /// Address the HTTP listener binds to
    #[arg(long, env = "LATENCY_LAB_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Default tracing filter (RUST_LOG takes precedence)
    #[arg(long, env = "LATENCY_LAB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, env = "LATENCY_LAB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP/HTTP metrics endpoint, e.g. http://localhost:4318/v1/metrics
    #[arg(long, env = "OTEL_EXPORTER_OTLP_METRICS_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Seconds between metric exports
    #[arg(long, env = "LATENCY_LAB_EXPORT_INTERVAL_SECS", default_value_t = 10)]
    pub export_interval_secs: u64,

    /// Highest request duration the local summary can track, in seconds
    #[arg(long, env = "LATENCY_LAB_SUMMARY_MAX_SECS", default_value_t = 60)]
    pub summary_max_secs: u64,

    /// Significant figures kept by the local summary (0–5)
    #[arg(long, env = "LATENCY_LAB_SUMMARY_SIGFIG", default_value_t = 3)]
    pub summary_sigfig: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
