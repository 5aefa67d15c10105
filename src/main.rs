use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use opentelemetry::metrics::MeterProvider;

use latency_lab::config::Config;
use latency_lab::metrics::SummaryBounds;
use latency_lab::{logging, server, telemetry, AppState, Error, METER_SCOPE};

#[tokio::main]
async fn main() -> latency_lab::Result<()> {
    let config = Config::parse();

    // ── 1. Logging ───────────────────────────────────────────────
    logging::init(&config.log_level, config.log_format)?;

    // ── 2. Metrics backend (fatal if unusable) ───────────────────
    let provider = telemetry::init_meter_provider(
        config.otlp_endpoint.as_deref(),
        Duration::from_secs(config.export_interval_secs.max(1)),
    )?;
    let meter = provider.meter(METER_SCOPE);

    // ── 3. Build shared state ────────────────────────────────────
    let bounds = SummaryBounds {
        max_secs: config.summary_max_secs,
        sigfig: config.summary_sigfig,
    };
    let state = Arc::new(AppState::new(&meter, bounds).map_err(|e| {
        tracing::error!(error = %e, "cannot build request metrics");
        e
    })?);

    // ── 4. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 5. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| Error::Bind {
            addr: config.listen,
            source,
        })?;

    tracing::info!(listen = %config.listen, "latency-lab listening");
    tracing::info!("load endpoint   → http://{}/api/test", config.listen);
    tracing::info!("metrics JSON    → http://{}/api/metrics", config.listen);
    tracing::info!("metrics SSE     → http://{}/api/metrics/stream", config.listen);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve);

    // ── 6. Flush the last data points ────────────────────────────
    telemetry::shutdown(provider);
    tracing::info!("server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
}
