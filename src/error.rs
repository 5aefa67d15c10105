use std::net::SocketAddr;

use thiserror::Error;

/// Shared result type for bootstrap code.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop the process before (or while) it serves traffic.
#[derive(Debug, Error)]
pub enum Error {
    #[error("latency summary unavailable: {0}")]
    Summary(#[from] hdrhistogram::CreationError),

    #[error("metrics exporter unavailable: {0}")]
    Telemetry(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server exited with error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("logging init failed: {0}")]
    Logging(String),
}

/// A single sample the in-process summary refused to accumulate.
///
/// Only ever logged; a request never fails because of it.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("duration {seconds}s exceeds the trackable maximum of {max_secs}s")]
    OutOfRange { seconds: f64, max_secs: f64 },

    #[error("duration {0} is not a finite, non-negative number")]
    Invalid(f64),
}
