pub mod http;
pub mod percentiles;
pub mod stream;
pub mod summary;

pub use http::HttpMetrics;
pub use percentiles::PercentileSet;
pub use summary::{DurationSummary, SummaryBounds, SummarySnapshot};
