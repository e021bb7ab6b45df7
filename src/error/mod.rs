mod app;
mod config;
mod ingest;
mod metrics;
mod sink;
mod source;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use ingest::IngestError;
pub use metrics::MetricsError;
pub use sink::SinkError;
pub use source::{SourceError, TimestampField};
pub use validation::ValidationError;
