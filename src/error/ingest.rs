use thiserror::Error;

use super::{MetricsError, SourceError};

/// Failure that ends the sample ingestor task.
///
/// Every variant is fatal; the process driver decides how to terminate.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Metrics(#[from] MetricsError),
}
