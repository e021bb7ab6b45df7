use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write line: {source}")]
    WriteLine {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to open report output '{path}': {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write report: {source}")]
    WriteReport {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {source}")]
    SerializeSummary {
        #[source]
        source: serde_json::Error,
    },
    #[error("Report channel closed.")]
    ChannelClosed,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
