use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error, Clone, Copy)]
pub enum TimestampField {
    #[error("timeFirstByteReceived")]
    FirstByteReceived,
    #[error("timeLastByteReceived")]
    LastByteReceived,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read auth token '{path}': {source}")]
    ReadAuthToken {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Auth token file '{path}' is empty.")]
    EmptyAuthToken { path: PathBuf },
    #[error("Invalid upgrade request for '{endpoint}': {source}")]
    UpgradeRequest {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("Auth token is not a valid header value: {source}")]
    InvalidAuthHeader {
        #[source]
        source: tungstenite::http::header::InvalidHeaderValue,
    },
    #[error("Failed to connect to '{endpoint}': {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("Timed out connecting to '{endpoint}' after {}ms", .timeout.as_millis())]
    ConnectTimeout { endpoint: String, timeout: Duration },
    #[error("Failed to encode stream request: {source}")]
    EncodeRequest {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to send stream request: {source}")]
    Send {
        #[source]
        source: tungstenite::Error,
    },
    #[error("Failed to receive from stream: {source}")]
    Receive {
        #[source]
        source: tungstenite::Error,
    },
    #[error("Stream closed by remote.")]
    StreamClosed,
    #[error("Failed to decode stream response: {source}")]
    DecodeResponse {
        #[source]
        source: serde_json::Error,
    },
    #[error("Telemetry is missing {field}.")]
    MissingTimestamp { field: TimestampField },
    #[error("Invalid {field} '{value}': {source}")]
    InvalidTimestamp {
        field: TimestampField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid telemetry payload: {source}")]
    InvalidPayload {
        #[source]
        source: base64::DecodeError,
    },
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
