use std::time::Duration;

use url::Url;

use crate::error::{AppError, AppResult, ValidationError};

/// Parses a CLI duration such as `10s`, `500ms`, or `2m`.
///
/// # Errors
///
/// Returns an error if the value is empty, malformed, or zero.
pub fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    crate::config::parse_duration_value(s).map_err(AppError::validation)
}

/// Parses a telemetry stream endpoint.
///
/// # Errors
///
/// Returns an error if the value is not a `ws://` or `wss://` URL.
pub fn parse_endpoint(s: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(s.trim()).map_err(|err| ValidationError::InvalidEndpoint {
        value: s.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        scheme => Err(ValidationError::UnsupportedEndpointScheme {
            scheme: scheme.to_owned(),
        }),
    }
}
