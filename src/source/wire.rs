use std::borrow::Cow;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, TimestampField};

/// Standard alphabet, padding optional. URL-safe input is mapped onto it
/// before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Framing {
    #[serde(alias = "bitstream")]
    Bitstream,
    #[serde(alias = "ax25")]
    Ax25,
    #[serde(alias = "iq")]
    Iq,
}

/// Stream-open request, the first frame sent on a new connection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteStreamRequest {
    pub satellite_id: String,
    /// Empty to open a new stream.
    pub stream_id: String,
    pub accepted_framing: Vec<Framing>,
}

/// One inbound frame. Only the telemetry variant carries samples; any other
/// variant decodes with `receive_telemetry_response` unset.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteStreamResponse {
    #[serde(default)]
    pub stream_id: String,
    #[serde(default)]
    pub receive_telemetry_response: Option<ReceiveTelemetryResponse>,
}

impl SatelliteStreamResponse {
    #[must_use]
    pub fn into_telemetry(self) -> Option<Telemetry> {
        self.receive_telemetry_response
            .map(|response| response.telemetry)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveTelemetryResponse {
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub telemetry: Telemetry,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// Base64 payload.
    #[serde(default)]
    pub data: String,
    pub time_first_byte_received: Option<String>,
    pub time_last_byte_received: Option<String>,
}

impl Telemetry {
    /// # Errors
    ///
    /// Returns an error if the timestamp is missing or not RFC 3339.
    pub fn first_byte_received(&self) -> Result<DateTime<Utc>, SourceError> {
        parse_timestamp(
            self.time_first_byte_received.as_deref(),
            TimestampField::FirstByteReceived,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the timestamp is missing or not RFC 3339.
    pub fn last_byte_received(&self) -> Result<DateTime<Utc>, SourceError> {
        parse_timestamp(
            self.time_last_byte_received.as_deref(),
            TimestampField::LastByteReceived,
        )
    }

    /// Decoded payload length in bytes.
    ///
    /// Accepts standard or URL-safe base64, padded or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn payload_len(&self) -> Result<u64, SourceError> {
        let payload = PAYLOAD_ENGINE
            .decode(standard_alphabet(&self.data).as_bytes())
            .map_err(|err| SourceError::InvalidPayload { source: err })?;
        Ok(u64::try_from(payload.len()).unwrap_or(u64::MAX))
    }
}

fn standard_alphabet(data: &str) -> Cow<'_, str> {
    if data.contains(['-', '_']) {
        Cow::Owned(data.replace('-', "+").replace('_', "/"))
    } else {
        Cow::Borrowed(data)
    }
}

fn parse_timestamp(
    value: Option<&str>,
    field: TimestampField,
) -> Result<DateTime<Utc>, SourceError> {
    let value = value.ok_or(SourceError::MissingTimestamp { field })?;
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| SourceError::InvalidTimestamp {
            field,
            value: value.to_owned(),
            source: err,
        })
}

/// # Errors
///
/// Returns an error if the request cannot be serialized.
pub fn encode_request(request: &SatelliteStreamRequest) -> Result<String, SourceError> {
    serde_json::to_string(request).map_err(|err| SourceError::EncodeRequest { source: err })
}

/// # Errors
///
/// Returns an error if the frame is not a valid stream response.
pub fn decode_response(text: &str) -> Result<SatelliteStreamResponse, SourceError> {
    serde_json::from_str(text).map_err(|err| SourceError::DecodeResponse { source: err })
}
