//! Telemetry stream client and the ingestor that turns telemetry into samples.
mod ingestor;
mod websocket;
mod wire;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::error::SourceError;

pub use ingestor::{run_ingestor, sample_from_telemetry, setup_sample_ingestor};
pub use websocket::{ConnectionSettings, WebsocketSource, read_auth_token};
pub use wire::{
    Framing, ReceiveTelemetryResponse, SatelliteStreamRequest, SatelliteStreamResponse, Telemetry,
    decode_response, encode_request,
};

/// Ordered, potentially infinite sequence of stream responses.
#[async_trait]
pub trait TelemetrySource: Send {
    /// Waits for the next response.
    ///
    /// # Errors
    ///
    /// Returns an error when the stream fails, closes, or delivers a frame
    /// that cannot be decoded. None of these are recoverable.
    async fn next_response(&mut self) -> Result<SatelliteStreamResponse, SourceError>;
}
