use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::SourceError;

use super::wire::{SatelliteStreamRequest, SatelliteStreamResponse, decode_response, encode_request};
use super::TelemetrySource;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub endpoint: Url,
    /// Sent as a bearer token on the upgrade request.
    pub auth_token: Option<String>,
    pub connect_timeout: Duration,
}

/// Telemetry stream over a websocket carrying JSON text frames.
pub struct WebsocketSource {
    stream: WsStream,
}

impl std::fmt::Debug for WebsocketSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebsocketSource").finish_non_exhaustive()
    }
}

impl WebsocketSource {
    /// Connects and sends the stream-open request.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established in time or
    /// the request cannot be sent.
    pub async fn open(
        settings: &ConnectionSettings,
        request: &SatelliteStreamRequest,
    ) -> Result<Self, SourceError> {
        let mut source = Self::connect(settings).await?;
        source.open_stream(request).await?;
        Ok(source)
    }

    /// # Errors
    ///
    /// Returns an error if the upgrade request is invalid, the connection
    /// fails, or it does not complete within `connect_timeout`.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, SourceError> {
        let endpoint = settings.endpoint.as_str();
        let mut request =
            endpoint
                .into_client_request()
                .map_err(|err| SourceError::UpgradeRequest {
                    endpoint: endpoint.to_owned(),
                    source: err,
                })?;
        if let Some(token) = settings.auth_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|err| SourceError::InvalidAuthHeader { source: err })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (stream, _) = match timeout(settings.connect_timeout, connect_async(request)).await {
            Ok(Ok(values)) => values,
            Ok(Err(err)) => {
                return Err(SourceError::Connect {
                    endpoint: endpoint.to_owned(),
                    source: err,
                });
            }
            Err(_elapsed) => {
                return Err(SourceError::ConnectTimeout {
                    endpoint: endpoint.to_owned(),
                    timeout: settings.connect_timeout,
                });
            }
        };
        tracing::debug!("Connected to {}", endpoint);
        Ok(Self { stream })
    }

    /// # Errors
    ///
    /// Returns an error if the request cannot be encoded or sent.
    pub async fn open_stream(&mut self, request: &SatelliteStreamRequest) -> Result<(), SourceError> {
        let payload = encode_request(request)?;
        self.stream
            .send(Message::Text(payload))
            .await
            .map_err(|err| SourceError::Send { source: err })?;
        tracing::debug!(
            satellite_id = %request.satellite_id,
            stream_id = %request.stream_id,
            "Sent stream request"
        );
        Ok(())
    }
}

#[async_trait]
impl TelemetrySource for WebsocketSource {
    async fn next_response(&mut self) -> Result<SatelliteStreamResponse, SourceError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return decode_response(&text),
                Some(Ok(Message::Close(frame))) => {
                    if let Some(frame) = frame {
                        tracing::debug!("Stream closed: {} {}", frame.code, frame.reason);
                    }
                    return Err(SourceError::StreamClosed);
                }
                Some(Ok(
                    Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_),
                )) => {}
                Some(Err(err)) => return Err(SourceError::Receive { source: err }),
                None => return Err(SourceError::StreamClosed),
            }
        }
    }
}

/// Reads a bearer token from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds no token.
pub async fn read_auth_token(path: &Path) -> Result<String, SourceError> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| SourceError::ReadAuthToken {
                path: path.to_path_buf(),
                source: err,
            })?;
    let token = content.trim();
    if token.is_empty() {
        return Err(SourceError::EmptyAuthToken {
            path: path.to_path_buf(),
        });
    }
    Ok(token.to_owned())
}
