use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::SourceError;

use super::{SatelliteStreamResponse, TelemetrySource};

/// Replays canned responses, then reports the stream as closed.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    responses: VecDeque<Result<SatelliteStreamResponse, SourceError>>,
}

impl ScriptedSource {
    pub(crate) fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<SatelliteStreamResponse, SourceError>>,
    {
        Self {
            responses: responses.into_iter().collect(),
        }
    }
}

#[async_trait]
impl TelemetrySource for ScriptedSource {
    async fn next_response(&mut self) -> Result<SatelliteStreamResponse, SourceError> {
        self.responses
            .pop_front()
            .unwrap_or(Err(SourceError::StreamClosed))
    }
}

pub(crate) fn telemetry_frame(first: &str, last: &str, data: &str) -> String {
    format!(
        r#"{{"streamId":"stream-1","receiveTelemetryResponse":{{"planId":"plan-1","telemetry":{{"framing":"BITSTREAM","data":"{}","timeFirstByteReceived":"{}","timeLastByteReceived":"{}"}}}}}}"#,
        data, first, last
    )
}
