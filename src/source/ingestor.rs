use std::convert::Infallible;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::error::{IngestError, SourceError};
use crate::metrics::{AccumulationWindow, Sample};

use super::{Telemetry, TelemetrySource};

/// Converts one telemetry event into a sample observed at `observed_at`.
///
/// # Errors
///
/// Returns an error if either timestamp is missing or malformed, or the
/// payload cannot be decoded.
pub fn sample_from_telemetry(
    telemetry: &Telemetry,
    observed_at: DateTime<Utc>,
) -> Result<Sample, SourceError> {
    Ok(Sample::new(
        telemetry.first_byte_received()?,
        telemetry.last_byte_received()?,
        telemetry.payload_len()?,
        observed_at,
    ))
}

#[must_use]
pub fn setup_sample_ingestor<S>(
    source: S,
    window: Arc<AccumulationWindow>,
) -> JoinHandle<Result<Infallible, IngestError>>
where
    S: TelemetrySource + 'static,
{
    tokio::spawn(run_ingestor(source, window))
}

/// Records every telemetry event from `source` into `window`, in arrival
/// order, until the source fails.
///
/// Non-telemetry responses are skipped.
///
/// # Errors
///
/// Returns the first receive, decode, conversion, or window failure. The
/// stream has no recoverable errors, so this is the only way out.
pub async fn run_ingestor<S>(
    mut source: S,
    window: Arc<AccumulationWindow>,
) -> Result<Infallible, IngestError>
where
    S: TelemetrySource,
{
    tracing::info!("Listening for messages");
    let mut receiving = false;

    loop {
        let response = source.next_response().await?;
        if !receiving {
            receiving = true;
            tracing::info!("Receiving messages");
        }

        let Some(telemetry) = response.into_telemetry() else {
            tracing::trace!("Skipping non-telemetry response");
            continue;
        };
        let sample = sample_from_telemetry(&telemetry, window.clock().now())?;
        window.record(sample)?;
    }
}
