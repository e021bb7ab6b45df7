//! Benchmark driver: wires the telemetry source, the accumulation window, the
//! aggregator, and the report sink together and waits for the first failure.
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinError;

use crate::args::{BenchArgs, parse_endpoint};
use crate::error::{AppError, AppResult, IngestError, MetricsError, ValidationError};
use crate::metrics::{AccumulationWindow, SystemClock, setup_window_aggregator};
use crate::sinks::config::SinkSettings;
use crate::sinks::{ReportSink, open_report_sink};
use crate::source::{
    ConnectionSettings, SatelliteStreamRequest, TelemetrySource, WebsocketSource,
    read_auth_token, setup_sample_ingestor,
};

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPlan {
    pub connection: ConnectionSettings,
    pub request: SatelliteStreamRequest,
    pub tick_interval: Duration,
    pub sink: SinkSettings,
}

/// Validates arguments and resolves them into a plan.
///
/// # Errors
///
/// Returns an error if the endpoint or satellite id is missing or invalid,
/// or the auth token file cannot be read.
pub async fn build_plan(args: &BenchArgs) -> AppResult<StreamPlan> {
    let endpoint = args
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingEndpoint)?;
    let endpoint = parse_endpoint(endpoint)?;

    let satellite_id = args
        .satellite_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingSatelliteId)?;

    let auth_token = match args.auth_token_file.as_deref() {
        Some(path) => Some(read_auth_token(path).await?),
        None => None,
    };

    Ok(StreamPlan {
        connection: ConnectionSettings {
            endpoint,
            auth_token,
            connect_timeout: args.connect_timeout,
        },
        request: SatelliteStreamRequest {
            satellite_id: satellite_id.to_owned(),
            stream_id: args.stream_id.trim().to_owned(),
            accepted_framing: vec![args.framing],
        },
        tick_interval: args.interval,
        sink: SinkSettings {
            output: args.output.clone(),
            format: args.format,
            header: !args.no_header,
        },
    })
}

/// Opens the sink and the stream, then runs until the stream fails.
///
/// # Errors
///
/// Always returns an error: a sink that cannot be opened, a connection that
/// cannot be established, or the fatal failure that ended the stream.
pub async fn run_stream_benchmark(plan: &StreamPlan) -> AppResult<Infallible> {
    let mut sink = open_report_sink(&plan.sink).await?;
    sink.begin().await?;

    tracing::info!(
        "Opening telemetry stream for satellite {} at {}",
        plan.request.satellite_id,
        plan.connection.endpoint
    );
    let source = WebsocketSource::open(&plan.connection, &plan.request).await?;

    let window = Arc::new(AccumulationWindow::new(Arc::new(SystemClock)));
    run_pipeline(source, &window, plan.tick_interval, sink).await
}

/// Runs the ingestor and aggregator over a shared window until one of them
/// stops, then aborts the other.
///
/// # Errors
///
/// Returns the error that stopped the first task to finish.
pub async fn run_pipeline<S>(
    source: S,
    window: &Arc<AccumulationWindow>,
    tick_interval: Duration,
    sink: Box<dyn ReportSink>,
) -> AppResult<Infallible>
where
    S: TelemetrySource + 'static,
{
    let mut ingestor = setup_sample_ingestor(source, Arc::clone(window));
    let mut aggregator = setup_window_aggregator(Arc::clone(window), tick_interval, sink);

    let error = tokio::select! {
        result = &mut ingestor => ingestor_failure(result),
        result = &mut aggregator => aggregator_failure(result),
    };
    ingestor.abort();
    aggregator.abort();
    log_undrained(window);
    Err(error)
}

fn log_undrained(window: &AccumulationWindow) {
    match (window.pending_samples(), window.high_watermark()) {
        (Ok(pending), Ok(watermark)) => tracing::debug!(
            pending,
            watermark = ?watermark,
            "Discarding samples recorded after the last report"
        ),
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!("Accumulation window unreadable at shutdown: {}", err);
        }
    }
}

fn ingestor_failure(result: Result<Result<Infallible, IngestError>, JoinError>) -> AppError {
    match result {
        Ok(Ok(never)) => match never {},
        Ok(Err(err)) => AppError::from(err),
        Err(err) => AppError::from(err),
    }
}

fn aggregator_failure(result: Result<Result<Infallible, MetricsError>, JoinError>) -> AppError {
    match result {
        Ok(Ok(never)) => match never {},
        Ok(Err(err)) => AppError::from(err),
        Err(err) => AppError::from(err),
    }
}
