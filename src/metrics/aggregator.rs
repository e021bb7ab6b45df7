use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::error::MetricsError;
use crate::sinks::ReportSink;

use super::AccumulationWindow;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

#[must_use]
pub fn setup_window_aggregator(
    window: Arc<AccumulationWindow>,
    tick_interval: Duration,
    sink: Box<dyn ReportSink>,
) -> JoinHandle<Result<Infallible, MetricsError>> {
    tokio::spawn(run_window_aggregator(window, tick_interval, sink))
}

/// Drains the window once per tick and hands each summary to `sink`.
///
/// The first drain happens one full interval after the call. Sink failures
/// are logged and the loop keeps going; only a poisoned window ends it.
///
/// # Errors
///
/// Returns an error if the accumulation window lock was poisoned.
pub async fn run_window_aggregator(
    window: Arc<AccumulationWindow>,
    tick_interval: Duration,
    mut sink: Box<dyn ReportSink>,
) -> Result<Infallible, MetricsError> {
    let tick_interval = resolve_tick_interval(tick_interval);
    let first_tick = Instant::now()
        .checked_add(tick_interval)
        .unwrap_or_else(Instant::now);
    let mut ticker = tokio::time::interval_at(first_tick, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_sink_error: Option<String> = None;

    loop {
        ticker.tick().await;
        let summary = window.drain_and_reset()?;
        tracing::debug!(
            samples = summary.sample_count,
            bytes = summary.total_bytes,
            out_of_order = summary.out_of_order_count,
            "Drained accumulation window"
        );

        match sink.emit(&summary).await {
            Ok(()) => {
                last_sink_error = None;
            }
            Err(err) => {
                let message = err.to_string();
                if last_sink_error.as_deref() != Some(message.as_str()) {
                    tracing::warn!("Failed to write report: {}", message);
                    last_sink_error = Some(message);
                }
            }
        }
    }
}

fn resolve_tick_interval(tick_interval: Duration) -> Duration {
    if tick_interval.is_zero() {
        tracing::warn!(
            "tick interval must be > 0; using default {}ms",
            DEFAULT_TICK_INTERVAL.as_millis()
        );
        return DEFAULT_TICK_INTERVAL;
    }
    tick_interval
}
