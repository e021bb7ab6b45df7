use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::MetricsError;

use super::{Clock, Sample, Summary};

#[derive(Debug)]
struct WindowState {
    window_start: DateTime<Utc>,
    samples: Vec<Sample>,
    high_watermark: Option<DateTime<Utc>>,
}

/// Shared accumulation window between the ingestor and the aggregator.
///
/// All mutation goes through one mutex, so a drain sees exactly the samples
/// recorded before it acquired the lock. The watermark survives drains.
#[derive(Debug)]
pub struct AccumulationWindow {
    clock: Arc<dyn Clock>,
    state: Mutex<WindowState>,
}

impl AccumulationWindow {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let window_start = clock.now();
        Self {
            clock,
            state: Mutex::new(WindowState {
                window_start,
                samples: Vec::new(),
                high_watermark: None,
            }),
        }
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Appends a sample to the current window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window lock was poisoned.
    pub fn record(&self, sample: Sample) -> Result<(), MetricsError> {
        let mut state = self.lock("record")?;
        state.samples.push(sample);
        Ok(())
    }

    /// Summarizes the current window and starts a new one.
    ///
    /// The summary, the watermark update, and the reset happen under one lock
    /// acquisition; the new window starts at the summary's `generated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the window lock was poisoned.
    pub fn drain_and_reset(&self) -> Result<Summary, MetricsError> {
        let mut state = self.lock("drain")?;
        let generated_at = self.clock.now();
        let samples = std::mem::take(&mut state.samples);
        let summary = Summary::compute(
            &samples,
            state.window_start,
            generated_at,
            state.high_watermark,
        );
        state.high_watermark = summary.high_watermark;
        state.window_start = generated_at;
        Ok(summary)
    }

    /// Latest last-byte time seen so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the window lock was poisoned.
    pub fn high_watermark(&self) -> Result<Option<DateTime<Utc>>, MetricsError> {
        Ok(self.lock("read watermark")?.high_watermark)
    }

    /// Number of samples waiting for the next drain.
    ///
    /// # Errors
    ///
    /// Returns an error if the window lock was poisoned.
    pub fn pending_samples(&self) -> Result<usize, MetricsError> {
        Ok(self.lock("read pending samples")?.samples.len())
    }

    fn lock(&self, context: &'static str) -> Result<MutexGuard<'_, WindowState>, MetricsError> {
        self.state
            .lock()
            .map_err(|_poisoned| MetricsError::LockPoisoned { context })
    }
}
