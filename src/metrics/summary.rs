use chrono::{DateTime, TimeDelta, Utc};

use super::{Sample, Summary};

const BITS_PER_BYTE: f64 = 8.0;
const BYTES_PER_MEBIBYTE: f64 = 1_048_576.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const MILLIS_PER_SECOND: f64 = 1_000.0;

impl Summary {
    /// Computes the statistics for one drained window.
    ///
    /// `samples` must be in arrival order. `prior_watermark` is the watermark
    /// carried over from earlier windows; the returned watermark is never
    /// older than it.
    #[must_use]
    pub fn compute(
        samples: &[Sample],
        window_start: DateTime<Utc>,
        generated_at: DateTime<Utc>,
        prior_watermark: Option<DateTime<Utc>>,
    ) -> Self {
        let mut first_byte_latency_secs = 0.0_f64;
        let mut last_byte_latency_secs = 0.0_f64;
        let mut total_bytes = 0_u64;
        let mut high_watermark = prior_watermark;

        for sample in samples {
            first_byte_latency_secs += delta_secs(sample.first_byte_latency());
            last_byte_latency_secs += delta_secs(sample.last_byte_latency());
            total_bytes = total_bytes.saturating_add(sample.payload_size);
            high_watermark = advance_watermark(high_watermark, sample.last_byte_time);
        }

        let sample_count = u64::try_from(samples.len()).unwrap_or(u64::MAX);
        let (avg_first_byte_latency_secs, avg_last_byte_latency_secs) = if sample_count > 0 {
            let count = sample_count as f64;
            (
                first_byte_latency_secs / count,
                last_byte_latency_secs / count,
            )
        } else {
            (0.0, 0.0)
        };
        // Truncating integer division first; fractional bytes are dropped.
        let avg_bytes = total_bytes.checked_div(sample_count).unwrap_or(0) as f64;

        let elapsed_secs = delta_secs(generated_at.signed_duration_since(window_start));
        let throughput_mbps = if elapsed_secs > 0.0 {
            total_bytes as f64 * BITS_PER_BYTE / BYTES_PER_MEBIBYTE / elapsed_secs
        } else {
            0.0
        };

        Self {
            generated_at,
            window_start,
            high_watermark,
            avg_first_byte_latency_secs,
            avg_last_byte_latency_secs,
            total_bytes,
            sample_count,
            avg_bytes,
            throughput_mbps,
            out_of_order_count: count_out_of_order(samples),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Counts adjacent arrivals whose first-byte time moves backwards.
///
/// Equal timestamps are in order.
pub(super) fn count_out_of_order(samples: &[Sample]) -> u64 {
    let regressions = samples
        .windows(2)
        .filter(|pair| match pair {
            [previous, current] => previous.first_byte_time > current.first_byte_time,
            _ => false,
        })
        .count();
    u64::try_from(regressions).unwrap_or(u64::MAX)
}

fn advance_watermark(
    watermark: Option<DateTime<Utc>>,
    candidate: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match watermark {
        Some(current) if current >= candidate => Some(current),
        Some(_) | None => Some(candidate),
    }
}

fn delta_secs(delta: TimeDelta) -> f64 {
    delta.num_nanoseconds().map_or_else(
        || delta.num_milliseconds() as f64 / MILLIS_PER_SECOND,
        |nanos| nanos as f64 / NANOS_PER_SECOND,
    )
}
