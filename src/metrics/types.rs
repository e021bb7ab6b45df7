use chrono::{DateTime, TimeDelta, Utc};

/// One normalized telemetry observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Upstream time the first byte of the payload was received.
    pub first_byte_time: DateTime<Utc>,
    /// Upstream time the last byte of the payload was received.
    pub last_byte_time: DateTime<Utc>,
    pub payload_size: u64,
    /// Local time the ingestor converted the event.
    pub observed_at: DateTime<Utc>,
}

impl Sample {
    #[must_use]
    pub const fn new(
        first_byte_time: DateTime<Utc>,
        last_byte_time: DateTime<Utc>,
        payload_size: u64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            first_byte_time,
            last_byte_time,
            payload_size,
            observed_at,
        }
    }

    #[must_use]
    pub fn first_byte_latency(&self) -> TimeDelta {
        self.observed_at.signed_duration_since(self.first_byte_time)
    }

    #[must_use]
    pub fn last_byte_latency(&self) -> TimeDelta {
        self.observed_at.signed_duration_since(self.last_byte_time)
    }
}

/// Statistics for one drained accumulation window.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    /// Latest last-byte time seen across every window so far.
    pub high_watermark: Option<DateTime<Utc>>,
    pub avg_first_byte_latency_secs: f64,
    pub avg_last_byte_latency_secs: f64,
    pub total_bytes: u64,
    pub sample_count: u64,
    pub avg_bytes: f64,
    pub throughput_mbps: f64,
    pub out_of_order_count: u64,
}
