use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::SinkError;
use crate::metrics::Summary;

pub const TSV_HEADER: &str = "DATE\tMost recent received\tAvg seconds to first byte\tAvg seconds to last byte\tTotal bytes\tNum messages\tAvg bytes\tMbps\tOut of order count";

const TSV_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const MISSING_TIME: &str = "-";

#[derive(Debug, Serialize)]
struct SummaryRecord {
    generated_at: String,
    window_start: String,
    high_watermark: Option<String>,
    avg_first_byte_latency_secs: f64,
    avg_last_byte_latency_secs: f64,
    total_bytes: u64,
    sample_count: u64,
    avg_bytes: f64,
    throughput_mbps: f64,
    out_of_order_count: u64,
}

impl From<&Summary> for SummaryRecord {
    fn from(summary: &Summary) -> Self {
        Self {
            generated_at: summary
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            window_start: summary
                .window_start
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            high_watermark: summary
                .high_watermark
                .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true)),
            avg_first_byte_latency_secs: summary.avg_first_byte_latency_secs,
            avg_last_byte_latency_secs: summary.avg_last_byte_latency_secs,
            total_bytes: summary.total_bytes,
            sample_count: summary.sample_count,
            avg_bytes: summary.avg_bytes,
            throughput_mbps: summary.throughput_mbps,
            out_of_order_count: summary.out_of_order_count,
        }
    }
}

/// Formats a summary as one tab-separated report line (no newline).
///
/// # Errors
///
/// Returns an error if the line cannot be written.
pub fn format_tsv_line(summary: &Summary) -> Result<String, SinkError> {
    let mut line = String::new();
    write!(
        line,
        "{}\t{}\t{:.3}\t{:.3}\t{}\t{}\t{}\t{:.6}\t{}",
        format_time(summary.generated_at),
        summary
            .high_watermark
            .map_or_else(|| MISSING_TIME.to_owned(), format_time),
        summary.avg_first_byte_latency_secs,
        summary.avg_last_byte_latency_secs,
        summary.total_bytes,
        summary.sample_count,
        summary.avg_bytes,
        summary.throughput_mbps,
        summary.out_of_order_count,
    )
    .map_err(|err| SinkError::WriteLine { source: err })?;
    Ok(line)
}

/// Formats a summary as one JSON object (no newline).
///
/// # Errors
///
/// Returns an error if the summary cannot be serialized.
pub fn format_jsonl_line(summary: &Summary) -> Result<String, SinkError> {
    serde_json::to_string(&SummaryRecord::from(summary))
        .map_err(|err| SinkError::SerializeSummary { source: err })
}

fn format_time(value: DateTime<Utc>) -> String {
    value.format(TSV_TIME_FORMAT).to_string()
}
