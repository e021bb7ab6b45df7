//! Report sinks that receive one summary per aggregator tick.
pub mod config;
mod format;
mod writers;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::metrics::Summary;

pub use format::{TSV_HEADER, format_jsonl_line, format_tsv_line};
pub use writers::{ChannelSink, WriterSink, open_report_sink};

#[async_trait]
pub trait ReportSink: Send {
    /// Called once before the first summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot write its preamble.
    async fn begin(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Delivers one summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be formatted or delivered.
    async fn emit(&mut self, summary: &Summary) -> Result<(), SinkError>;
}
