use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::args::ReportFormat;
use crate::error::SinkError;
use crate::metrics::Summary;

use super::ReportSink;
use super::config::SinkSettings;
use super::format::{TSV_HEADER, format_jsonl_line, format_tsv_line};

/// Line-oriented sink over any async writer (stdout, a file, a buffer).
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    format: ReportFormat,
    header: bool,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub const fn new(writer: W, format: ReportFormat, header: bool) -> Self {
        Self {
            writer,
            format,
            header,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let mut bytes = Vec::with_capacity(line.len().saturating_add(1));
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.writer
            .write_all(&bytes)
            .await
            .map_err(|err| SinkError::WriteReport { source: err })?;
        self.writer
            .flush()
            .await
            .map_err(|err| SinkError::WriteReport { source: err })
    }
}

#[async_trait]
impl<W> ReportSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn begin(&mut self) -> Result<(), SinkError> {
        match self.format {
            ReportFormat::Tsv if self.header => self.write_line(TSV_HEADER).await,
            ReportFormat::Tsv | ReportFormat::Jsonl => Ok(()),
        }
    }

    async fn emit(&mut self, summary: &Summary) -> Result<(), SinkError> {
        let line = match self.format {
            ReportFormat::Tsv => format_tsv_line(summary)?,
            ReportFormat::Jsonl => format_jsonl_line(summary)?,
        };
        self.write_line(&line).await
    }
}

/// Forwards summaries to an in-process receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Summary>,
}

impl ChannelSink {
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<Summary>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ReportSink for ChannelSink {
    async fn emit(&mut self, summary: &Summary) -> Result<(), SinkError> {
        self.tx
            .send(summary.clone())
            .map_err(|_closed| SinkError::ChannelClosed)
    }
}

/// Opens the sink described by `settings`.
///
/// # Errors
///
/// Returns an error if the output file cannot be opened.
pub async fn open_report_sink(settings: &SinkSettings) -> Result<Box<dyn ReportSink>, SinkError> {
    let Some(path) = settings.output.as_ref() else {
        return Ok(Box::new(WriterSink::new(
            tokio::io::stdout(),
            settings.format,
            settings.header,
        )));
    };

    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|err| SinkError::OpenOutput {
            path: path.clone(),
            source: err,
        })?;
    tracing::debug!("Writing report to {}", path.display());
    Ok(Box::new(WriterSink::new(
        file,
        settings.format,
        settings.header,
    )))
}
