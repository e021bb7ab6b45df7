use std::future::Future;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;
use tokio::sync::mpsc;

use super::config::SinkSettings;
use super::*;
use crate::args::ReportFormat;
use crate::error::{AppError, AppResult, SinkError};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::sink(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn at_millis(millis: i64) -> AppResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AppError::sink(format!("Invalid timestamp {}", millis)))
}

// 2024-03-01T12:00:10.250Z
const GENERATED_MS: i64 = 1_709_294_410_250;

fn sample_summary() -> AppResult<Summary> {
    Ok(Summary {
        generated_at: at_millis(GENERATED_MS)?,
        window_start: at_millis(GENERATED_MS - 10_000)?,
        high_watermark: Some(at_millis(GENERATED_MS - 1_500)?),
        avg_first_byte_latency_secs: 1.25,
        avg_last_byte_latency_secs: 0.5,
        total_bytes: 3_000,
        sample_count: 4,
        avg_bytes: 750.0,
        throughput_mbps: 0.0024,
        out_of_order_count: 1,
    })
}

fn empty_summary() -> AppResult<Summary> {
    Ok(Summary {
        generated_at: at_millis(GENERATED_MS)?,
        window_start: at_millis(GENERATED_MS - 10_000)?,
        high_watermark: None,
        avg_first_byte_latency_secs: 0.0,
        avg_last_byte_latency_secs: 0.0,
        total_bytes: 0,
        sample_count: 0,
        avg_bytes: 0.0,
        throughput_mbps: 0.0,
        out_of_order_count: 0,
    })
}

#[test]
fn tsv_header_lists_report_columns() -> AppResult<()> {
    let columns: Vec<&str> = TSV_HEADER.split('\t').collect();
    if columns.len() != 9 {
        return Err(AppError::sink(format!(
            "Expected 9 columns, got {}",
            columns.len()
        )));
    }
    if columns.first() != Some(&"DATE") || columns.last() != Some(&"Out of order count") {
        return Err(AppError::sink(format!("Unexpected header {:?}", columns)));
    }
    Ok(())
}

#[test]
fn tsv_header_matches_line_field_order() -> AppResult<()> {
    let header: Vec<&str> = TSV_HEADER.split('\t').collect();
    let line = format_tsv_line(&sample_summary()?)?;
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != header.len() {
        return Err(AppError::sink(format!(
            "Header has {} columns, line has {}",
            header.len(),
            fields.len()
        )));
    }
    let first_byte = header.iter().position(|name| *name == "Avg seconds to first byte");
    let last_byte = header.iter().position(|name| *name == "Avg seconds to last byte");
    if first_byte != Some(2) || last_byte != Some(3) {
        return Err(AppError::sink(format!("Unexpected latency columns {:?}", header)));
    }
    if fields.get(2) != Some(&"1.250") || fields.get(3) != Some(&"0.500") {
        return Err(AppError::sink(format!("Unexpected latency values {:?}", fields)));
    }
    Ok(())
}

#[test]
fn tsv_line_formats_fields() -> AppResult<()> {
    let line = format_tsv_line(&sample_summary()?)?;
    let expected = "2024-03-01T12:00:10.250\t2024-03-01T12:00:08.750\t1.250\t0.500\t3000\t4\t750\t0.002400\t1";
    if line != expected {
        return Err(AppError::sink(format!("Unexpected line {:?}", line)));
    }
    Ok(())
}

#[test]
fn tsv_line_marks_missing_watermark() -> AppResult<()> {
    let line = format_tsv_line(&empty_summary()?)?;
    let expected = "2024-03-01T12:00:10.250\t-\t0.000\t0.000\t0\t0\t0\t0.000000\t0";
    if line != expected {
        return Err(AppError::sink(format!("Unexpected line {:?}", line)));
    }
    Ok(())
}

#[test]
fn jsonl_line_carries_all_fields() -> AppResult<()> {
    let line = format_jsonl_line(&sample_summary()?)?;
    let value: serde_json::Value = serde_json::from_str(&line)
        .map_err(|err| AppError::sink(format!("Invalid JSON {}: {}", line, err)))?;

    if value["generated_at"] != "2024-03-01T12:00:10.250Z" {
        return Err(AppError::sink(format!("Unexpected generated_at in {}", line)));
    }
    if value["high_watermark"] != "2024-03-01T12:00:08.750Z" {
        return Err(AppError::sink(format!("Unexpected watermark in {}", line)));
    }
    if value["sample_count"] != 4 || value["total_bytes"] != 3000 {
        return Err(AppError::sink(format!("Unexpected counts in {}", line)));
    }
    if value["out_of_order_count"] != 1 {
        return Err(AppError::sink(format!("Unexpected ordering in {}", line)));
    }

    let empty = format_jsonl_line(&empty_summary()?)?;
    if !empty.contains("\"high_watermark\":null") {
        return Err(AppError::sink(format!("Expected null watermark in {}", empty)));
    }
    Ok(())
}

#[test]
fn writer_sink_writes_header_once_then_lines() -> AppResult<()> {
    run_async_test(async {
        let mut sink = WriterSink::new(Vec::new(), ReportFormat::Tsv, true);
        sink.begin().await?;
        sink.emit(&sample_summary()?).await?;
        sink.emit(&empty_summary()?).await?;

        let output = String::from_utf8(sink.into_inner())
            .map_err(|err| AppError::sink(format!("Invalid UTF-8: {}", err)))?;
        let lines: Vec<&str> = output.lines().collect();
        if lines.len() != 3 || lines.first() != Some(&TSV_HEADER) {
            return Err(AppError::sink(format!("Unexpected output {:?}", output)));
        }
        if !output.ends_with('\n') {
            return Err(AppError::sink("Expected newline-terminated lines"));
        }
        Ok(())
    })
}

#[test]
fn writer_sink_skips_header_when_disabled_or_jsonl() -> AppResult<()> {
    run_async_test(async {
        let mut tsv = WriterSink::new(Vec::new(), ReportFormat::Tsv, false);
        tsv.begin().await?;
        tsv.emit(&sample_summary()?).await?;
        let tsv_output = String::from_utf8(tsv.into_inner())
            .map_err(|err| AppError::sink(format!("Invalid UTF-8: {}", err)))?;
        if tsv_output.starts_with("DATE") || tsv_output.lines().count() != 1 {
            return Err(AppError::sink(format!("Unexpected TSV output {:?}", tsv_output)));
        }

        let mut jsonl = WriterSink::new(Vec::new(), ReportFormat::Jsonl, true);
        jsonl.begin().await?;
        jsonl.emit(&sample_summary()?).await?;
        let jsonl_output = String::from_utf8(jsonl.into_inner())
            .map_err(|err| AppError::sink(format!("Invalid UTF-8: {}", err)))?;
        if !jsonl_output.starts_with('{') || jsonl_output.lines().count() != 1 {
            return Err(AppError::sink(format!(
                "Unexpected JSONL output {:?}",
                jsonl_output
            )));
        }
        Ok(())
    })
}

#[test]
fn file_output_appends_across_runs() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| AppError::sink(format!("tempdir failed: {}", err)))?;
        let path = dir.path().join("report.tsv");
        let settings = SinkSettings {
            output: Some(path.clone()),
            ..SinkSettings::default()
        };

        for _ in 0..2 {
            let mut sink = open_report_sink(&settings).await?;
            sink.begin().await?;
            sink.emit(&sample_summary()?).await?;
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| AppError::sink(format!("read failed: {}", err)))?;
        let headers = content.lines().filter(|line| *line == TSV_HEADER).count();
        if headers != 2 || content.lines().count() != 4 {
            return Err(AppError::sink(format!("Unexpected file content {:?}", content)));
        }
        Ok(())
    })
}

#[test]
fn missing_output_directory_fails_to_open() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| AppError::sink(format!("tempdir failed: {}", err)))?;
        let settings = SinkSettings {
            output: Some(dir.path().join("missing").join("report.tsv")),
            ..SinkSettings::default()
        };
        match open_report_sink(&settings).await {
            Err(SinkError::OpenOutput { .. }) => Ok(()),
            Err(other) => Err(AppError::sink(format!("Unexpected error {}", other))),
            Ok(_) => Err(AppError::sink("Expected open failure")),
        }
    })
}

#[test]
fn channel_sink_forwards_and_reports_closed_receiver() -> AppResult<()> {
    run_async_test(async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        let summary = sample_summary()?;
        sink.emit(&summary).await?;

        let received = rx
            .recv()
            .await
            .ok_or_else(|| AppError::sink("Expected forwarded summary"))?;
        if received != summary {
            return Err(AppError::sink("Forwarded summary differs"));
        }

        drop(rx);
        match sink.emit(&summary).await {
            Err(SinkError::ChannelClosed) => Ok(()),
            other => Err(AppError::sink(format!("Expected closed channel, got {:?}", other))),
        }
    })
}
