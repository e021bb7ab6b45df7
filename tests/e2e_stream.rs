
use std::time::Duration;

use tempfile::tempdir;

use support_stream::{run_streambench, spawn_stream_server_or_skip, telemetry_frame};

const HEADER: &str = "DATE\tMost recent received\tAvg seconds to first byte\tAvg seconds to last byte\tTotal bytes\tNum messages\tAvg bytes\tMbps\tOut of order count";
// "hello"
const PAYLOAD: &str = "aGVsbG8=";

fn frames(count: u32) -> Vec<String> {
    (0..count)
        .map(|second| {
            telemetry_frame(
                &format!("2024-01-01T00:00:{:02}Z", second),
                &format!("2024-01-01T00:00:{:02}.500Z", second),
                PAYLOAD,
            )
        })
        .collect()
}

fn column(line: &str, index: usize) -> Result<u64, String> {
    line.split('\t')
        .nth(index)
        .ok_or_else(|| format!("missing column {} in {:?}", index, line))?
        .parse()
        .map_err(|err| format!("bad column {} in {:?}: {}", index, line, err))
}

fn describe(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn e2e_stream_reports_windows_until_close() -> Result<(), String> {
    let Some((endpoint, server)) =
        spawn_stream_server_or_skip(frames(5), Duration::from_millis(2_500))?
    else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_streambench(
        dir.path(),
        [
            "--endpoint",
            endpoint.as_str(),
            "--satellite-id",
            "6",
            "--interval",
            "1s",
        ],
    )?;
    let request = server
        .join()
        .ok_or_else(|| "server never received a stream request".to_owned())?;

    if output.status.success() {
        return Err(format!("expected non-zero exit on close\n{}", describe(&output)));
    }
    if !request.contains(r#""satelliteId":"6""#) || !request.contains("BITSTREAM") {
        return Err(format!("unexpected stream request {}", request));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    if lines.next() != Some(HEADER) {
        return Err(format!("missing header\n{}", describe(&output)));
    }
    let mut messages = 0u64;
    let mut bytes = 0u64;
    let mut out_of_order = 0u64;
    for line in lines {
        bytes = bytes.saturating_add(column(line, 4)?);
        messages = messages.saturating_add(column(line, 5)?);
        out_of_order = out_of_order.saturating_add(column(line, 8)?);
    }
    if messages != 5 || bytes != 25 || out_of_order != 0 {
        return Err(format!(
            "unexpected totals messages={} bytes={} out_of_order={}\n{}",
            messages,
            bytes,
            out_of_order,
            describe(&output)
        ));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("Receiving messages") {
        return Err(format!("missing receive log\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_stream_appends_jsonl_to_file() -> Result<(), String> {
    let Some((endpoint, _server)) =
        spawn_stream_server_or_skip(frames(3), Duration::from_millis(1_600))?
    else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report = dir.path().join("report.jsonl");
    let report_arg = report.to_string_lossy().into_owned();

    let output = run_streambench(
        dir.path(),
        [
            "-e",
            endpoint.as_str(),
            "-i",
            "6",
            "--interval",
            "500ms",
            "--format",
            "jsonl",
            "-o",
            report_arg.as_str(),
        ],
    )?;
    if output.status.success() {
        return Err(format!("expected non-zero exit on close\n{}", describe(&output)));
    }
    if !output.stdout.is_empty() {
        return Err(format!("report leaked to stdout\n{}", describe(&output)));
    }

    let content =
        std::fs::read_to_string(&report).map_err(|err| format!("read report failed: {}", err))?;
    let mut messages = 0u64;
    for line in content.lines() {
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|err| format!("invalid JSON line {:?}: {}", line, err))?;
        messages = messages.saturating_add(value["sample_count"].as_u64().unwrap_or_default());
    }
    if messages != 3 {
        return Err(format!("expected 3 messages, got {} in {:?}", messages, content));
    }
    Ok(())
}

#[test]
fn e2e_missing_endpoint_fails_fast() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_streambench(dir.path(), ["--satellite-id", "6"])?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("Missing endpoint") {
        return Err(format!("expected missing endpoint error\n{}", describe(&output)));
    }
    Ok(())
}
