use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::source::Framing;

use super::parsers::parse_duration_arg;
use super::types::ReportFormat;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Telemetry stream benchmark - windowed latency, throughput, and ordering statistics for long-lived satellite telemetry streams.",
    next_help_heading = "Advanced Options"
)]
pub struct BenchArgs {
    /// Websocket endpoint of the telemetry stream service (ws:// or wss://)
    #[arg(
        long,
        short = 'e',
        env = "STREAMBENCH_ENDPOINT",
        help_heading = "Common Options"
    )]
    pub endpoint: Option<String>,

    /// Satellite to open the telemetry stream for
    #[arg(long = "satellite-id", short = 'i', help_heading = "Common Options")]
    pub satellite_id: Option<String>,

    /// Reporting interval (e.g. 10s, 500ms, 1m)
    #[arg(
        long,
        default_value = "10s",
        value_parser = parse_duration_arg,
        help_heading = "Common Options"
    )]
    pub interval: Duration,

    /// Report file (appended to); defaults to stdout
    #[arg(long, short = 'o', help_heading = "Common Options")]
    pub output: Option<PathBuf>,

    /// Existing stream to resume; empty opens a new stream
    #[arg(long = "stream-id", default_value = "")]
    pub stream_id: String,

    /// Telemetry framing accepted from the stream
    #[arg(long, default_value = "bitstream", value_enum)]
    pub framing: Framing,

    /// Timeout for establishing the stream connection
    #[arg(long = "connect-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// File holding a bearer token for the stream service
    #[arg(long = "auth-token-file", short = 'k', env = "STREAMBENCH_AUTH_TOKEN_FILE")]
    pub auth_token_file: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "tsv", value_enum)]
    pub format: ReportFormat,

    /// Do not print the TSV header row
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Path to config file (TOML or JSON)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
