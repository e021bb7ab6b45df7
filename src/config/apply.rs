use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::BenchArgs;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values passed on the command line or through an environment variable win
/// over the config file.
///
/// # Errors
///
/// Returns an error when a duration in the config file is invalid.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "endpoint")
        && let Some(endpoint) = config.endpoint.clone()
    {
        args.endpoint = Some(endpoint);
    }

    if !is_explicit(matches, "satellite_id")
        && let Some(satellite_id) = config.satellite_id.clone()
    {
        args.satellite_id = Some(satellite_id);
    }

    if !is_explicit(matches, "stream_id")
        && let Some(stream_id) = config.stream_id.clone()
    {
        args.stream_id = stream_id;
    }

    if !is_explicit(matches, "framing")
        && let Some(framing) = config.framing
    {
        args.framing = framing;
    }

    if !is_explicit(matches, "interval")
        && let Some(interval) = config.interval.as_ref()
    {
        args.interval = config_duration(interval, "interval")?;
    }

    if !is_explicit(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = config_duration(timeout, "connect_timeout")?;
    }

    if !is_explicit(matches, "auth_token_file")
        && let Some(path) = config.auth_token_file.clone()
    {
        args.auth_token_file = Some(path);
    }

    if !is_explicit(matches, "output")
        && let Some(path) = config.output.clone()
    {
        args.output = Some(path);
    }

    if !is_explicit(matches, "format")
        && let Some(format) = config.format
    {
        args.format = format;
    }

    if !is_explicit(matches, "no_header")
        && let Some(no_header) = config.no_header
    {
        args.no_header = no_header;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn config_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}
