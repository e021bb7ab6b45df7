use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use streambench::app::{build_plan, run_stream_benchmark};
use streambench::args::BenchArgs;
use streambench::config::{apply_config as apply_config_file, load_config};
use streambench::error::AppResult;

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["streambench.toml", "streambench.json"];

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    let configured = apply_config(&mut args, &matches);
    crate::logger::init_logging(args.verbose, args.no_color);
    if let Err(err) = configured {
        tracing::error!("{}", err);
        return Err(err);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_async(&args));
    if let Err(err) = result.as_ref() {
        tracing::error!("{}", err);
    }
    result
}

fn parse_args() -> AppResult<Option<(BenchArgs, ArgMatches)>> {
    let mut cmd = BenchArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = BenchArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config() && std::env::var_os("STREAMBENCH_ENDPOINT").is_none()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn apply_config(args: &mut BenchArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config_file(args, matches, &config)?;
    }
    Ok(())
}

async fn run_async(args: &BenchArgs) -> AppResult<()> {
    let plan = build_plan(args).await?;
    tracing::debug!(
        interval = ?plan.tick_interval,
        format = plan.sink.format.as_str(),
        "Resolved stream plan"
    );
    match run_stream_benchmark(&plan).await? {}
}
