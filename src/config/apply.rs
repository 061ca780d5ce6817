use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::AttackArgs;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// A value given on the command line or through the environment wins over
/// the config file.
///
/// # Errors
///
/// Returns an error when a config duration cannot be parsed.
pub fn apply_config(
    args: &mut AttackArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "targets")
        && let Some(targets) = config.targets.clone()
    {
        args.targets = targets;
    }

    if !is_explicit(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = output;
    }

    if !is_explicit(matches, "body")
        && let Some(body) = config.body.clone()
    {
        args.body = Some(body);
    }

    if !is_explicit(matches, "lazy")
        && let Some(lazy) = config.lazy
    {
        args.lazy = lazy;
    }

    if !is_explicit(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = config_duration(duration, "duration")?;
    }

    if !is_explicit(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = config_duration(timeout, "timeout")?;
    }

    if !is_explicit(matches, "rate")
        && let Some(rate) = config.rate
    {
        args.rate = rate;
    }

    if !is_explicit(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = workers;
    }

    if !is_explicit(matches, "max_open_conns")
        && let Some(max_open) = config.max_open_conns
    {
        args.max_open_conns = max_open;
    }

    if !is_explicit(matches, "max_idle_conns")
        && let Some(max_idle) = config.max_idle_conns
    {
        args.max_idle_conns = max_idle;
    }

    if !is_explicit(matches, "dsn")
        && let Some(dsn) = config.dsn.clone()
    {
        args.dsn = dsn;
    }

    if !is_explicit(matches, "no_follow")
        && let Some(no_follow) = config.no_follow
    {
        args.no_follow = no_follow;
    }

    if !is_explicit(matches, "format")
        && let Some(format) = config.format
    {
        args.format = format;
    }

    if !is_explicit(matches, "summary")
        && let Some(summary) = config.summary
    {
        args.summary = summary;
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn config_duration(
    value: &DurationValue,
    field: &'static str,
) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}
