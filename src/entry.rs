use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::error;

use sqlvolley::args::AttackArgs;
use sqlvolley::config::{apply_config, load_config};
use sqlvolley::error::{AppError, AppResult, ValidationError};

use crate::app::run_attack;
use crate::logger::init_logging;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_attack(&args)).inspect_err(|err| {
        error!("{}", err);
    })
}

fn parse_args() -> AppResult<(AttackArgs, ArgMatches)> {
    let matches = AttackArgs::command().get_matches();
    let args = AttackArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
