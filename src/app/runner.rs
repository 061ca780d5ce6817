use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use sqlvolley::args::AttackArgs;
use sqlvolley::attack::Attacker;
use sqlvolley::error::{AppError, AppResult, SinkError};
use sqlvolley::sinks::{ResultEncoder, RunSummary};
use sqlvolley::target::Targeter;

use crate::shutdown_handlers::wait_for_signal;

use super::inputs::{Output, attacker_options, build_targeter, open_output, validate};

/// Runs one attack and writes every result record to the output.
///
/// The first Ctrl-C or SIGTERM stops the attack; results already in flight
/// are still written before the backend is closed.
///
/// # Errors
///
/// Returns an error for invalid arguments, unreadable inputs, a backend that
/// cannot be opened, or a failed write.
pub(crate) async fn run_attack(args: &AttackArgs) -> AppResult<()> {
    validate(args)?;
    let targeter = build_targeter(args).await?;
    let output = open_output(&args.output).await?;

    let attacker = Attacker::connect(attacker_options(args)).await?;
    info!(
        "Attacking {} at {}/s for {}s",
        args.dsn,
        args.rate,
        args.duration.as_secs()
    );

    let outcome = drain_results(&attacker, args, targeter, output).await;
    let workers = attacker.workers();
    attacker.close().await;
    let summary = outcome?;

    if let Some(summary) = summary {
        eprintln!("{}", summary.render(workers)?);
    }
    Ok(())
}

async fn drain_results(
    attacker: &Attacker,
    args: &AttackArgs,
    targeter: Arc<dyn Targeter>,
    output: Output,
) -> AppResult<Option<RunSummary>> {
    let mut results = attacker.attack(targeter, args.rate, args.duration)?;
    let mut encoder = ResultEncoder::new(output, args.format);
    let mut summary = if args.summary {
        Some(RunSummary::new()?)
    } else {
        None
    };

    let signal = wait_for_signal();
    tokio::pin!(signal);
    let mut interrupted = false;

    loop {
        tokio::select! {
            () = &mut signal, if !interrupted => {
                interrupted = true;
                info!("Signal received, stopping attack.");
                if let Err(err) = attacker.stop() {
                    debug!("Stop ignored: {}", err);
                }
            }
            next = results.recv() => {
                let Some(result) = next else {
                    break;
                };
                encoder.encode(&result).await?;
                if let Some(summary) = summary.as_mut() {
                    summary.record(&result)?;
                }
            }
        }
    }

    let mut writer = encoder.finish().await?;
    writer
        .shutdown()
        .await
        .map_err(|err| AppError::sink(SinkError::Write { source: err }))?;
    debug!("Result stream closed");
    Ok(summary)
}
