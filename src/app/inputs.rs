use std::sync::Arc;

use tokio::io::{AsyncWrite, BufWriter};
use tracing::debug;

use sqlvolley::args::{AttackArgs, DEFAULT_OUTPUT, DEFAULT_TARGETS};
use sqlvolley::attack::{AttackerOptions, RedirectPolicy};
use sqlvolley::error::{AppError, AppResult, TargetError, ValidationError};
use sqlvolley::target::{FixedTargeter, LazyTargeter, StaticTargeter, Targeter, read_targets};

pub(crate) type Output = BufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

/// Rejects argument combinations before anything is opened.
pub(super) fn validate(args: &AttackArgs) -> AppResult<()> {
    if args.rate == 0 {
        return Err(AppError::validation(ValidationError::ZeroRate));
    }
    if args.duration.is_zero() {
        return Err(AppError::validation(ValidationError::ZeroDuration));
    }
    if args.lazy && args.body.is_some() {
        return Err(AppError::validation(ValidationError::LazyWithBody));
    }
    if args.lazy && args.targets == DEFAULT_TARGETS {
        return Err(AppError::validation(ValidationError::LazyRequiresFile));
    }
    Ok(())
}

pub(super) fn attacker_options(args: &AttackArgs) -> AttackerOptions {
    let redirects = if args.no_follow {
        RedirectPolicy::NoFollow
    } else {
        RedirectPolicy::Follow
    };
    AttackerOptions::default()
        .workers(args.workers)
        .dsn(args.dsn.clone())
        .max_idle_conns(args.max_idle_conns)
        .max_open_conns(args.max_open_conns)
        .redirects(redirects)
        .timeout(args.timeout)
}

/// Picks the targeter: a fixed body, a lazily re-read file, or every line
/// loaded up front.
pub(super) async fn build_targeter(args: &AttackArgs) -> AppResult<Arc<dyn Targeter>> {
    if let Some(path) = args.body.as_deref() {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| read_error(path, err))?;
        debug!("Attacking with the fixed body from {}", path);
        return Ok(Arc::new(FixedTargeter::new(body)));
    }

    if args.lazy {
        debug!("Streaming targets from {}", args.targets);
        return Ok(Arc::new(LazyTargeter::new(args.targets.clone())));
    }

    let targets = if args.targets == DEFAULT_TARGETS {
        read_targets(tokio::io::stdin())
            .await
            .map_err(|err| read_error(&args.targets, err))?
    } else {
        let file = tokio::fs::File::open(&args.targets)
            .await
            .map_err(|err| read_error(&args.targets, err))?;
        read_targets(file)
            .await
            .map_err(|err| read_error(&args.targets, err))?
    };
    let targeter = StaticTargeter::new(targets)?;
    debug!("Loaded {} targets", targeter.len());
    Ok(Arc::new(targeter))
}

pub(super) async fn open_output(path: &str) -> AppResult<Output> {
    let writer: Box<dyn AsyncWrite + Unpin + Send> = if path == DEFAULT_OUTPUT {
        Box::new(tokio::io::stdout())
    } else {
        let file = tokio::fs::File::create(path).await.map_err(|err| {
            AppError::validation(ValidationError::OpenFile {
                path: path.to_owned(),
                source: err,
            })
        })?;
        Box::new(file)
    };
    Ok(BufWriter::new(writer))
}

fn read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::from(TargetError::Read {
        path: path.to_owned(),
        source,
    })
}
