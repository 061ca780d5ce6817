use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tempfile::tempdir;

use super::*;
use crate::error::TargetError;

fn run_async_test<F>(future: F) -> Result<(), TargetError>
where
    F: Future<Output = Result<(), TargetError>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .map_err(|err| TargetError::from(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn numbered_targets(count: usize) -> Vec<Target> {
    (0..count)
        .map(|idx| Target::new(format!("SELECT {}", idx)))
        .collect()
}

#[test]
fn static_targeter_rejects_empty_list() -> Result<(), TargetError> {
    match StaticTargeter::new(Vec::new()) {
        Err(TargetError::NoTargets) => Ok(()),
        Err(err) => Err(TargetError::from(format!("unexpected error: {}", err))),
        Ok(_) => Err(TargetError::from("expected no targets error")),
    }
}

#[test]
fn static_targeter_serves_in_modulo_order() -> Result<(), TargetError> {
    run_async_test(async {
        let targets = numbered_targets(3);
        let targeter = StaticTargeter::new(targets.clone())?;
        for call in 0..10_usize {
            let target = targeter.next_target().await?;
            let expected = targets
                .get(call.checked_rem(targets.len()).unwrap_or(0))
                .ok_or(TargetError::from("missing expected target"))?;
            if &target != expected {
                return Err(TargetError::from(format!(
                    "call {} returned {:?}, expected {:?}",
                    call, target, expected
                )));
            }
        }
        Ok(())
    })
}

#[test]
fn static_targeter_never_double_serves_under_concurrency() -> Result<(), TargetError> {
    run_async_test(async {
        const CALLERS: usize = 8;
        const CALLS_PER_CALLER: usize = 25;
        const TARGETS: usize = 10;

        let targeter = Arc::new(StaticTargeter::new(numbered_targets(TARGETS))?);
        let mut handles = Vec::with_capacity(CALLERS);
        for _ in 0..CALLERS {
            let targeter = Arc::clone(&targeter);
            handles.push(tokio::spawn(async move {
                let mut served = Vec::with_capacity(CALLS_PER_CALLER);
                for _ in 0..CALLS_PER_CALLER {
                    served.push(targeter.next_target().await?.body);
                }
                Ok::<_, TargetError>(served)
            }));
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for handle in handles {
            let served = handle
                .await
                .map_err(|err| TargetError::from(format!("join failed: {}", err)))??;
            for body in served {
                let count = counts.entry(body).or_insert(0);
                *count = count.saturating_add(1);
            }
        }

        let expected = CALLERS
            .checked_mul(CALLS_PER_CALLER)
            .and_then(|total| total.checked_div(TARGETS))
            .ok_or_else(|| TargetError::from("call count overflow"))?;
        if counts.len() != TARGETS {
            return Err(TargetError::from(format!("served {} distinct targets", counts.len())));
        }
        for (body, count) in counts {
            if count != expected {
                return Err(TargetError::from(format!(
                    "{} served {} times, expected {}",
                    body, count, expected
                )));
            }
        }
        Ok(())
    })
}

#[test]
fn fixed_targeter_repeats_its_body() -> Result<(), TargetError> {
    run_async_test(async {
        let targeter = FixedTargeter::new("SELECT 1");
        for _ in 0..5 {
            let target = targeter.next_target().await?;
            if target.query() != "SELECT 1" {
                return Err(TargetError::from(target.body));
            }
        }
        Ok(())
    })
}

#[test]
fn parse_targets_skips_blank_lines() -> Result<(), TargetError> {
    let targets = parse_targets("SELECT 1\n\n   \n  SELECT 2  \r\nSELECT 3");
    let bodies: Vec<&str> = targets.iter().map(Target::query).collect();
    if bodies != ["SELECT 1", "SELECT 2", "SELECT 3"] {
        return Err(TargetError::from(format!("unexpected bodies: {:?}", bodies)));
    }
    Ok(())
}

#[test]
fn read_targets_collects_all_lines() -> Result<(), TargetError> {
    run_async_test(async {
        let source: &[u8] = b"SELECT 1\n\nSELECT 2\n";
        let targets = read_targets(source)
            .await
            .map_err(|err| TargetError::from(format!("read failed: {}", err)))?;
        if targets != vec![Target::new("SELECT 1"), Target::new("SELECT 2")] {
            return Err(TargetError::from(format!("unexpected targets: {:?}", targets)));
        }
        Ok(())
    })
}

#[test]
fn lazy_targeter_cycles_through_file() -> Result<(), TargetError> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| TargetError::from(format!("tempdir failed: {}", err)))?;
        let path = dir.path().join("targets.sql");
        std::fs::write(&path, "SELECT 1\n\nSELECT 2\nSELECT 3\n")
            .map_err(|err| TargetError::from(format!("write failed: {}", err)))?;

        let targeter = LazyTargeter::new(&path);
        let mut bodies = Vec::new();
        for _ in 0..7 {
            bodies.push(targeter.next_target().await?.body);
        }
        let expected = [
            "SELECT 1", "SELECT 2", "SELECT 3", "SELECT 1", "SELECT 2", "SELECT 3", "SELECT 1",
        ];
        if bodies != expected {
            return Err(TargetError::from(format!("unexpected order: {:?}", bodies)));
        }
        Ok(())
    })
}

#[test]
fn lazy_targeter_reports_exhaustion_for_empty_file() -> Result<(), TargetError> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| TargetError::from(format!("tempdir failed: {}", err)))?;
        let path = dir.path().join("empty.sql");
        std::fs::write(&path, "\n\n")
            .map_err(|err| TargetError::from(format!("write failed: {}", err)))?;

        let targeter = LazyTargeter::new(&path);
        match targeter.next_target().await {
            Err(TargetError::Exhausted) => Ok(()),
            other => Err(TargetError::from(format!("expected exhaustion, got {:?}", other))),
        }
    })
}

#[test]
fn lazy_targeter_reports_read_failure_once() -> Result<(), TargetError> {
    run_async_test(async {
        let dir = tempdir().map_err(|err| TargetError::from(format!("tempdir failed: {}", err)))?;
        let targeter = LazyTargeter::new(dir.path().join("missing.sql"));

        match targeter.next_target().await {
            Err(TargetError::Read { .. }) => {}
            other => {
                return Err(TargetError::from(format!(
                    "expected read error, got {:?}",
                    other
                )));
            }
        }
        match targeter.next_target().await {
            Err(TargetError::Exhausted) => Ok(()),
            other => Err(TargetError::from(format!("expected exhaustion, got {:?}", other))),
        }
    })
}
