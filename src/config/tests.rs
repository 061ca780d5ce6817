use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::apply_config;
use super::loader::load_config_file;
use super::types::{ConfigFile, DurationValue};
use crate::args::{AttackArgs, OutputFormat};

fn parse_with_matches(argv: &[&str]) -> Result<(AttackArgs, clap::ArgMatches), String> {
    let matches = AttackArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = AttackArgs::from_arg_matches(&matches)
        .map_err(|err| format!("from matches failed: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("sqlvolley.toml");
    let content = r#"
targets = "queries.sql"
rate = 200
duration = "2m"
timeout = 5
max_idle_conns = 0
format = "csv"
no_follow = true
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.targets.as_deref() != Some("queries.sql") {
        return Err("Unexpected targets".to_owned());
    }
    if config.rate != Some(200) {
        return Err(format!("Unexpected rate: {:?}", config.rate));
    }
    if config.format != Some(OutputFormat::Csv) {
        return Err("Unexpected format".to_owned());
    }
    match config.duration {
        Some(DurationValue::Text(ref text)) if text == "2m" => {}
        other => return Err(format!("Unexpected duration: {:?}", other)),
    }
    match config.timeout {
        Some(DurationValue::Seconds(5)) => {}
        other => return Err(format!("Unexpected timeout: {:?}", other)),
    }
    if config.max_idle_conns != Some(0) || config.no_follow != Some(true) {
        return Err("Unexpected pool or follow settings".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("sqlvolley.json");
    let content = r#"{"dsn": "file:bench.db", "workers": 4, "summary": true}"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.dsn.as_deref() != Some("file:bench.db") {
        return Err("Unexpected dsn".to_owned());
    }
    if config.workers != Some(4) || config.summary != Some(true) {
        return Err("Unexpected workers or summary".to_owned());
    }
    Ok(())
}

#[test]
fn unknown_config_key_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("sqlvolley.toml");
    std::fs::write(&path, "url = \"http://localhost\"\n")
        .map_err(|err| format!("write failed: {}", err))?;

    match load_config_file(&path) {
        Ok(_) => Err("Expected parse error".to_owned()),
        Err(err) => {
            if err.to_string().contains("Failed to parse TOML config") {
                Ok(())
            } else {
                Err(format!("Unexpected error: {}", err))
            }
        }
    }
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("sqlvolley.yaml");
    std::fs::write(&path, "rate: 5\n").map_err(|err| format!("write failed: {}", err))?;

    match load_config_file(&path) {
        Ok(_) => Err("Expected extension error".to_owned()),
        Err(err) => {
            if err.to_string().contains("Unsupported config extension 'yaml'") {
                Ok(())
            } else {
                Err(format!("Unexpected error: {}", err))
            }
        }
    }
}

#[test]
fn apply_config_fills_unset_flags() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["sqlvolley"])?;
    let config = ConfigFile {
        rate: Some(7),
        duration: Some(DurationValue::Text("1500ms".to_owned())),
        dsn: Some("bench.db".to_owned()),
        lazy: Some(true),
        format: Some(OutputFormat::Csv),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.rate != 7 {
        return Err(format!("Unexpected rate: {}", args.rate));
    }
    if args.duration != Duration::from_millis(1500) {
        return Err(format!("Unexpected duration: {:?}", args.duration));
    }
    if args.dsn != "bench.db" || !args.lazy || args.format != OutputFormat::Csv {
        return Err("Config values were not applied".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_keeps_cli_values() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["sqlvolley", "--rate", "3", "--workers", "2"])?;
    let config = ConfigFile {
        rate: Some(100),
        workers: Some(50),
        max_open_conns: Some(8),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.rate != 3 || args.workers != 2 {
        return Err(format!(
            "CLI values overridden: rate={} workers={}",
            args.rate, args.workers
        ));
    }
    if args.max_open_conns != 8 {
        return Err(format!("Unexpected max_open_conns: {}", args.max_open_conns));
    }
    Ok(())
}

#[test]
fn apply_config_reports_bad_duration() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["sqlvolley"])?;
    let config = ConfigFile {
        timeout: Some(DurationValue::Text("5x".to_owned())),
        ..ConfigFile::default()
    };

    match apply_config(&mut args, &matches, &config) {
        Ok(()) => Err("Expected invalid duration".to_owned()),
        Err(err) => {
            let message = err.to_string();
            if message.contains("Invalid 'timeout' in config") && message.contains("'x'") {
                Ok(())
            } else {
                Err(format!("Unexpected error: {}", message))
            }
        }
    }
}
