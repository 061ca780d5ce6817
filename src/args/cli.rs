use std::time::Duration;

use clap::Parser;

use crate::attack::{DEFAULT_CONNECTIONS, DEFAULT_DSN, DEFAULT_WORKERS};

use super::defaults::{
    DEFAULT_DURATION, DEFAULT_OUTPUT, DEFAULT_RATE, DEFAULT_TARGETS, DEFAULT_TIMEOUT,
};
use super::parsers::parse_duration_value;
use super::types::OutputFormat;

#[derive(Debug, Parser, Clone)]
#[command(
    version,
    about = "Rate-paced SQL load generator - issues queries at a fixed rate for a fixed duration and streams one result record per hit."
)]
pub struct AttackArgs {
    /// Targets file with one query per line ("stdin" reads standard input)
    #[arg(long, default_value = DEFAULT_TARGETS, env = "SQLVOLLEY_TARGETS")]
    pub targets: String,

    /// Output file for result records ("stdout" writes standard output)
    #[arg(long, short, default_value = DEFAULT_OUTPUT, env = "SQLVOLLEY_OUTPUT")]
    pub output: String,

    /// File whose whole content is sent as the only query
    #[arg(long, env = "SQLVOLLEY_BODY")]
    pub body: Option<String>,

    /// Stream targets from the file instead of loading them up front
    #[arg(long, env = "SQLVOLLEY_LAZY")]
    pub lazy: bool,

    /// Duration of the attack; only whole seconds are scheduled (supports ms/s/m/h)
    #[arg(
        long,
        short,
        default_value = DEFAULT_DURATION,
        env = "SQLVOLLEY_DURATION",
        value_parser = parse_duration_value
    )]
    pub duration: Duration,

    /// Busy timeout applied to every backend connection (supports ms/s/m/h)
    #[arg(
        long,
        default_value = DEFAULT_TIMEOUT,
        env = "SQLVOLLEY_TIMEOUT",
        value_parser = parse_duration_value
    )]
    pub timeout: Duration,

    /// Hits per second
    #[arg(long, short, default_value_t = DEFAULT_RATE, env = "SQLVOLLEY_RATE")]
    pub rate: u64,

    /// Initial number of workers; more are started when all are busy
    #[arg(long, short, default_value_t = DEFAULT_WORKERS, env = "SQLVOLLEY_WORKERS")]
    pub workers: u64,

    /// Max open backend connections (0 = unlimited)
    #[arg(
        long = "max-open-conns",
        default_value_t = DEFAULT_CONNECTIONS,
        env = "SQLVOLLEY_MAX_OPEN_CONNS"
    )]
    pub max_open_conns: usize,

    /// Max idle backend connections kept for reuse (0 = none)
    #[arg(
        long = "max-idle-conns",
        default_value_t = DEFAULT_CONNECTIONS,
        env = "SQLVOLLEY_MAX_IDLE_CONNS"
    )]
    pub max_idle_conns: usize,

    /// SQLite data source: a database path, ":memory:", or a file: URI
    #[arg(long, default_value = DEFAULT_DSN, env = "SQLVOLLEY_DSN")]
    pub dsn: String,

    /// Backend does not follow redirections; "stopped after" failures count as successes
    #[arg(long = "no-follow", env = "SQLVOLLEY_NO_FOLLOW")]
    pub no_follow: bool,

    /// Result record format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl, env = "SQLVOLLEY_FORMAT")]
    pub format: OutputFormat,

    /// Print a run summary to stderr when the attack ends
    #[arg(long, env = "SQLVOLLEY_SUMMARY")]
    pub summary: bool,

    /// Enable debug logging
    #[arg(long, short, env = "SQLVOLLEY_VERBOSE")]
    pub verbose: bool,

    /// Path to a TOML or JSON config file
    #[arg(long, short, env = "SQLVOLLEY_CONFIG")]
    pub config: Option<String>,
}
