/// `--targets` value that reads standard input.
pub const DEFAULT_TARGETS: &str = "stdin";
/// `--output` value that writes standard output.
pub const DEFAULT_OUTPUT: &str = "stdout";

/// Config filenames checked when `--config` is not given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["sqlvolley.toml", "sqlvolley.json"];

pub(super) const DEFAULT_DURATION: &str = "10s";
pub(super) const DEFAULT_TIMEOUT: &str = "30s";
pub(super) const DEFAULT_RATE: u64 = 50;
