use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_value};
use crate::error::ValidationError;

/// Settings accepted from `sqlvolley.toml` / `sqlvolley.json`.
///
/// Every field mirrors a CLI flag of the same name.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub targets: Option<String>,
    pub output: Option<String>,
    pub body: Option<String>,
    pub lazy: Option<bool>,
    pub duration: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub rate: Option<u64>,
    pub workers: Option<u64>,
    pub max_open_conns: Option<usize>,
    pub max_idle_conns: Option<usize>,
    pub dsn: Option<String>,
    pub no_follow: Option<bool>,
    pub format: Option<OutputFormat>,
    pub summary: Option<bool>,
    pub verbose: Option<bool>,
}

/// Either a number of seconds or a string such as `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
