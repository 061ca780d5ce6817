use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Encoding of result records.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Csv,
}
