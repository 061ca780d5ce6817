//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::AttackArgs;
pub use types::OutputFormat;

pub use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_OUTPUT, DEFAULT_TARGETS};
pub use parsers::parse_duration_value;
