//! Core library for the `sqlvolley` CLI.
//!
//! An [`attack::Attacker`] issues SQL queries against a shared SQLite
//! connection pool at a fixed rate for a fixed duration and streams one
//! [`attack::HitResult`] per scheduled hit. Queries come from a
//! [`target::Targeter`]; the pool sits behind the [`backend::Backend`]
//! trait. The `sqlvolley` binary wires these to CLI flags, config files
//! and result sinks.
pub mod args;
pub mod attack;
pub mod backend;
pub mod config;
pub mod error;
pub mod sinks;
pub mod target;
