//! Runs one attack from parsed CLI arguments.
mod inputs;
mod runner;


pub(crate) use runner::run_attack;
