//! Result record encoding and run summaries.
mod encoder;
mod summary;


pub use encoder::{CSV_HEADER, ResultEncoder};
pub use summary::{LatencyHistogram, RunSummary};
