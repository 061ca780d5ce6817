use std::fmt::Write as _;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::args::OutputFormat;
use crate::attack::HitResult;
use crate::error::{AppError, AppResult, SinkError};

pub const CSV_HEADER: &str = "timestamp,latency_ns,bytes_in,bytes_out,code,error";

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    timestamp: String,
    latency_ns: u64,
    bytes_in: u64,
    bytes_out: u64,
    code: u16,
    error: &'a str,
}

impl<'a> From<&'a HitResult> for ResultRecord<'a> {
    fn from(result: &'a HitResult) -> Self {
        Self {
            timestamp: result.timestamp.to_rfc3339(),
            latency_ns: u64::try_from(result.latency.as_nanos()).unwrap_or(u64::MAX),
            bytes_in: result.bytes_in,
            bytes_out: result.bytes_out,
            code: result.code,
            error: &result.error,
        }
    }
}

/// Writes one record per hit result, as JSON lines or CSV.
#[derive(Debug)]
pub struct ResultEncoder<W> {
    writer: W,
    format: OutputFormat,
    line: String,
    header_written: bool,
}

impl<W> ResultEncoder<W>
where
    W: AsyncWrite + Unpin,
{
    pub const fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            line: String::new(),
            header_written: false,
        }
    }

    /// Encodes and writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be serialized or written.
    pub async fn encode(&mut self, result: &HitResult) -> AppResult<()> {
        self.line.clear();
        let record = ResultRecord::from(result);
        match self.format {
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(&record)
                    .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
                self.line.push_str(&json);
                self.line.push('\n');
            }
            OutputFormat::Csv => {
                if !self.header_written {
                    self.line.push_str(CSV_HEADER);
                    self.line.push('\n');
                    self.header_written = true;
                }
                writeln!(
                    &mut self.line,
                    "{},{},{},{},{},{}",
                    record.timestamp,
                    record.latency_ns,
                    record.bytes_in,
                    record.bytes_out,
                    record.code,
                    csv_quote(record.error)
                )
                .map_err(|err| AppError::sink(SinkError::Format { source: err }))?;
            }
        }
        self.writer
            .write_all(self.line.as_bytes())
            .await
            .map_err(|err| AppError::sink(SinkError::Write { source: err }))
    }

    /// Flushes buffered output and hands the writer back.
    ///
    /// # Errors
    ///
    /// Returns an error when the flush fails.
    pub async fn finish(mut self) -> AppResult<W> {
        self.writer
            .flush()
            .await
            .map_err(|err| AppError::sink(SinkError::Write { source: err }))?;
        Ok(self.writer)
    }
}

fn csv_quote(field: &str) -> String {
    if field.is_empty() {
        return String::new();
    }
    format!("\"{}\"", field.replace('"', "\"\""))
}
