use std::fmt::Write as _;
use std::time::Duration;

use hdrhistogram::Histogram;

use crate::attack::HitResult;
use crate::error::{AppError, AppResult, SinkError};

/// Latency histogram in microseconds.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> AppResult<Self> {
        let hist = Histogram::<u64>::new(3).map_err(|err| {
            AppError::sink(SinkError::Histogram {
                context: "create histogram",
                message: err.to_string(),
            })
        })?;
        Ok(Self { hist })
    }

    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency: Duration) -> AppResult<()> {
        let micros = u64::try_from(latency.as_micros())
            .unwrap_or(u64::MAX)
            .max(1);
        self.hist.record(micros).map_err(|err| {
            AppError::sink(SinkError::Histogram {
                context: "record latency",
                message: err.to_string(),
            })
        })
    }

    #[must_use]
    pub fn quantile(&self, quantile: f64) -> Duration {
        if self.hist.len() == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.hist.value_at_quantile(quantile))
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        Duration::from_micros(self.hist.max())
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}

/// Running totals over a result stream.
#[derive(Debug)]
pub struct RunSummary {
    pub total: u64,
    pub successes: u64,
    latency_sum: Duration,
    histogram: LatencyHistogram,
}

impl RunSummary {
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot be created.
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            total: 0,
            successes: 0,
            latency_sum: Duration::ZERO,
            histogram: LatencyHistogram::new()?,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the latency cannot be recorded.
    pub fn record(&mut self, result: &HitResult) -> AppResult<()> {
        self.total = self.total.saturating_add(1);
        if result.is_success() {
            self.successes = self.successes.saturating_add(1);
        }
        self.latency_sum = self.latency_sum.saturating_add(result.latency);
        self.histogram.record(result.latency)
    }

    #[must_use]
    pub const fn errors(&self) -> u64 {
        self.total.saturating_sub(self.successes)
    }

    #[must_use]
    pub fn mean_latency(&self) -> Duration {
        u32::try_from(self.total)
            .ok()
            .and_then(|total| self.latency_sum.checked_div(total))
            .unwrap_or(Duration::ZERO)
    }

    /// Success ratio in hundredths of a percent.
    #[must_use]
    pub fn success_ratio_x100(&self) -> u64 {
        self.successes
            .saturating_mul(10_000)
            .checked_div(self.total)
            .unwrap_or(0)
    }

    /// Renders the summary as aligned text lines.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn render(&self, workers: u64) -> AppResult<String> {
        let ratio = self.success_ratio_x100();
        let mut out = String::new();
        let write_err = |err| AppError::sink(SinkError::Format { source: err });
        writeln!(out, "Requests   [total]          {}", self.total).map_err(write_err)?;
        writeln!(
            out,
            "Success    [ratio]          {}.{:02}%",
            ratio / 100,
            ratio % 100
        )
        .map_err(write_err)?;
        writeln!(out, "Errors     [count]          {}", self.errors()).map_err(write_err)?;
        writeln!(
            out,
            "Latencies  [mean, 50, 90, 99, max]  {:?}, {:?}, {:?}, {:?}, {:?}",
            self.mean_latency(),
            self.histogram.quantile(0.5),
            self.histogram.quantile(0.9),
            self.histogram.quantile(0.99),
            self.histogram.max()
        )
        .map_err(write_err)?;
        writeln!(out, "Workers    [final]          {}", workers).map_err(write_err)?;
        Ok(out)
    }
}
