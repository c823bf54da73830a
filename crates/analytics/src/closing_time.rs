//! Block closing time estimation.
//!
//! Closing times are the gaps between consecutive block timestamps, recorded
//! in whole milliseconds into an HDR histogram covering 0 ms to 24 h at one
//! significant figure. Values are quantized to their histogram bucket, so the
//! estimate is accurate to a few percent rather than to the millisecond.

use blockstats_config::{CLOSING_TIME_SIGNIFICANT_FIGURES, MAX_CLOSING_TIME_MS};
use hdrhistogram::Histogram;
use std::collections::VecDeque;
use thiserror::Error;

/// Histogram construction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimatorError {
    #[error("closing time histogram could not be created: {0}")]
    Histogram(String),

    #[error("an estimator needs at least one window")]
    NoWindows,
}

/// Rolling estimate of the block closing time.
///
/// Values go into the newest of `window_count` histograms; [`rotate`]
/// discards the oldest window once all are in use. The estimate covers every
/// live window. With a single window, rotating is the same as resetting.
///
/// [`rotate`]: ClosingTimeEstimator::rotate
#[derive(Debug, Clone)]
pub struct ClosingTimeEstimator {
    windows: VecDeque<Histogram<u64>>,
    window_count: usize,
    clamped: u64,
}

impl ClosingTimeEstimator {
    /// Single-window estimator
    pub fn new() -> Result<Self, EstimatorError> {
        Self::windowed(1)
    }

    /// Estimator keeping up to `window_count` windows
    pub fn windowed(window_count: usize) -> Result<Self, EstimatorError> {
        if window_count == 0 {
            return Err(EstimatorError::NoWindows);
        }

        let mut windows = VecDeque::with_capacity(window_count);
        windows.push_back(new_window()?);

        Ok(Self {
            windows,
            window_count,
            clamped: 0,
        })
    }

    /// Records one closing time.
    ///
    /// Negative gaps (a clock stepping backwards) count as 0 ms and gaps
    /// beyond 24 h count as 24 h; both are tallied in [`clamped`].
    ///
    /// [`clamped`]: ClosingTimeEstimator::clamped
    pub fn record(&mut self, delta_ms: i64) {
        let value = match u64::try_from(delta_ms) {
            Ok(value) if value <= MAX_CLOSING_TIME_MS => value,
            Ok(_) => {
                self.clamped += 1;
                MAX_CLOSING_TIME_MS
            }
            Err(_) => {
                self.clamped += 1;
                0
            }
        };

        if let Some(current) = self.windows.back_mut() {
            current.saturating_record(value);
        }
    }

    /// Mean of every recorded value in the live windows, 0.0 when empty
    pub fn estimate(&self) -> f64 {
        let samples = self.samples();
        if samples == 0 {
            return 0.0;
        }

        let weighted: f64 = self
            .windows
            .iter()
            .map(|window| window.mean() * window.len() as f64)
            .sum();
        weighted / samples as f64
    }

    /// Number of recorded values in the live windows
    pub fn samples(&self) -> u64 {
        self.windows.iter().map(Histogram::len).sum()
    }

    /// Number of values that fell outside 0 ms ..= 24 h since the last reset
    pub fn clamped(&self) -> u64 {
        self.clamped
    }

    /// Opens a new window, dropping the oldest when all windows are in use
    pub fn rotate(&mut self) {
        if self.windows.len() < self.window_count {
            if let Some(mut fresh) = self.windows.front().cloned() {
                fresh.reset();
                self.windows.push_back(fresh);
            }
        } else if let Some(mut oldest) = self.windows.pop_front() {
            oldest.reset();
            self.windows.push_back(oldest);
        }
    }

    /// Clears every window
    pub fn reset(&mut self) {
        for window in &mut self.windows {
            window.reset();
        }
        self.clamped = 0;
    }
}

fn new_window() -> Result<Histogram<u64>, EstimatorError> {
    Histogram::new_with_bounds(1, MAX_CLOSING_TIME_MS, CLOSING_TIME_SIGNIFICANT_FIGURES)
        .map_err(|e| EstimatorError::Histogram(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        // one significant figure quantizes each value by at most ~1.6%
        let tolerance = expected * 0.02;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} +/- {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    #[test]
    fn test_empty_estimate_is_zero() {
        let estimator = ClosingTimeEstimator::new().unwrap();
        assert_eq!(estimator.estimate(), 0.0);
        assert_eq!(estimator.samples(), 0);
    }

    #[test]
    fn test_estimate_is_mean() {
        let mut estimator = ClosingTimeEstimator::new().unwrap();
        estimator.record(1000);
        estimator.record(2000);
        assert_eq!(estimator.samples(), 2);
        assert_close(estimator.estimate(), 1500.0);
    }

    #[test]
    fn test_small_values_are_exact() {
        let mut estimator = ClosingTimeEstimator::new().unwrap();
        for value in [0, 4, 8, 12] {
            estimator.record(value);
        }
        assert_eq!(estimator.estimate(), 6.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut estimator = ClosingTimeEstimator::new().unwrap();
        estimator.record(-5_000);
        estimator.record(i64::MAX);

        assert_eq!(estimator.samples(), 2);
        assert_eq!(estimator.clamped(), 2);
        assert_close(estimator.estimate(), MAX_CLOSING_TIME_MS as f64 / 2.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut estimator = ClosingTimeEstimator::new().unwrap();
        estimator.record(-1);
        estimator.record(300);
        estimator.reset();

        assert_eq!(estimator.samples(), 0);
        assert_eq!(estimator.clamped(), 0);
        assert_eq!(estimator.estimate(), 0.0);
    }

    #[test]
    fn test_single_window_rotation_discards_values() {
        let mut estimator = ClosingTimeEstimator::new().unwrap();
        estimator.record(10);
        estimator.rotate();
        assert_eq!(estimator.samples(), 0);
    }

    #[test]
    fn test_rotation_keeps_recent_windows() {
        let mut estimator = ClosingTimeEstimator::windowed(2).unwrap();
        estimator.record(10);
        estimator.rotate();
        estimator.record(20);
        assert_eq!(estimator.samples(), 2);
        assert_eq!(estimator.estimate(), 15.0);

        estimator.rotate();
        estimator.record(30);
        assert_eq!(estimator.samples(), 2);
        assert_eq!(estimator.estimate(), 25.0);
    }

    #[test]
    fn test_zero_windows_rejected() {
        assert_eq!(
            ClosingTimeEstimator::windowed(0).unwrap_err(),
            EstimatorError::NoWindows
        );
    }
}
