//! Technical indicators over candle series.
//!
//! All rolling indicators accept partial windows: a value appears from the
//! very first bar, computed over however much history exists, and only
//! reaches full strength once `min_periods` bars have passed. NaN closes
//! inside a window propagate to the output.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Candle;

/// A single-output indicator computed over a candle series.
pub trait Indicator {
    /// Stable column name, parameterized (e.g. `sma_20`).
    fn name(&self) -> &str;

    /// Bars needed before the window is fully seeded. Values appear earlier
    /// than this (partial windows), but are based on fewer observations.
    fn min_periods(&self) -> usize;

    /// Output aligned 1:1 with the input candles.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
pub(crate) fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, NaiveDate};
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: base + Duration::hours(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}
