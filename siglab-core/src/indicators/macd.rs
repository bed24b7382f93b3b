//! MACD — moving average convergence/divergence.
//!
//! macd = EMA(close, short) - EMA(close, long)
//! signal = EMA(macd, signal_span)
//! histogram = macd - signal
//!
//! Three aligned output columns, so this one does not fit the single-output
//! [`Indicator`](super::Indicator) trait and exposes its own `compute`.

use super::ema::ema_series;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Macd {
    short_span: usize,
    long_span: usize,
    signal_span: usize,
}

/// The three MACD columns, aligned 1:1 with the input candles.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Macd {
    pub fn new(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        assert!(
            short_span >= 1 && long_span > short_span && signal_span >= 1,
            "MACD spans must satisfy 1 <= short < long, signal >= 1"
        );
        Self {
            short_span,
            long_span,
            signal_span,
        }
    }

    pub fn compute(&self, candles: &[Candle]) -> MacdOutput {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let short = ema_series(&closes, self.short_span);
        let long = ema_series(&closes, self.long_span);

        let macd: Vec<f64> = short.iter().zip(&long).map(|(s, l)| s - l).collect();
        let signal = ema_series(&macd, self.signal_span);
        let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn macd_zero_on_constant_prices() {
        let candles = make_candles(&[100.0; 40]);
        let out = Macd::default().compute(&candles);
        assert_approx(out.macd[39], 0.0, DEFAULT_EPSILON);
        assert_approx(out.signal[39], 0.0, DEFAULT_EPSILON);
        assert_approx(out.histogram[39], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        let out = Macd::new(12, 26, 9).compute(&candles);
        // Short EMA tracks the rise faster than the long EMA.
        assert!(out.macd[59] > 0.0);
        assert!(out.histogram.len() == 60);
    }

    #[test]
    fn macd_histogram_is_macd_minus_signal() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let candles = make_candles(&closes);
        let out = Macd::default().compute(&candles);
        for i in 0..30 {
            assert_approx(out.histogram[i], out.macd[i] - out.signal[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    #[should_panic]
    fn macd_rejects_inverted_spans() {
        let _ = Macd::new(26, 12, 9);
    }
}
