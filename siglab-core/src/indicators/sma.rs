//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices. Partial windows are allowed: index i < period
//! averages over the i+1 bars seen so far.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];

        for i in 0..n {
            let start = (i + 1).saturating_sub(self.period);
            let window = &candles[start..=i];

            let mut sum = 0.0;
            let mut has_nan = false;
            for candle in window {
                if candle.close.is_nan() {
                    has_nan = true;
                    break;
                }
                sum += candle.close;
            }

            if !has_nan {
                result[i] = sum / window.len() as f64;
            }
        }

        result
    }
}
