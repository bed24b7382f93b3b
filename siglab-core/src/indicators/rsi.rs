//! Relative Strength Index (RSI).
//!
//! Simple-mean variant: gains and losses are averaged with a plain rolling
//! window (partial windows allowed), not Wilder smoothing, and the loss
//! denominator carries a 1e-9 epsilon. RSI = 100 - 100 / (1 + gains/losses).
//! Index 0 has no price change and stays NaN.

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

const EPS: f64 = 1e-9;

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        // One change per bar from index 1, full window at period + 1.
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];
        if n < 2 {
            return result;
        }

        // Per-bar gains and losses; index 0 is undefined.
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let curr = candles[i].close;
            let prev = candles[i - 1].close;
            if curr.is_nan() || prev.is_nan() {
                continue;
            }
            let change = curr - prev;
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        for i in 1..n {
            let start = i.saturating_sub(self.period - 1).max(1);
            let window = start..=i;

            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            let mut has_nan = false;
            for j in window.clone() {
                if gains[j].is_nan() {
                    has_nan = true;
                    break;
                }
                gain_sum += gains[j];
                loss_sum += losses[j];
            }
            if has_nan {
                continue;
            }

            let len = (i - start + 1) as f64;
            let avg_gain = gain_sum / len;
            let avg_loss = loss_sum / len;
            let rs = avg_gain / (avg_loss + EPS);
            result[i] = 100.0 - 100.0 / (1.0 + rs);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles};

    #[test]
    fn rsi_all_gains_saturates_high() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&candles);
        assert!(result[0].is_nan());
        // avg_loss is zero, epsilon keeps rs finite but huge
        assert!(result[3] > 99.99);
        assert!(result[5] > 99.99);
    }

    #[test]
    fn rsi_all_losses_saturates_low() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&candles);
        assert!(result[3] < 0.01);
    }

    #[test]
    fn rsi_partial_window_from_second_bar() {
        let candles = make_candles(&[100.0, 102.0, 101.0]);
        let result = Rsi::new(14).compute(&candles);
        assert!(result[0].is_nan());
        // one change, all gain
        assert!(result[1] > 99.99);
        // gains [2, 0], losses [0, 1] → rs = 1/0.5 = 2 → rsi ≈ 66.67
        assert_approx(result[2], 100.0 - 100.0 / (1.0 + 2.0), 1e-6);
    }

    #[test]
    fn rsi_bounds() {
        let candles = make_candles(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&candles);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_nan_propagation() {
        let mut candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0]);
        candles[2].close = f64::NAN;
        let result = Rsi::new(2).compute(&candles);
        // changes at 2 and 3 are undefined
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan()); // window covers change 3
        assert!(!result[6].is_nan());
    }
}
