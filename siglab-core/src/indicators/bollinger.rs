//! Bollinger Bands — rolling mean +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: rolling mean of close
//! - Upper: middle + mult * stddev
//! - Lower: middle - mult * stddev
//!
//! Population stddev (divide by N), partial windows allowed; a one-bar
//! window has zero width.

use super::Indicator;
use crate::domain::Candle;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let tag = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{tag}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
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
            if has_nan {
                continue;
            }

            let len = window.len() as f64;
            let mean = sum / len;

            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper | BollingerBand::Lower => {
                    let variance: f64 = window
                        .iter()
                        .map(|candle| {
                            let diff = candle.close - mean;
                            diff * diff
                        })
                        .sum::<f64>()
                        / len;
                    let stddev = variance.sqrt();
                    match self.band {
                        BollingerBand::Upper => mean + self.multiplier * stddev,
                        BollingerBand::Lower => mean - self.multiplier * stddev,
                        BollingerBand::Middle => unreachable!(),
                    }
                }
            };
        }

        result
    }
}
