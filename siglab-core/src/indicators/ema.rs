//! Exponential Moving Average (EMA), span form: alpha = 2 / (span + 1).
//!
//! Non-adjusted recurrence seeded at the first finite close:
//! y[i] = alpha * x[i] + (1 - alpha) * y[i-1].

use super::Indicator;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema_series(&closes, self.span)
    }
}

/// EMA over a raw value series. NaN inputs produce NaN outputs without
/// disturbing the running state.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = vec![f64::NAN; values.len()];
    let mut state: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        let next = match state {
            None => value,
            Some(prev) => alpha * value + (1.0 - alpha) * prev,
        };
        state = Some(next);
        result[i] = next;
    }

    result
}
