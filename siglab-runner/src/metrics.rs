//! Performance metrics — pure functions over periodic returns.
//!
//! Every metric takes a return series (successive value ratios minus one)
//! and a `periods_per_year` for annualization: 8760 for hourly bars.
//! Undefined cases (too few observations, zero volatility, no drawdown)
//! return NaN rather than a sentinel; ranking callers penalize non-finite
//! scores explicitly.

use serde::{Deserialize, Serialize};

/// Annualization factor for hourly bars.
pub const HOURLY_PERIODS_PER_YEAR: usize = 8760;

/// Aggregate statistics for one portfolio value series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub sharpe: f64,
    pub sortino: f64,
    pub calmar: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
}

impl PerformanceSummary {
    /// Compute all statistics from a portfolio value series.
    pub fn from_values(values: &[f64], periods_per_year: usize) -> Self {
        let returns = returns_from_values(values);
        Self {
            sharpe: sharpe_ratio(&returns, 0.0, periods_per_year),
            sortino: sortino_ratio(&returns, 0.0, periods_per_year),
            calmar: calmar_ratio(&returns, periods_per_year),
            max_drawdown: max_drawdown(&returns),
            win_rate: win_rate(&returns),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Periodic returns as successive ratios of the value series.
pub fn returns_from_values(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Annualized Sharpe ratio.
///
/// mean(excess) * ppy / (sample_std(excess) * sqrt(ppy)). NaN when there are
/// fewer than two returns or volatility is zero.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: usize) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }
    let ppy = periods_per_year as f64;
    let rf = risk_free_rate / ppy;
    let excess: Vec<f64> = returns.iter().map(|r| r - rf).collect();
    let ann_return = mean(&excess) * ppy;
    let ann_vol = sample_std(&excess) * ppy.sqrt();
    if ann_vol == 0.0 {
        return f64::NAN;
    }
    ann_return / ann_vol
}

/// Annualized Sortino ratio: excess return over downside deviation.
///
/// Downside deviation is the sample stddev of the negative returns only;
/// NaN when fewer than two returns are negative.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: usize) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }
    let ppy = periods_per_year as f64;
    let rf = risk_free_rate / ppy;
    let excess: Vec<f64> = returns.iter().map(|r| r - rf).collect();
    let ann_return = mean(&excess) * ppy;

    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    let downside_vol = sample_std(&downside) * ppy.sqrt();
    if downside_vol == 0.0 {
        return f64::NAN;
    }
    ann_return / downside_vol
}

/// Calmar ratio: annualized mean return over |max drawdown| of the
/// compounded curve. NaN when the curve never draws down.
pub fn calmar_ratio(returns: &[f64], periods_per_year: usize) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let max_dd = max_drawdown(returns);
    if max_dd == 0.0 || max_dd.is_nan() {
        return f64::NAN;
    }
    let ann_return = mean(returns) * periods_per_year as f64;
    ann_return / max_dd.abs()
}

/// Maximum drawdown of the compounded return curve, as a negative fraction.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let mut cum = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for &r in returns {
        cum *= 1.0 + r;
        if cum > peak {
            peak = cum;
        }
        let dd = (cum - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Fraction of strictly positive returns. NaN on an empty series.
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let winners = returns.iter().filter(|&&r| r > 0.0).count();
    winners as f64 / returns.len() as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). NaN for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
