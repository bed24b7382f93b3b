//! Engine configuration and per-run trade parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_starting_cash() -> f64 {
    1_000_000.0
}

fn default_commission_rate() -> f64 {
    0.00125
}

/// Capital and friction settings for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cash the book starts with on every run.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: f64,
    /// Proportional commission charged per realized transaction leg.
    /// Never applied to unrealized marks.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            commission_rate: default_commission_rate(),
        }
    }
}

/// Strategy trade parameters for one run: exit distances and position size.
///
/// Construction always succeeds. Fractions outside (0, 1) and non-positive
/// sizes are accepted — they merely change exit distances or make every open
/// fail its cash gate — but [`TradeParams::diagnostics`] reports them so
/// callers can warn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeParams {
    /// Fractional stop distance from entry (long stop below, short stop above).
    pub stop_loss_pct: f64,
    /// Fractional target distance from entry.
    pub take_profit_pct: f64,
    /// Quantity per position. Fractional sizes are supported; every position
    /// is opened and closed at exactly this size.
    pub position_size: f64,
}

impl Default for TradeParams {
    fn default() -> Self {
        Self {
            stop_loss_pct: 0.1,
            take_profit_pct: 0.1,
            position_size: 1.0,
        }
    }
}

impl TradeParams {
    /// Non-fatal configuration warnings. Empty for conventional values.
    pub fn diagnostics(&self) -> Vec<ParamDiagnostic> {
        let mut out = Vec::new();
        if !(0.0..1.0).contains(&self.stop_loss_pct) || self.stop_loss_pct == 0.0 {
            out.push(ParamDiagnostic::StopLossOutOfRange(self.stop_loss_pct));
        }
        if !(0.0..1.0).contains(&self.take_profit_pct) || self.take_profit_pct == 0.0 {
            out.push(ParamDiagnostic::TakeProfitOutOfRange(self.take_profit_pct));
        }
        if self.position_size <= 0.0 {
            out.push(ParamDiagnostic::NonPositiveSize(self.position_size));
        }
        out
    }
}

/// A degenerate-but-accepted parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDiagnostic {
    /// Stop-loss fraction outside (0, 1); exits may trigger immediately or never.
    StopLossOutOfRange(f64),
    /// Take-profit fraction outside (0, 1).
    TakeProfitOutOfRange(f64),
    /// Position size is zero or negative; no position will ever open usefully.
    NonPositiveSize(f64),
}

impl fmt::Display for ParamDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopLossOutOfRange(v) => {
                write!(f, "stop-loss fraction {v} is outside (0, 1)")
            }
            Self::TakeProfitOutOfRange(v) => {
                write!(f, "take-profit fraction {v} is outside (0, 1)")
            }
            Self::NonPositiveSize(v) => write!(f, "position size {v} is not positive"),
        }
    }
}
