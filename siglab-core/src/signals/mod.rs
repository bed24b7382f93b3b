//! Signal generation — indicator columns to boolean entry flags.
//!
//! The rule is mean-reversion with a trend check: enter long when RSI is
//! oversold and the close has stretched below both the lower Bollinger band
//! and the SMA; enter short on the mirror image. A bar where any indicator
//! value is NaN produces no signal.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Candle};
use crate::indicators::{Bollinger, Indicator, Rsi, Sma};

fn default_rsi_window() -> usize {
    14
}
fn default_rsi_buy() -> f64 {
    30.0
}
fn default_rsi_sell() -> f64 {
    70.0
}
fn default_sma_window() -> usize {
    20
}
fn default_bb_window() -> usize {
    20
}
fn default_bb_dev() -> f64 {
    2.0
}

/// Indicator and threshold parameters for the signal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,
    /// Enter-long requires RSI strictly below this level.
    #[serde(default = "default_rsi_buy")]
    pub rsi_buy: f64,
    /// Enter-short requires RSI strictly above this level.
    #[serde(default = "default_rsi_sell")]
    pub rsi_sell: f64,
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
    #[serde(default = "default_bb_window")]
    pub bb_window: usize,
    /// Bollinger band width in standard deviations.
    #[serde(default = "default_bb_dev")]
    pub bb_dev: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_window: default_rsi_window(),
            rsi_buy: default_rsi_buy(),
            rsi_sell: default_rsi_sell(),
            sma_window: default_sma_window(),
            bb_window: default_bb_window(),
            bb_dev: default_bb_dev(),
        }
    }
}

/// Compute indicators over the candles and produce the engine's input frame.
///
/// The output is aligned 1:1 with the input and preserves its order; the
/// caller is responsible for the candles already being chronological.
pub fn build_frame(candles: &[Candle], params: &SignalParams) -> Vec<Bar> {
    let rsi = Rsi::new(params.rsi_window).compute(candles);
    let sma = Sma::new(params.sma_window).compute(candles);
    let lower = Bollinger::lower(params.bb_window, params.bb_dev).compute(candles);
    let upper = Bollinger::upper(params.bb_window, params.bb_dev).compute(candles);

    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let close = candle.close;
            let valid = close.is_finite()
                && rsi[i].is_finite()
                && sma[i].is_finite()
                && lower[i].is_finite()
                && upper[i].is_finite();

            let enter_long =
                valid && rsi[i] < params.rsi_buy && close < lower[i] && close < sma[i];
            let enter_short =
                valid && rsi[i] > params.rsi_sell && close > upper[i] && close > sma[i];

            Bar {
                timestamp: candle.timestamp,
                close,
                enter_long,
                enter_short,
            }
        })
        .collect()
}
