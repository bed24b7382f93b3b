//! Bar — the engine's input row: close price plus entry signal flags.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the signal frame consumed by the engine.
///
/// Produced by the signal stage from a [`Candle`](super::Candle) series.
/// Immutable once produced. The engine requires bars in chronological
/// ascending order and rejects frames that violate it; reversing a
/// newest-first feed is the loader's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    /// Enter-long flag from the signal generator.
    pub enter_long: bool,
    /// Enter-short flag from the signal generator.
    pub enter_short: bool,
}

impl Bar {
    /// A bar with no signals, useful as a quiet filler.
    pub fn flat(timestamp: NaiveDateTime, close: f64) -> Self {
        Self {
            timestamp,
            close,
            enter_long: false,
            enter_short: false,
        }
    }
}
