//! Bar-by-bar backtest loop: close expiring positions, open on signal,
//! mark the book to market.

use chrono::NaiveDateTime;
use thiserror::Error;

use super::config::{EngineConfig, TradeParams};
use crate::domain::{Bar, Book, Position};

/// Structural input errors. Business-rule oddities (insufficient cash,
/// inverted thresholds) never error — the engine is total over well-formed
/// frames.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bar {index} is out of order: {timestamp} precedes {previous}")]
    OutOfOrder {
        index: usize,
        timestamp: NaiveDateTime,
        previous: NaiveDateTime,
    },
}

/// Output of one engine invocation.
#[derive(Debug, Clone)]
pub struct BacktestRun {
    /// Portfolio value at each bar close, aligned 1:1 with the input frame.
    pub value_history: Vec<f64>,
    /// Cash balance after the final bar. Positions still open at that point
    /// remain open: they are in the last history entry as unrealized marks,
    /// not in this balance.
    pub ending_cash: f64,
}

/// The backtest engine: a pure, synchronous simulator of the long/short
/// position lifecycle under commission frictions.
///
/// One instance is immutable and reusable; every [`run`](Self::run) owns its
/// own book, so independent runs may execute concurrently from parallel
/// workers.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: EngineConfig,
}

impl BacktestEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the strategy over `bars`, returning the per-bar portfolio value
    /// series and the final cash balance.
    ///
    /// Every run starts from a flat book at `starting_cash`; open positions
    /// never carry from one call to the next, so windowed invocations over
    /// contiguous slices cold-start at each boundary. Within a bar, closes
    /// are evaluated before opens — cash freed by an exit is available to a
    /// same-bar entry. Exits always fill at the bar close. An empty frame
    /// yields an empty history and unchanged cash.
    pub fn run(&self, bars: &[Bar], params: &TradeParams) -> Result<BacktestRun, EngineError> {
        validate_chronology(bars)?;

        let commission = self.config.commission_rate;
        let mut book = Book::new(self.config.starting_cash);
        let mut value_history = Vec::with_capacity(bars.len());

        for bar in bars {
            let close = bar.close;

            // Close pass: rebuild each open set from its survivors. Removal
            // during iteration is confined to `retain`, so every position is
            // evaluated exactly once per bar.
            {
                let Book {
                    cash,
                    open_longs,
                    open_shorts,
                } = &mut book;

                open_longs.retain(|pos| {
                    if pos.should_close(close) {
                        *cash += pos.close_proceeds(close, commission);
                        false
                    } else {
                        true
                    }
                });

                open_shorts.retain(|pos| {
                    if pos.should_close(close) {
                        *cash += pos.close_proceeds(close, commission);
                        false
                    } else {
                        true
                    }
                });
            }

            // Open pass: entries gated on cash strictly exceeding cost.
            // Insufficient cash skips the open silently.
            if bar.enter_long {
                let cost = close * params.position_size * (1.0 + commission);
                if book.cash > cost {
                    book.cash -= cost;
                    book.open_longs.push(Position::open_long(
                        close,
                        params.stop_loss_pct,
                        params.take_profit_pct,
                        params.position_size,
                    ));
                }
            }

            if bar.enter_short {
                let cost = close * params.position_size * (1.0 + commission);
                if book.cash > cost {
                    book.cash -= cost;
                    book.open_shorts.push(Position::open_short(
                        close,
                        params.stop_loss_pct,
                        params.take_profit_pct,
                        params.position_size,
                    ));
                }
            }

            value_history.push(book.mark_to_market(close));
        }

        Ok(BacktestRun {
            value_history,
            ending_cash: book.cash,
        })
    }
}

fn validate_chronology(bars: &[Bar]) -> Result<(), EngineError> {
    for (i, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(EngineError::OutOfOrder {
                index: i + 1,
                timestamp: pair[1].timestamp,
                previous: pair[0].timestamp,
            });
        }
    }
    Ok(())
}
