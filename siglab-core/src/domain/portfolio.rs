//! Book — cash plus the open long and short position sets for one run.

use super::position::Position;

/// Aggregate portfolio state owned exclusively by a single engine run.
///
/// Cash is mutated only by the engine; positions live in the book for their
/// whole lifetime and are never aliased outside it. The valuation identity
/// must hold at every bar: `value == cash + sum(position marks)`.
#[derive(Debug, Clone)]
pub struct Book {
    pub cash: f64,
    pub open_longs: Vec<Position>,
    pub open_shorts: Vec<Position>,
}

impl Book {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            cash: starting_cash,
            open_longs: Vec::new(),
            open_shorts: Vec::new(),
        }
    }

    /// Portfolio value at the given close: cash plus commission-free marks
    /// of every open position.
    pub fn mark_to_market(&self, close: f64) -> f64 {
        let longs: f64 = self.open_longs.iter().map(|p| p.mark(close)).sum();
        let shorts: f64 = self.open_shorts.iter().map(|p| p.mark(close)).sum();
        self.cash + longs + shorts
    }

    pub fn open_position_count(&self) -> usize {
        self.open_longs.len() + self.open_shorts.len()
    }
}
