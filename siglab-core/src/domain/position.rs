//! Position — an open long or short trade record.

use serde::{Deserialize, Serialize};

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

/// An open trade with fixed stop and target thresholds.
///
/// Threshold convention:
/// - Long: `stop_loss < entry_price < take_profit`
/// - Short: `take_profit < entry_price < stop_loss`
///
/// Size is atomic — a position is closed in full or not at all. A position's
/// lifetime is bounded by a single engine run; it is created when a signal
/// fires with sufficient cash and destroyed the moment a bar close breaches
/// either threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: f64,
}

impl Position {
    /// Open a long at `entry_price` with stop and target at fractional
    /// distances below and above entry.
    pub fn open_long(entry_price: f64, stop_loss_pct: f64, take_profit_pct: f64, size: f64) -> Self {
        Self {
            side: PositionSide::Long,
            entry_price,
            stop_loss: entry_price * (1.0 - stop_loss_pct),
            take_profit: entry_price * (1.0 + take_profit_pct),
            size,
        }
    }

    /// Open a short at `entry_price`. Thresholds mirror the long convention:
    /// the stop sits above entry, the target below.
    pub fn open_short(
        entry_price: f64,
        stop_loss_pct: f64,
        take_profit_pct: f64,
        size: f64,
    ) -> Self {
        Self {
            side: PositionSide::Short,
            entry_price,
            stop_loss: entry_price * (1.0 + stop_loss_pct),
            take_profit: entry_price * (1.0 - take_profit_pct),
            size,
        }
    }

    /// Whether the bar close breaches the stop or the target.
    ///
    /// Both breaches trigger the same closure action: the exit always fills
    /// at the bar close, never at the threshold level itself, so a gap bar
    /// that jumps both thresholds closes exactly once at the close price.
    pub fn should_close(&self, close: f64) -> bool {
        match self.side {
            PositionSide::Long => close < self.stop_loss || close > self.take_profit,
            PositionSide::Short => close > self.stop_loss || close < self.take_profit,
        }
    }

    /// Commission-free mark-to-market value at the given close.
    ///
    /// Commission is a realized transaction cost only; marking an open
    /// position never deducts it.
    pub fn mark(&self, close: f64) -> f64 {
        match self.side {
            PositionSide::Long => self.size * close,
            PositionSide::Short => {
                self.entry_price * self.size + (self.entry_price - close) * self.size
            }
        }
    }

    /// Cash credited when closing at the given close, net of commission.
    ///
    /// A long pays commission on the full exit notional. A short returns its
    /// entry notional untouched and pays commission only on the P&L leg.
    pub fn close_proceeds(&self, close: f64, commission_rate: f64) -> f64 {
        match self.side {
            PositionSide::Long => self.size * close * (1.0 - commission_rate),
            PositionSide::Short => {
                self.entry_price * self.size
                    + (self.entry_price - close) * self.size * (1.0 - commission_rate)
            }
        }
    }

    /// Whether stop and target sit on the expected sides of entry.
    ///
    /// Holds whenever the position was opened with fractions in (0, 1);
    /// inverted fractions produce a position that closes on the next bar
    /// regardless of direction.
    pub fn thresholds_ordered(&self) -> bool {
        match self.side {
            PositionSide::Long => {
                self.stop_loss < self.entry_price && self.entry_price < self.take_profit
            }
            PositionSide::Short => {
                self.take_profit < self.entry_price && self.entry_price < self.stop_loss
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_thresholds() {
        let pos = Position::open_long(100.0, 0.1, 0.1, 1.0);
        assert!((pos.stop_loss - 90.0).abs() < 1e-9);
        assert!((pos.take_profit - 110.0).abs() < 1e-9);
        assert!(pos.thresholds_ordered());
    }

    #[test]
    fn short_thresholds_mirrored() {
        let pos = Position::open_short(100.0, 0.1, 0.1, 1.0);
        assert!((pos.stop_loss - 110.0).abs() < 1e-9);
        assert!((pos.take_profit - 90.0).abs() < 1e-9);
        assert!(pos.thresholds_ordered());
    }

    #[test]
    fn long_close_conditions() {
        let pos = Position::open_long(100.0, 0.1, 0.1, 1.0);
        assert!(!pos.should_close(100.0));
        assert!(!pos.should_close(90.0)); // at the stop, not through it
        assert!(pos.should_close(89.9));
        assert!(pos.should_close(110.5));
    }

    #[test]
    fn short_close_conditions() {
        let pos = Position::open_short(100.0, 0.1, 0.1, 1.0);
        assert!(!pos.should_close(100.0));
        assert!(!pos.should_close(95.0));
        assert!(pos.should_close(89.9)); // target breached downward
        assert!(pos.should_close(110.1)); // stop breached upward
    }

    #[test]
    fn long_mark_and_proceeds() {
        let pos = Position::open_long(100.0, 0.1, 0.1, 2.0);
        assert!((pos.mark(105.0) - 210.0).abs() < 1e-9);
        // 2 * 105 * (1 - 0.00125) = 209.7375
        assert!((pos.close_proceeds(105.0, 0.00125) - 209.7375).abs() < 1e-9);
    }

    #[test]
    fn short_mark_and_proceeds() {
        let pos = Position::open_short(100.0, 0.1, 0.1, 1.0);
        // Price fell: mark = 100 + (100 - 95) = 105
        assert!((pos.mark(95.0) - 105.0).abs() < 1e-9);
        // Proceeds = 100 + 5 * (1 - 0.00125) = 104.99375
        assert!((pos.close_proceeds(95.0, 0.00125) - 104.99375).abs() < 1e-9);
        // Price rose: P&L leg negative, commission still only on that leg
        assert!((pos.mark(103.0) - 97.0).abs() < 1e-9);
        assert!((pos.close_proceeds(103.0, 0.00125) - (100.0 - 3.0 * 0.99875)).abs() < 1e-9);
    }

    #[test]
    fn inverted_fractions_flagged() {
        // A "stop-loss" of -0.1 puts the long stop above entry.
        let pos = Position::open_long(100.0, -0.1, 0.1, 1.0);
        assert!(!pos.thresholds_ordered());
    }
}
