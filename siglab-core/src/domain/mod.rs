//! Domain types: candles, signal bars, positions, and the portfolio book.

pub mod bar;
pub mod candle;
pub mod portfolio;
pub mod position;

pub use bar::Bar;
pub use candle::Candle;
pub use portfolio::Book;
pub use position::{Position, PositionSide};
