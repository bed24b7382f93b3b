//! Backtest engine — position lifecycle state machine and capital accounting.

pub mod backtest;
pub mod config;

pub use backtest::{BacktestEngine, BacktestRun, EngineError};
pub use config::{EngineConfig, ParamDiagnostic, TradeParams};
