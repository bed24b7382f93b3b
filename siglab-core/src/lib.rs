//! SigLab Core — domain types, backtest engine, indicators, signal generation.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (candles, signal bars, positions, the portfolio book)
//! - Bar-by-bar event loop: close expiring positions, open on signal,
//!   mark to market
//! - Capital accounting under commission frictions with long/short
//!   sign conventions
//! - Technical indicators (SMA, RSI, Bollinger, EMA, MACD)
//! - Signal generation from indicator columns to boolean entry flags

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signals;
