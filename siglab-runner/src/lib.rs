//! Backtest orchestration on top of `siglab-core`: loading candle CSVs,
//! chronological splitting, performance metrics, random parameter search,
//! and run artifacts.
//!
//! The usual pipeline is load → split → (optionally search on train) →
//! [`result::BacktestReport::compute`] on the slice of interest →
//! export.

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod report;
pub mod result;
pub mod search;
pub mod split;

pub use config::RunConfig;
pub use data_loader::load_candles;
pub use metrics::PerformanceSummary;
pub use report::returns_table;
pub use result::BacktestReport;
pub use search::{random_search, SearchOutcome, SearchSpace};
pub use split::{folds, split, DataSplit};
