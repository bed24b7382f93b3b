//! Run artifacts: the report produced by one backtest, plus JSON and CSV
//! export. JSON carries a schema version so stale artifacts fail loudly
//! instead of deserializing into the wrong shape.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use siglab_core::domain::Candle;
use siglab_core::engine::{BacktestEngine, TradeParams};
use siglab_core::signals::{build_frame, SignalParams};

use crate::config::RunConfig;
use crate::metrics::PerformanceSummary;

/// Bumped whenever the report layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// One point on the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Complete record of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub schema_version: u32,
    pub run_id: String,
    pub signal: SignalParams,
    pub trade: TradeParams,
    pub equity_curve: Vec<EquityPoint>,
    pub ending_cash: f64,
    pub summary: PerformanceSummary,
}

impl BacktestReport {
    /// Run the full pipeline over the candles: signals, engine, metrics.
    pub fn compute(candles: &[Candle], config: &RunConfig) -> Result<Self> {
        let frame = build_frame(candles, &config.signal);
        let engine = BacktestEngine::new(config.engine.clone());
        let run = engine
            .run(&frame, &config.trade)
            .context("backtest failed")?;

        let summary =
            PerformanceSummary::from_values(&run.value_history, config.periods_per_year);
        let equity_curve = frame
            .iter()
            .zip(&run.value_history)
            .map(|(bar, &value)| EquityPoint {
                timestamp: bar.timestamp,
                value,
            })
            .collect();

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            run_id: config.run_id(),
            signal: config.signal.clone(),
            trade: config.trade.clone(),
            equity_curve,
            ending_cash: run.ending_cash,
            summary,
        })
    }

    /// Write the report as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Read a report back, rejecting artifacts from other schema versions.
    pub fn import_json(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let report: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if report.schema_version != SCHEMA_VERSION {
            bail!(
                "{}: schema version {} (expected {})",
                path.display(),
                report.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(report)
    }

    /// Write the equity curve as a two-column CSV.
    pub fn export_equity_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        wtr.write_record(["timestamp", "value"])?;
        for point in &self.equity_curve {
            wtr.write_record([
                point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.2}", point.value),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
