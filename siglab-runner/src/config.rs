//! Run configuration: a TOML file naming the data file and every
//! parameter group. Missing fields fall back to the library defaults, so
//! an empty `[engine]` table is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use siglab_core::engine::{EngineConfig, TradeParams};
use siglab_core::signals::SignalParams;

use crate::metrics::HOURLY_PERIODS_PER_YEAR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

fn default_periods_per_year() -> usize {
    HOURLY_PERIODS_PER_YEAR
}

/// Everything one backtest run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Candle CSV to load.
    pub data: PathBuf,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub signal: SignalParams,

    #[serde(default)]
    pub trade: TradeParams,

    /// Annualization factor; 8760 for hourly bars.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: usize,
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Default configuration over the given data file.
    pub fn for_data(data: PathBuf) -> Self {
        Self {
            data,
            engine: EngineConfig::default(),
            signal: SignalParams::default(),
            trade: TradeParams::default(),
            periods_per_year: HOURLY_PERIODS_PER_YEAR,
        }
    }

    /// Content-derived run identifier: identical configs hash to the same
    /// id, so artifacts from re-runs overwrite rather than pile up.
    pub fn run_id(&self) -> String {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&encoded).to_hex()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let cfg: RunConfig = toml::from_str("data = \"btc_1h.csv\"").unwrap();
        assert_eq!(cfg.data, PathBuf::from("btc_1h.csv"));
        assert_eq!(cfg.engine.starting_cash, 1_000_000.0);
        assert_eq!(cfg.engine.commission_rate, 0.00125);
        assert_eq!(cfg.signal.rsi_window, 14);
        assert_eq!(cfg.periods_per_year, 8760);
    }

    #[test]
    fn full_toml_round_trips() {
        let toml_src = r#"
data = "data/eth.csv"
periods_per_year = 8760

[engine]
starting_cash = 250000.0
commission_rate = 0.001

[signal]
rsi_window = 10
rsi_buy = 25.0
rsi_sell = 80.0
sma_window = 15
bb_window = 12
bb_dev = 1.75

[trade]
stop_loss_pct = 0.05
take_profit_pct = 0.08
position_size = 2.5
"#;
        let cfg: RunConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.engine.starting_cash, 250_000.0);
        assert_eq!(cfg.signal.bb_dev, 1.75);
        assert_eq!(cfg.trade.position_size, 2.5);

        let re = toml::to_string(&cfg).unwrap();
        let back: RunConfig = toml::from_str(&re).unwrap();
        assert_eq!(back.run_id(), cfg.run_id());
    }

    #[test]
    fn run_id_tracks_content() {
        let a = RunConfig::for_data(PathBuf::from("x.csv"));
        let mut b = a.clone();
        assert_eq!(a.run_id(), b.run_id());

        b.trade.stop_loss_pct = 0.07;
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RunConfig::load(Path::new("/nonexistent/run.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reports_bad_toml() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data = [not toml").unwrap();
        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
