//! Random parameter search with cross-validated scoring.
//!
//! Candidates are drawn from the tunable space with a seeded RNG, then
//! scored in parallel: each candidate builds its signal frame over the
//! training candles and runs the engine over seven contiguous folds. The
//! score is the mean Calmar ratio across folds, with non-finite results
//! pinned to a large negative value so they rank below anything real.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use siglab_core::domain::Candle;
use siglab_core::engine::{BacktestEngine, EngineConfig, EngineError, TradeParams};
use siglab_core::signals::{build_frame, SignalParams};

use crate::metrics::{calmar_ratio, returns_from_values};
use crate::split::folds;

/// Number of contiguous cross-validation folds.
pub const CV_FOLDS: usize = 7;

/// Score assigned when a candidate's mean Calmar is NaN or infinite.
pub const FAILED_SCORE: f64 = -1e6;

/// Errors from the search layer.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("trial count must be at least 1")]
    NoTrials,

    #[error("not enough data for {CV_FOLDS}-fold cross-validation ({0} candles)")]
    NotEnoughData(usize),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One point in the tunable space: signal parameters plus trade parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub signal: SignalParams,
    pub trade: TradeParams,
}

impl Candidate {
    /// Content-derived identifier, stable across runs for identical
    /// parameter sets.
    pub fn id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.signal.rsi_window.to_le_bytes());
        hasher.update(&self.signal.rsi_buy.to_le_bytes());
        hasher.update(&self.signal.rsi_sell.to_le_bytes());
        hasher.update(&self.signal.sma_window.to_le_bytes());
        hasher.update(&self.signal.bb_window.to_le_bytes());
        hasher.update(&self.signal.bb_dev.to_le_bytes());
        hasher.update(&self.trade.stop_loss_pct.to_le_bytes());
        hasher.update(&self.trade.take_profit_pct.to_le_bytes());
        hasher.update(&self.trade.position_size.to_le_bytes());
        hasher.finalize().to_hex()[..16].to_string()
    }
}

/// A scored candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    pub candidate: Candidate,
    pub score: f64,
}

/// Outcome of a search: the winner plus every trial, sorted best-first.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Trial,
    pub trials: Vec<Trial>,
}

/// Bounds for each tunable parameter.
///
/// Integer windows are drawn uniformly over inclusive ranges; band width
/// is drawn on a 0.05 grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSpace {
    pub rsi_window: (usize, usize),
    pub sma_window: (usize, usize),
    pub bb_window: (usize, usize),
    pub bb_dev: (f64, f64),
    pub rsi_buy: (f64, f64),
    pub rsi_sell: (f64, f64),
    pub stop_loss_pct: (f64, f64),
    pub take_profit_pct: (f64, f64),
    pub position_size: (f64, f64),
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            rsi_window: (7, 21),
            sma_window: (10, 30),
            bb_window: (10, 25),
            bb_dev: (1.5, 2.5),
            rsi_buy: (10.0, 45.0),
            rsi_sell: (60.0, 95.0),
            stop_loss_pct: (0.02, 0.2),
            take_profit_pct: (0.02, 0.2),
            position_size: (0.3, 10.0),
        }
    }
}

impl SearchSpace {
    /// Draw one candidate uniformly from the space.
    pub fn sample(&self, rng: &mut impl Rng) -> Candidate {
        let bb_dev_steps = ((self.bb_dev.1 - self.bb_dev.0) / 0.05).round() as u32;
        let bb_dev = self.bb_dev.0 + 0.05 * rng.gen_range(0..=bb_dev_steps) as f64;

        Candidate {
            signal: SignalParams {
                rsi_window: rng.gen_range(self.rsi_window.0..=self.rsi_window.1),
                rsi_buy: rng.gen_range(self.rsi_buy.0..=self.rsi_buy.1).round(),
                rsi_sell: rng.gen_range(self.rsi_sell.0..=self.rsi_sell.1).round(),
                sma_window: rng.gen_range(self.sma_window.0..=self.sma_window.1),
                bb_window: rng.gen_range(self.bb_window.0..=self.bb_window.1),
                bb_dev,
            },
            trade: TradeParams {
                stop_loss_pct: rng.gen_range(self.stop_loss_pct.0..=self.stop_loss_pct.1),
                take_profit_pct: rng
                    .gen_range(self.take_profit_pct.0..=self.take_profit_pct.1),
                position_size: rng.gen_range(self.position_size.0..=self.position_size.1),
            },
        }
    }
}

/// Score one candidate: mean Calmar ratio over contiguous folds of the
/// training data, with non-finite means pinned to [`FAILED_SCORE`].
pub fn score_candidate(
    candles: &[Candle],
    candidate: &Candidate,
    engine_config: &EngineConfig,
    periods_per_year: usize,
) -> Result<f64, SearchError> {
    let frame = build_frame(candles, &candidate.signal);
    let chunks = folds(&frame, CV_FOLDS);
    if chunks.is_empty() {
        return Err(SearchError::NotEnoughData(candles.len()));
    }

    let engine = BacktestEngine::new(engine_config.clone());
    let mut calmars = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let run = engine.run(chunk, &candidate.trade)?;
        let returns = returns_from_values(&run.value_history);
        calmars.push(calmar_ratio(&returns, periods_per_year));
    }

    let mean = calmars.iter().sum::<f64>() / calmars.len() as f64;
    if mean.is_finite() {
        Ok(mean)
    } else {
        Ok(FAILED_SCORE)
    }
}

/// Run a seeded random search over `trials` candidates.
///
/// Candidates are drawn sequentially from one `StdRng`, so a given seed
/// always produces the same candidate list; scoring fans out over the
/// rayon pool.
pub fn random_search(
    candles: &[Candle],
    space: &SearchSpace,
    engine_config: &EngineConfig,
    trials: usize,
    seed: u64,
    periods_per_year: usize,
) -> Result<SearchOutcome, SearchError> {
    if trials == 0 {
        return Err(SearchError::NoTrials);
    }
    if candles.len() < CV_FOLDS {
        return Err(SearchError::NotEnoughData(candles.len()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let candidates: Vec<Candidate> = (0..trials).map(|_| space.sample(&mut rng)).collect();

    let mut scored: Vec<Trial> = candidates
        .into_par_iter()
        .map(|candidate| {
            let score = score_candidate(candles, &candidate, engine_config, periods_per_year)?;
            Ok(Trial { candidate, score })
        })
        .collect::<Result<_, SearchError>>()?;

    // Best first; ties keep draw order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    let best = scored[0].clone();

    Ok(SearchOutcome {
        best,
        trials: scored,
    })
}
