//! SigLab CLI — run and optimize commands.
//!
//! Commands:
//! - `run` — backtest one parameter set over a slice of a candle CSV
//! - `optimize` — random search on the training slice, then report the
//!   winner on the test slice

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use siglab_runner::config::RunConfig;
use siglab_runner::data_loader::load_candles;
use siglab_runner::report::returns_table;
use siglab_runner::result::BacktestReport;
use siglab_runner::search::{random_search, SearchSpace};
use siglab_runner::split::split;

#[derive(Parser)]
#[command(name = "siglab", about = "SigLab — mean-reversion backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Slice {
    Train,
    Test,
    Validation,
    Full,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one parameter set over a slice of the data.
    Run {
        /// Candle CSV file. Required unless --config names one.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Which chronological slice to run on.
        #[arg(long, value_enum, default_value_t = Slice::Validation)]
        slice: Slice,

        /// Stop-loss distance override (fraction of entry price).
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Take-profit distance override (fraction of entry price).
        #[arg(long)]
        take_profit: Option<f64>,

        /// Position size override (units per entry).
        #[arg(long)]
        size: Option<f64>,

        /// Output directory for result artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Random parameter search on the training slice.
    Optimize {
        /// Candle CSV file.
        #[arg(long)]
        data: PathBuf,

        /// Number of candidates to draw and score.
        #[arg(long, default_value_t = 50)]
        trials: usize,

        /// RNG seed; the same seed always draws the same candidates.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory for result artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            slice,
            stop_loss,
            take_profit,
            size,
            output_dir,
        } => run_cmd(data, config, slice, stop_loss, take_profit, size, output_dir),
        Commands::Optimize {
            data,
            trials,
            seed,
            output_dir,
        } => optimize_cmd(data, trials, seed, output_dir),
    }
}

fn run_cmd(
    data: Option<PathBuf>,
    config_path: Option<PathBuf>,
    slice: Slice,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    size: Option<f64>,
    output_dir: PathBuf,
) -> Result<()> {
    let mut config = match (&config_path, &data) {
        (Some(path), _) => RunConfig::load(path)?,
        (None, Some(data)) => RunConfig::for_data(data.clone()),
        (None, None) => bail!("one of --data or --config is required"),
    };
    if let Some(data) = data {
        config.data = data;
    }
    if let Some(sl) = stop_loss {
        config.trade.stop_loss_pct = sl;
    }
    if let Some(tp) = take_profit {
        config.trade.take_profit_pct = tp;
    }
    if let Some(n) = size {
        config.trade.position_size = n;
    }

    for diagnostic in config.trade.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    let candles = load_candles(&config.data)?;
    let slices = split(&candles);
    let selected = match slice {
        Slice::Train => slices.train,
        Slice::Test => slices.test,
        Slice::Validation => slices.validation,
        Slice::Full => candles.as_slice(),
    };
    println!(
        "Loaded {} candles; running on {:?} slice ({} candles)",
        candles.len(),
        slice,
        selected.len()
    );

    let report = BacktestReport::compute(selected, &config)?;
    print_report(&report);
    save_artifacts(&report, &output_dir)?;

    Ok(())
}

fn optimize_cmd(data: PathBuf, trials: usize, seed: u64, output_dir: PathBuf) -> Result<()> {
    let mut config = RunConfig::for_data(data);
    let candles = load_candles(&config.data)?;
    let slices = split(&candles);

    println!(
        "Loaded {} candles; searching {} candidates on {} training candles (seed {})",
        candles.len(),
        trials,
        slices.train.len(),
        seed
    );

    let outcome = random_search(
        slices.train,
        &SearchSpace::default(),
        &config.engine,
        trials,
        seed,
        config.periods_per_year,
    )?;

    let best = &outcome.best;
    println!();
    println!("Best candidate {} (train score {:.4}):", best.candidate.id(), best.score);
    println!("{}", serde_json::to_string_pretty(&best.candidate)?);

    // Score the winner out-of-sample before anyone trusts it.
    config.signal = best.candidate.signal.clone();
    config.trade = best.candidate.trade.clone();
    let report = BacktestReport::compute(slices.test, &config)?;

    println!();
    println!("Out-of-sample (test slice):");
    print_report(&report);
    save_artifacts(&report, &output_dir)?;

    let trials_path = output_dir.join(format!("{}_trials.json", report.run_id));
    std::fs::write(&trials_path, serde_json::to_string_pretty(&outcome.trials)?)
        .with_context(|| format!("failed to write {}", trials_path.display()))?;
    println!("Trial log saved to: {}", trials_path.display());

    Ok(())
}

fn print_report(report: &BacktestReport) {
    let s = &report.summary;
    println!("Ending cash:  {:.2}", report.ending_cash);
    println!("Sharpe:       {:.4}", s.sharpe);
    println!("Sortino:      {:.4}", s.sortino);
    println!("Calmar:       {:.4}", s.calmar);
    println!("Max drawdown: {:.4}", s.max_drawdown);
    println!("Win rate:     {:.4}", s.win_rate);
    println!();
    print!("{}", returns_table(&report.equity_curve).render());
}

fn save_artifacts(report: &BacktestReport, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let json_path = output_dir.join(format!("{}.json", report.run_id));
    report.export_json(&json_path)?;

    let equity_path = output_dir.join(format!("{}_equity.csv", report.run_id));
    report.export_equity_csv(&equity_path)?;

    let table_path = output_dir.join(format!("{}_returns.csv", report.run_id));
    std::fs::write(&table_path, returns_table(&report.equity_curve).to_csv())
        .with_context(|| format!("failed to write {}", table_path.display()))?;

    println!("Artifacts saved to: {}", output_dir.display());
    Ok(())
}
