//! Engine acceptance tests: capital accounting scenarios with hand-computed
//! expectations.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use siglab_core::domain::Bar;
use siglab_core::engine::{BacktestEngine, EngineConfig, TradeParams};

fn ts(hour: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(hour)
}

fn bar(hour: i64, close: f64, enter_long: bool, enter_short: bool) -> Bar {
    Bar {
        timestamp: ts(hour),
        close,
        enter_long,
        enter_short,
    }
}

fn default_engine() -> BacktestEngine {
    BacktestEngine::new(EngineConfig::default())
}

fn unit_params() -> TradeParams {
    TradeParams {
        stop_loss_pct: 0.1,
        take_profit_pct: 0.1,
        position_size: 1.0,
    }
}

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn single_bar_long_open() {
    // Entry 100, stop 90, target 110. Cost = 100 * 1.00125 = 100.125.
    let bars = vec![bar(0, 100.0, true, false)];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    assert_eq!(run.value_history.len(), 1);
    assert_approx(run.ending_cash, 999_899.875);
    // Open long marked at the close, commission-free.
    assert_approx(run.value_history[0], 999_999.875);
}

#[test]
fn take_profit_close_realizes_pnl() {
    let bars = vec![bar(0, 100.0, true, false), bar(1, 111.0, false, false)];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    // Exit fills at the close 111, not at the 110 target:
    // proceeds = 111 * (1 - 0.00125) = 110.86125.
    assert_approx(run.ending_cash, 1_000_010.73625);
    // Nothing open after the exit; value equals cash.
    assert_approx(run.value_history[1], 1_000_010.73625);
}

#[test]
fn insufficient_cash_skips_open_silently() {
    let engine = BacktestEngine::new(EngineConfig {
        starting_cash: 50.0,
        ..EngineConfig::default()
    });
    let bars = vec![bar(0, 100.0, true, false)];
    let run = engine.run(&bars, &unit_params()).unwrap();

    assert_eq!(run.value_history, vec![50.0]);
    assert_eq!(run.ending_cash, 50.0);
}

#[test]
fn short_lifecycle_uses_mirrored_formulas() {
    // Short at 100: stop 110, target 90.
    let bars = vec![
        bar(0, 100.0, false, true),
        bar(1, 95.0, false, false),
        bar(2, 89.0, false, false),
    ];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    // Bar 1: 95 breaches neither threshold; unrealized mark
    // = entry + (entry - close) = 105.
    assert_approx(run.value_history[1], 999_899.875 + 105.0);

    // Bar 2: 89 breaches the target. Proceeds = 100 + 11 * (1 - 0.00125).
    assert_approx(run.ending_cash, 999_899.875 + 110.98625);
    assert_approx(run.value_history[2], run.ending_cash);
}

#[test]
fn short_stop_closes_on_rally() {
    let bars = vec![bar(0, 100.0, false, true), bar(1, 112.0, false, false)];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    // Proceeds = 100 + (100 - 112) * (1 - 0.00125) = 100 - 11.985.
    assert_approx(run.ending_cash, 999_899.875 + 100.0 - 12.0 * 0.99875);
    assert_approx(run.value_history[1], run.ending_cash);
}

#[test]
fn gap_through_both_thresholds_closes_once_at_close() {
    // Long at 100 (stop 90, target 110); the next close gaps to 150.
    let bars = vec![bar(0, 100.0, true, false), bar(1, 150.0, false, false)];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    assert_approx(run.ending_cash, 999_899.875 + 150.0 * 0.99875);
    assert_approx(run.value_history[1], run.ending_cash);
}

#[test]
fn downward_gap_closes_at_close_not_stop() {
    let bars = vec![bar(0, 100.0, true, false), bar(1, 50.0, false, false)];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    // Fill at 50, well through the 90 stop.
    assert_approx(run.ending_cash, 999_899.875 + 50.0 * 0.99875);
}

#[test]
fn same_bar_close_frees_cash_for_open() {
    // Starting cash only covers one position at a time. The bar-1 exit at
    // 111 must settle before the bar-1 entry is funded.
    let engine = BacktestEngine::new(EngineConfig {
        starting_cash: 120.0,
        ..EngineConfig::default()
    });
    let bars = vec![bar(0, 100.0, true, false), bar(1, 111.0, true, false)];
    let run = engine.run(&bars, &unit_params()).unwrap();

    // cash: 120 - 100.125 = 19.875; + 110.86125 = 130.73625;
    // - 111 * 1.00125 = 19.5975 with a fresh long at 111 still open.
    assert_approx(run.ending_cash, 19.5975);
    assert_approx(run.value_history[1], 19.5975 + 111.0);
}

#[test]
fn closed_position_never_reevaluated() {
    // The long closes on bar 1; the later crash must not touch cash again.
    let bars = vec![
        bar(0, 100.0, true, false),
        bar(1, 111.0, false, false),
        bar(2, 80.0, false, false),
    ];
    let run = default_engine().run(&bars, &unit_params()).unwrap();

    assert_approx(run.value_history[2], run.value_history[1]);
}

#[test]
fn fractional_sizes_are_supported() {
    let params = TradeParams {
        stop_loss_pct: 0.1,
        take_profit_pct: 0.1,
        position_size: 0.4,
    };
    let bars = vec![bar(0, 100.0, true, false)];
    let run = default_engine().run(&bars, &params).unwrap();

    // cost = 100 * 0.4 * 1.00125 = 40.05; mark = 0.4 * 100 = 40.
    assert_approx(run.ending_cash, 1_000_000.0 - 40.05);
    assert_approx(run.value_history[0], 1_000_000.0 - 40.05 + 40.0);
}

#[test]
fn history_is_aligned_with_input() {
    let bars: Vec<Bar> = (0..500)
        .map(|i| bar(i, 100.0 + (i as f64 * 0.3).sin() * 20.0, i % 17 == 0, i % 23 == 0))
        .collect();
    let run = default_engine().run(&bars, &unit_params()).unwrap();
    assert_eq!(run.value_history.len(), bars.len());
    assert!(run.value_history.iter().all(|v| v.is_finite()));
}

#[test]
fn runs_are_independent() {
    // Positions never carry across calls: a run that ends with an open long
    // has no effect on the next run over a different frame.
    let engine = default_engine();
    let opening = vec![bar(0, 100.0, true, false)];
    let quiet = vec![bar(0, 100.0, false, false)];

    let _ = engine.run(&opening, &unit_params()).unwrap();
    let second = engine.run(&quiet, &unit_params()).unwrap();
    assert_eq!(second.value_history, vec![1_000_000.0]);
}
