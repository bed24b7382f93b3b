//! Periodic returns table over an equity curve.
//!
//! Rows are calendar months; each carries the month's return plus the
//! most recent completed quarterly and annual returns, forward-filled so
//! the quarter's figure repeats on the months after its quarter-end until
//! the next one lands. Undefined cells (first period of a series) are
//! `None` and render as a dash.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::result::EquityPoint;

/// One monthly row of the returns table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsRow {
    /// Timestamp of the month's last equity point.
    pub period_end: NaiveDateTime,
    pub monthly: Option<f64>,
    pub quarterly: Option<f64>,
    pub annual: Option<f64>,
}

/// Monthly/quarterly/annual returns, one row per calendar month present
/// in the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsTable {
    pub rows: Vec<ReturnsRow>,
}

/// Last value per period, keyed by a chronologically ordered period key.
fn period_lasts<K: PartialEq + Copy>(
    curve: &[EquityPoint],
    key: impl Fn(&EquityPoint) -> K,
) -> Vec<(K, NaiveDateTime, f64)> {
    let mut out: Vec<(K, NaiveDateTime, f64)> = Vec::new();
    for point in curve {
        let k = key(point);
        match out.last_mut() {
            Some(last) if last.0 == k => {
                last.1 = point.timestamp;
                last.2 = point.value;
            }
            _ => out.push((k, point.timestamp, point.value)),
        }
    }
    out
}

/// Percentage change between successive period-end values; the first
/// period has no predecessor and gets `None`.
fn period_returns<K: Copy>(lasts: &[(K, NaiveDateTime, f64)]) -> Vec<(K, Option<f64>)> {
    lasts
        .iter()
        .enumerate()
        .map(|(i, &(k, _, value))| {
            let ret = (i > 0).then(|| value / lasts[i - 1].2 - 1.0);
            (k, ret)
        })
        .collect()
}

fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3
}

/// Calendar month in which a quarter ends (3, 6, 9, 12).
fn quarter_end_month(quarter: u32) -> u32 {
    (quarter + 1) * 3
}

/// Build the returns table from a chronological equity curve.
pub fn returns_table(curve: &[EquityPoint]) -> ReturnsTable {
    let months = period_lasts(curve, |p| (p.timestamp.year(), p.timestamp.month()));
    let quarters = period_lasts(curve, |p| {
        (p.timestamp.year(), quarter_of(p.timestamp.month()))
    });
    let years = period_lasts(curve, |p| p.timestamp.year());

    let monthly = period_returns(&months);
    let quarterly = period_returns(&quarters);
    let annual = period_returns(&years);

    let rows = months
        .iter()
        .zip(&monthly)
        .map(|(&((year, month), period_end, _), &(_, m_ret))| {
            // A quarter's return becomes visible at its quarter-end month
            // and is carried forward until the next quarter completes.
            let q_ret = quarterly
                .iter()
                .filter(|&&((qy, qq), _)| (qy, quarter_end_month(qq)) <= (year, month))
                .last()
                .and_then(|&(_, r)| r);
            let a_ret = annual
                .iter()
                .filter(|&&(ry, _)| ry < year || (ry == year && month == 12))
                .last()
                .and_then(|&(_, r)| r);

            ReturnsRow {
                period_end,
                monthly: m_ret,
                quarterly: q_ret,
                annual: a_ret,
            }
        })
        .collect();

    ReturnsTable { rows }
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>9.4}", v),
        None => format!("{:>9}", "—"),
    }
}

impl ReturnsTable {
    /// Plain-text rendering for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<12} {:>9} {:>9} {:>9}",
            "period", "monthly", "quarterly", "annual"
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<12} {} {} {}",
                row.period_end.format("%Y-%m-%d"),
                cell(row.monthly),
                cell(row.quarterly),
                cell(row.annual)
            );
        }
        out
    }

    /// CSV rendering; empty cells stay empty.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("period,monthly,quarterly,annual\n");
        let csv_cell = |v: Option<f64>| v.map(|r| format!("{r:.6}")).unwrap_or_default();
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{},{},{}",
                row.period_end.format("%Y-%m-%d"),
                csv_cell(row.monthly),
                csv_cell(row.quarterly),
                csv_cell(row.annual)
            );
        }
        out
    }
}
