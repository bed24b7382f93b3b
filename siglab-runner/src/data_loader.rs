//! CSV ingest for exchange export files.
//!
//! Binance-style hourly exports carry a banner line above the real header
//! and list rows newest-first. Loading skips the banner, resolves the
//! date/OHLCV columns by name (case-insensitive), parses both timestamp
//! renderings the exports use, and returns candles in chronological order —
//! reversing a newest-first feed here so the engine never has to.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;

use siglab_core::domain::Candle;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: bad {field} value '{value}'")]
    BadField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("{path} contains no data rows")]
    Empty { path: String },
}

/// Load candles from a CSV export, skipping the banner line and restoring
/// chronological order.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>, LoadError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    // The first line is a site banner, not the header.
    let mut banner = String::new();
    reader
        .read_line(&mut banner)
        .map_err(|source| LoadError::Io {
            path: display.clone(),
            source,
        })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };

    let date_idx = find("date").ok_or(LoadError::MissingColumn("date"))?;
    let open_idx = find("open").ok_or(LoadError::MissingColumn("open"))?;
    let high_idx = find("high").ok_or(LoadError::MissingColumn("high"))?;
    let low_idx = find("low").ok_or(LoadError::MissingColumn("low"))?;
    let close_idx = find("close").ok_or(LoadError::MissingColumn("close"))?;
    // Exports name the base-asset volume column after the asset
    // ("Volume BTC"); fall back to a plain "volume" header.
    let volume_idx = headers
        .iter()
        .position(|h| h.to_ascii_lowercase().starts_with("volume"));

    let mut candles = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;

        let raw_date = record.get(date_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_date).ok_or_else(|| LoadError::BadField {
            row,
            field: "date",
            value: raw_date.to_string(),
        })?;

        let number = |idx: usize, field: &'static str| -> Result<f64, LoadError> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>().map_err(|_| LoadError::BadField {
                row,
                field,
                value: raw.to_string(),
            })
        };

        let volume = match volume_idx {
            Some(idx) => number(idx, "volume")?,
            None => 0.0,
        };

        candles.push(Candle {
            timestamp,
            open: number(open_idx, "open")?,
            high: number(high_idx, "high")?,
            low: number(low_idx, "low")?,
            close: number(close_idx, "close")?,
            volume,
        });
    }

    if candles.is_empty() {
        return Err(LoadError::Empty { path: display });
    }

    // Exports list newest first; flip descending feeds to chronological.
    if candles.first().map(|c| c.timestamp) > candles.last().map(|c| c.timestamp) {
        candles.reverse();
    }

    Ok(candles)
}

/// Parse the timestamp renderings seen in exchange exports.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
