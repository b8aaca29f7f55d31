//! CSV file adapters: candle input and signal output.

use crate::domain::error::StrategyError;
use crate::domain::ohlcv::Candle;
use crate::domain::pairlist::Pair;
use crate::domain::signal::SignalFrame;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ALT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reads `<base>/<BASE>_<QUOTE>-<timeframe>.csv` with header
/// `date,open,high,low,close,volume`.
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, pair: &str, timeframe: Timeframe) -> Result<PathBuf, StrategyError> {
        let pair = Pair::parse(pair).map_err(|e| StrategyError::Data {
            reason: e.to_string(),
        })?;
        Ok(self
            .base_path
            .join(format!("{}-{}.csv", pair.file_stem(), timeframe)))
    }
}

fn data_err(reason: impl Into<String>) -> StrategyError {
    StrategyError::Data {
        reason: reason.into(),
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, StrategyError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, ALT_TIMESTAMP_FORMAT))
        .map_err(|e| data_err(format!("invalid timestamp '{}': {}", value, e)))
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, StrategyError> {
    record
        .get(index)
        .ok_or_else(|| data_err(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| data_err(format!("invalid {} value: {}", name, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        pair: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Candle>, StrategyError> {
        let path = self.csv_path(pair, timeframe)?;
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date = record
                .get(0)
                .ok_or_else(|| data_err("missing date column"))?;

            candles.push(Candle {
                pair: pair.to_string(),
                timestamp: parse_timestamp(date)?,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        if let Some(w) = candles.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(data_err(format!(
                "duplicate candle at {} in {}",
                w[0].timestamp,
                path.display()
            )));
        }

        debug!(pair, path = %path.display(), candles = candles.len(), "loaded candles");
        Ok(candles)
    }

    fn list_pairs(&self, timeframe: Timeframe) -> Result<Vec<String>, StrategyError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_err(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let suffix = format!("-{}.csv", timeframe);
        let mut pairs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| data_err(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(stem) = name_str.strip_suffix(&suffix) {
                if let Some((base, quote)) = stem.split_once('_') {
                    pairs.push(format!("{}/{}", base, quote));
                }
            }
        }

        pairs.sort();
        Ok(pairs)
    }

    fn get_data_range(
        &self,
        pair: &str,
        timeframe: Timeframe,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StrategyError> {
        let path = self.csv_path(pair, timeframe)?;
        if !path.exists() {
            return Ok(None);
        }
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        // Only the date column is parsed; price fields are checked on fetch.
        let mut range: Option<(NaiveDateTime, NaiveDateTime, usize)> = None;
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;
            let date = record
                .get(0)
                .ok_or_else(|| data_err("missing date column"))?;
            let ts = parse_timestamp(date)?;
            range = Some(match range {
                None => (ts, ts, 1),
                Some((first, last, count)) => (first.min(ts), last.max(ts), count + 1),
            });
        }
        Ok(range)
    }
}

/// Writes `<output>/<BASE>_<QUOTE>-<timeframe>-signals.csv`.
pub struct CsvSignalWriter {
    output_dir: PathBuf,
}

impl CsvSignalWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn signals_path(&self, pair: &str, timeframe: Timeframe) -> Result<PathBuf, StrategyError> {
        let pair = Pair::parse(pair).map_err(|e| data_err(e.to_string()))?;
        Ok(self
            .output_dir
            .join(format!("{}-{}-signals.csv", pair.file_stem(), timeframe)))
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn format_flag(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

pub fn write_signals_csv(path: &Path, signals: &SignalFrame) -> Result<(), StrategyError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| data_err(format!("failed to create {}: {}", path.display(), e)))?;
    let frame = &signals.frame;

    let mut header: Vec<String> = ["date", "open", "high", "low", "close", "volume"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(frame.columns().map(|(c, _)| c.name().to_string()));
    header.push("enter_long".into());
    header.push("exit_long".into());
    wtr.write_record(&header)
        .map_err(|e| data_err(format!("CSV write error: {}", e)))?;

    for (i, candle) in frame.candles.iter().enumerate() {
        let mut row = vec![
            candle.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format_value(candle.open),
            format_value(candle.high),
            format_value(candle.low),
            format_value(candle.close),
            format_value(candle.volume),
        ];
        row.extend(frame.columns().map(|(_, values)| format_value(values[i])));
        row.push(format_flag(signals.enter_long[i]).into());
        row.push(format_flag(signals.exit_long[i]).into());
        wtr.write_record(&row)
            .map_err(|e| data_err(format!("CSV write error: {}", e)))?;
    }

    wtr.flush()?;
    Ok(())
}

impl SignalPort for CsvSignalWriter {
    fn write(&self, signals: &SignalFrame, timeframe: Timeframe) -> Result<String, StrategyError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.signals_path(&signals.frame.pair, timeframe)?;
        write_signals_csv(&path, signals)?;
        Ok(path.display().to_string())
    }
}
