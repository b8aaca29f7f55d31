#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rsimomentum::domain::error::StrategyError;
pub use rsimomentum::domain::ohlcv::Candle;
use rsimomentum::domain::orderbook::OrderBook;
use rsimomentum::domain::signal::SignalFrame;
use rsimomentum::domain::timeframe::Timeframe;
use rsimomentum::ports::data_port::DataPort;
use rsimomentum::ports::orderbook_port::OrderBookPort;
use rsimomentum::ports::signal_port::SignalPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, pair: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(pair.to_string(), candles);
        self
    }

    pub fn with_error(mut self, pair: &str, reason: &str) -> Self {
        self.errors.insert(pair.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        pair: &str,
        _timeframe: Timeframe,
    ) -> Result<Vec<Candle>, StrategyError> {
        if let Some(reason) = self.errors.get(pair) {
            return Err(StrategyError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(pair).cloned().unwrap_or_default())
    }

    fn list_pairs(&self, _timeframe: Timeframe) -> Result<Vec<String>, StrategyError> {
        let mut pairs: Vec<String> = self.data.keys().cloned().collect();
        pairs.sort();
        Ok(pairs)
    }

    fn get_data_range(
        &self,
        pair: &str,
        _timeframe: Timeframe,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StrategyError> {
        if let Some(reason) = self.errors.get(pair) {
            return Err(StrategyError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(pair) {
            Some(candles) if !candles.is_empty() => Ok(Some((
                candles[0].timestamp,
                candles[candles.len() - 1].timestamp,
                candles.len(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Order book returning a fixed snapshot and counting requests.
pub struct MockOrderBook {
    pub book: OrderBook,
    pub calls: Cell<usize>,
}

impl MockOrderBook {
    pub fn new(best_bid: f64, best_ask: f64) -> Self {
        Self {
            book: OrderBook {
                bids: vec![(best_bid, 1.0), (best_bid - 1.0, 2.0)],
                asks: vec![(best_ask, 1.0), (best_ask + 1.0, 2.0)],
            },
            calls: Cell::new(0),
        }
    }
}

impl OrderBookPort for MockOrderBook {
    fn orderbook(&self, _pair: &str, depth: usize) -> Result<OrderBook, StrategyError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.book.clone().truncated(depth))
    }
}

/// Keeps every written frame in memory.
pub struct RecordingSignalPort {
    pub written: RefCell<Vec<SignalFrame>>,
}

impl RecordingSignalPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl SignalPort for RecordingSignalPort {
    fn write(&self, signals: &SignalFrame, timeframe: Timeframe) -> Result<String, StrategyError> {
        self.written.borrow_mut().push(signals.clone());
        Ok(format!("memory://{}/{}", signals.frame.pair, timeframe))
    }
}

pub fn ts(row: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(5 * row as i64)
}

/// Candle whose typical price equals its close.
pub fn make_candle(pair: &str, row: usize, close: f64, volume: f64) -> Candle {
    Candle {
        pair: pair.to_string(),
        timestamp: ts(row),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume,
    }
}

pub fn candles_from_closes(pair: &str, closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_candle(pair, i, close, 100.0))
        .collect()
}

/// 140 falling by 1 to 100 at row 40, then rising by 2.
///
/// RSI(14) sits at 0 through row 40 and then reads 13.3, 24.2, 33.2, 40.8
/// on rows 41-44 while TEMA(9) turns up below the 20-row mid band.
pub fn v_bottom_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..=40).map(|i| 140.0 - i as f64).collect();
    closes.extend([102.0, 104.0, 106.0, 108.0, 110.0]);
    closes
}

/// 100 rising by 1 to 140 at row 40, three drops of 2, then one rise of 2.
///
/// RSI(14) reads 66.8 on row 43 and 70.5 on row 44, while TEMA(9) is still
/// falling above the mid band.
pub fn rounded_top_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..=40).map(|i| 100.0 + i as f64).collect();
    closes.extend([138.0, 136.0, 134.0, 136.0]);
    closes
}

/// Deterministic noisy wave for property-style checks.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + 8.0 * (x / 7.0).sin() + 3.0 * (x / 2.3).cos() + 0.02 * x
        })
        .collect()
}

pub fn flagged_rows(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, f)| **f)
        .map(|(i, _)| i)
        .collect()
}
