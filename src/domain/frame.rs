//! Indicator stage: candle table augmented with named derived columns.
//!
//! Each column is aligned 1:1 with the candles; rows without enough history
//! hold NaN.

use crate::domain::error::StrategyError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{compute_indicators, strategy_indicators};
use crate::domain::ohlcv::Candle;
use crate::domain::strategy::RunMode;
use crate::ports::orderbook_port::OrderBookPort;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Which field of a multi-value indicator to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorField {
    Value,
    MacdLine,
    MacdSignal,
    MacdHistogram,
    StochasticK,
    StochasticD,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    Sine,
    LeadSine,
}

/// Derived columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Adx,
    Rsi,
    FastD,
    FastK,
    Macd,
    MacdSignal,
    MacdHist,
    Mfi,
    BbLowerband,
    BbMiddleband,
    BbUpperband,
    BbPercent,
    BbWidth,
    Sar,
    Tema,
    HtSine,
    HtLeadSine,
    BestBid,
    BestAsk,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Adx => "adx",
            Column::Rsi => "rsi",
            Column::FastD => "fastd",
            Column::FastK => "fastk",
            Column::Macd => "macd",
            Column::MacdSignal => "macdsignal",
            Column::MacdHist => "macdhist",
            Column::Mfi => "mfi",
            Column::BbLowerband => "bb_lowerband",
            Column::BbMiddleband => "bb_middleband",
            Column::BbUpperband => "bb_upperband",
            Column::BbPercent => "bb_percent",
            Column::BbWidth => "bb_width",
            Column::Sar => "sar",
            Column::Tema => "tema",
            Column::HtSine => "htsine",
            Column::HtLeadSine => "htleadsine",
            Column::BestBid => "best_bid",
            Column::BestAsk => "best_ask",
        }
    }

    /// The indicator series and field a column is read from, if it maps
    /// directly onto one.
    pub fn source(self) -> Option<(IndicatorType, IndicatorField)> {
        let stochf = IndicatorType::StochasticFast {
            k_period: 5,
            d_period: 3,
        };
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        let bollinger = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        let source = match self {
            Column::Adx => (IndicatorType::Adx(14), IndicatorField::Value),
            Column::Rsi => (IndicatorType::Rsi(14), IndicatorField::Value),
            Column::FastD => (stochf, IndicatorField::StochasticD),
            Column::FastK => (stochf, IndicatorField::StochasticK),
            Column::Macd => (macd, IndicatorField::MacdLine),
            Column::MacdSignal => (macd, IndicatorField::MacdSignal),
            Column::MacdHist => (macd, IndicatorField::MacdHistogram),
            Column::Mfi => (IndicatorType::Mfi(14), IndicatorField::Value),
            Column::BbLowerband => (bollinger, IndicatorField::BollingerLower),
            Column::BbMiddleband => (bollinger, IndicatorField::BollingerMiddle),
            Column::BbUpperband => (bollinger, IndicatorField::BollingerUpper),
            Column::Sar => (
                IndicatorType::ParabolicSar {
                    acceleration_x1000: 20,
                    maximum_x1000: 200,
                },
                IndicatorField::Value,
            ),
            Column::Tema => (IndicatorType::Tema(9), IndicatorField::Value),
            Column::HtSine => (IndicatorType::HtSine, IndicatorField::Sine),
            Column::HtLeadSine => (IndicatorType::HtSine, IndicatorField::LeadSine),
            Column::BbPercent | Column::BbWidth | Column::BestBid | Column::BestAsk => {
                return None;
            }
        };
        Some(source)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub pair: String,
    pub candles: Vec<Candle>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    columns: BTreeMap<Column, Vec<f64>>,
}

impl IndicatorFrame {
    /// Frame over precomputed columns, with no backing indicator series.
    pub fn from_columns(
        pair: &str,
        candles: Vec<Candle>,
        columns: impl IntoIterator<Item = (Column, Vec<f64>)>,
    ) -> Self {
        IndicatorFrame {
            pair: pair.to_string(),
            candles,
            indicators: HashMap::new(),
            columns: columns.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn column(&self, column: Column) -> Option<&[f64]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Value at a row, NaN when the column is absent or the row is out of range.
    pub fn value(&self, column: Column, row: usize) -> f64 {
        self.column(column)
            .and_then(|values| values.get(row).copied())
            .unwrap_or(f64::NAN)
    }

    /// Columns present in this frame, in output order.
    pub fn columns(&self) -> impl Iterator<Item = (Column, &[f64])> {
        self.columns.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Broadcast a depth-1 order book snapshot over every row.
    pub fn with_orderbook_top(mut self, best_bid: f64, best_ask: f64) -> Self {
        let n = self.len();
        self.columns.insert(Column::BestBid, vec![best_bid; n]);
        self.columns.insert(Column::BestAsk, vec![best_ask; n]);
        self
    }
}

/// Compute every derived column for a pair's candle table.
pub fn populate_indicators(pair: &str, candles: Vec<Candle>) -> IndicatorFrame {
    let indicators = compute_indicators(&candles, &strategy_indicators());

    let mut columns = BTreeMap::new();
    for column in [
        Column::Adx,
        Column::Rsi,
        Column::FastD,
        Column::FastK,
        Column::Macd,
        Column::MacdSignal,
        Column::MacdHist,
        Column::Mfi,
        Column::BbLowerband,
        Column::BbMiddleband,
        Column::BbUpperband,
        Column::Sar,
        Column::Tema,
        Column::HtSine,
        Column::HtLeadSine,
    ] {
        if let Some((indicator_type, field)) = column.source() {
            let values = indicators
                .get(&indicator_type)
                .map(|series| extract_column(series, field))
                .unwrap_or_else(|| vec![f64::NAN; candles.len()]);
            columns.insert(column, values);
        }
    }

    let (percent, width) = band_ratios(
        &candles,
        &columns[&Column::BbLowerband],
        &columns[&Column::BbMiddleband],
        &columns[&Column::BbUpperband],
    );
    columns.insert(Column::BbPercent, percent);
    columns.insert(Column::BbWidth, width);

    debug!(pair, rows = candles.len(), "populated indicators");

    IndicatorFrame {
        pair: pair.to_string(),
        candles,
        indicators,
        columns,
    }
}

/// Indicator stage with the live-only order book columns. The order book is
/// only queried when `run_mode` is live or dry-run.
pub fn populate_indicators_with_orderbook(
    pair: &str,
    candles: Vec<Candle>,
    run_mode: RunMode,
    orderbook: &dyn OrderBookPort,
) -> Result<IndicatorFrame, StrategyError> {
    let frame = populate_indicators(pair, candles);
    if !run_mode.is_live() {
        return Ok(frame);
    }

    let book = orderbook.orderbook(pair, 1)?;
    let missing = |side: &str| StrategyError::OrderBook {
        pair: pair.to_string(),
        reason: format!("no {side} levels"),
    };
    let best_bid = book.best_bid().ok_or_else(|| missing("bid"))?;
    let best_ask = book.best_ask().ok_or_else(|| missing("ask"))?;

    Ok(frame.with_orderbook_top(best_bid, best_ask))
}

/// %B = (close - lower) / (upper - lower); width = (upper - lower) / mid.
fn band_ratios(
    candles: &[Candle],
    lower: &[f64],
    middle: &[f64],
    upper: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let finite_or_nan = |v: f64| if v.is_finite() { v } else { f64::NAN };

    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let span = upper[i] - lower[i];
            (
                finite_or_nan((candle.close - lower[i]) / span),
                finite_or_nan(span / middle[i]),
            )
        })
        .unzip()
}

fn extract_column(series: &IndicatorSeries, field: IndicatorField) -> Vec<f64> {
    series
        .values
        .iter()
        .map(|point| {
            if point.valid {
                extract_field(&point.value, field)
            } else {
                f64::NAN
            }
        })
        .collect()
}

fn extract_field(value: &IndicatorValue, field: IndicatorField) -> f64 {
    match (value, field) {
        (IndicatorValue::Simple(v), IndicatorField::Value) => *v,
        (IndicatorValue::Macd { line, .. }, IndicatorField::MacdLine) => *line,
        (IndicatorValue::Macd { signal, .. }, IndicatorField::MacdSignal) => *signal,
        (IndicatorValue::Macd { histogram, .. }, IndicatorField::MacdHistogram) => *histogram,
        (IndicatorValue::Stochastic { k, .. }, IndicatorField::StochasticK) => *k,
        (IndicatorValue::Stochastic { d, .. }, IndicatorField::StochasticD) => *d,
        (IndicatorValue::Bollinger { upper, .. }, IndicatorField::BollingerUpper) => *upper,
        (IndicatorValue::Bollinger { middle, .. }, IndicatorField::BollingerMiddle) => *middle,
        (IndicatorValue::Bollinger { lower, .. }, IndicatorField::BollingerLower) => *lower,
        (IndicatorValue::Sine { sine, .. }, IndicatorField::Sine) => *sine,
        (IndicatorValue::Sine { lead_sine, .. }, IndicatorField::LeadSine) => *lead_sine,
        _ => f64::NAN,
    }
}
