//! Indicators used by the RSI momentum strategy.
//!
//! - `IndicatorPoint`: one value aligned with a candle, with a validity flag
//! - `IndicatorValue`: single- or multi-output value shapes
//! - `IndicatorType`: indicator identity plus parameters, usable as a map key
//! - `IndicatorSeries`: a series aligned 1:1 with the input candles
//!
//! Every calculation reads only rows `<= i` when producing point `i`.

pub mod adx;
pub mod bollinger;
pub mod hilbert;
pub mod macd;
pub mod mfi;
pub mod rsi;
pub mod sar;
pub mod stochastic;
pub mod tema;

pub use adx::calculate_adx;
pub use bollinger::calculate_bollinger;
pub use hilbert::calculate_ht_sine;
pub use macd::calculate_macd;
pub use mfi::calculate_mfi;
pub use rsi::calculate_rsi;
pub use sar::calculate_sar;
pub use stochastic::calculate_stochastic_fast;
pub use tema::calculate_tema;

use crate::domain::ohlcv::Candle;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
    Sine {
        sine: f64,
        lead_sine: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Tema(usize),
    Rsi(usize),
    Adx(usize),
    Mfi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    StochasticFast {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    ParabolicSar {
        acceleration_x1000: u32,
        maximum_x1000: u32,
    },
    HtSine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Build a single-valued series from raw values; non-finite entries are invalid.
    pub fn from_raw(indicator_type: IndicatorType, candles: &[Candle], raw: &[f64]) -> Self {
        let values = candles
            .iter()
            .zip(raw)
            .map(|(candle, &v)| IndicatorPoint {
                timestamp: candle.timestamp,
                valid: v.is_finite(),
                value: IndicatorValue::Simple(if v.is_finite() { v } else { 0.0 }),
            })
            .collect();

        IndicatorSeries {
            indicator_type,
            values,
        }
    }

    /// Raw `Simple` values with NaN in place of invalid points.
    pub fn simple_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|p| match (p.valid, &p.value) {
                (true, IndicatorValue::Simple(v)) => *v,
                _ => f64::NAN,
            })
            .collect()
    }

    /// Index of the first valid point, if any.
    pub fn first_valid(&self) -> Option<usize> {
        self.values.iter().position(|p| p.valid)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Tema(period) => write!(f, "TEMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Mfi(period) => write!(f, "MFI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::StochasticFast { k_period, d_period } => {
                write!(f, "STOCHF({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::ParabolicSar {
                acceleration_x1000,
                maximum_x1000,
            } => {
                let acc = *acceleration_x1000 as f64 / 1000.0;
                let max = *maximum_x1000 as f64 / 1000.0;
                write!(f, "SAR({},{})", acc, max)
            }
            IndicatorType::HtSine => write!(f, "HT_SINE"),
        }
    }
}
