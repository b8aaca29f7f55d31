//! Shared helper functions for indicator calculations.
//!
//! Raw helpers work on `f64` slices and use NaN for rows without enough
//! history, so smoothed-of-smoothed series (TEMA, MACD signal) can chain
//! without tracking warmup by hand.

use crate::domain::indicator::{
    calculate_adx, calculate_bollinger, calculate_ht_sine, calculate_macd,
    calculate_mfi, calculate_rsi, calculate_sar, calculate_stochastic_fast, calculate_tema,
    IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::Candle;
use std::collections::HashMap;

/// Simple moving average. A window containing NaN yields NaN.
pub fn sma_raw(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().all(|v| v.is_finite()) {
            out[i] = window.iter().sum::<f64>() / period as f64;
        }
    }
    out
}

/// Exponential moving average, k = 2/(n+1), seeded with the SMA of the first
/// `period` finite values. Leading NaN values are skipped.
pub fn ema_raw(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    let start = match values.iter().position(|v| v.is_finite()) {
        Some(s) => s,
        None => return out,
    };
    if values.len() - start < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed_end = start + period - 1;
    let mut ema = values[start..=seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end] = ema;

    for i in (seed_end + 1)..values.len() {
        ema = values[i] * k + ema * (1.0 - k);
        out[i] = ema;
    }
    out
}

/// Indicators the strategy populates, in column order.
pub fn strategy_indicators() -> Vec<IndicatorType> {
    vec![
        IndicatorType::Adx(14),
        IndicatorType::Rsi(14),
        IndicatorType::StochasticFast {
            k_period: 5,
            d_period: 3,
        },
        IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        },
        IndicatorType::Mfi(14),
        IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        },
        IndicatorType::ParabolicSar {
            acceleration_x1000: 20,
            maximum_x1000: 200,
        },
        IndicatorType::Tema(9),
        IndicatorType::HtSine,
    ]
}

pub fn compute_indicator(candles: &[Candle], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Tema(period) => calculate_tema(candles, period),
        IndicatorType::Rsi(period) => calculate_rsi(candles, period),
        IndicatorType::Adx(period) => calculate_adx(candles, period),
        IndicatorType::Mfi(period) => calculate_mfi(candles, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(candles, fast, slow, signal),
        IndicatorType::StochasticFast { k_period, d_period } => {
            calculate_stochastic_fast(candles, k_period, d_period)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => calculate_bollinger(candles, period, stddev_mult_x100),
        IndicatorType::ParabolicSar {
            acceleration_x1000,
            maximum_x1000,
        } => calculate_sar(candles, acceleration_x1000, maximum_x1000),
        IndicatorType::HtSine => calculate_ht_sine(candles),
    }
}

pub fn compute_indicators(
    candles: &[Candle],
    indicator_types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    indicator_types
        .iter()
        .map(|&t| (t, compute_indicator(candles, t)))
        .collect()
}
