//! Fast Stochastic oscillator.
//!
//! %K = 100 * (C - LL(k)) / (HH(k) - LL(k)); a zero range yields 0.
//! %D = SMA(d) of %K.
//! Defaults: k=5, d=3. A point is valid once %D is (k + d - 2 = 6 candles).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::sma_raw;
use crate::domain::ohlcv::Candle;

pub fn calculate_stochastic_fast(
    candles: &[Candle],
    k_period: usize,
    d_period: usize,
) -> IndicatorSeries {
    let n = candles.len();
    let mut k = vec![f64::NAN; n];

    if k_period > 0 {
        for i in (k_period - 1)..n {
            let window = &candles[i + 1 - k_period..=i];
            let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
            let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            k[i] = if range > 0.0 {
                100.0 * (candles[i].close - lowest) / range
            } else {
                0.0
            };
        }
    }

    let d = sma_raw(&k, d_period);

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let valid = k[i].is_finite() && d[i].is_finite();
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid,
                value: IndicatorValue::Stochastic {
                    k: if valid { k[i] } else { 0.0 },
                    d: if valid { d[i] } else { 0.0 },
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::StochasticFast { k_period, d_period },
        values,
    }
}
