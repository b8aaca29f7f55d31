//! Triple Exponential Moving Average.
//!
//! TEMA = 3*EMA1 - 3*EMA2 + EMA3, where EMA2 = EMA(EMA1) and EMA3 = EMA(EMA2).
//! Warmup: 3*(n-1) candles are invalid (24 for n=9).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::ema_raw;
use crate::domain::ohlcv::{closes, Candle};

pub fn calculate_tema(candles: &[Candle], period: usize) -> IndicatorSeries {
    let ema1 = ema_raw(&closes(candles), period);
    let ema2 = ema_raw(&ema1, period);
    let ema3 = ema_raw(&ema2, period);

    let raw: Vec<f64> = ema1
        .iter()
        .zip(&ema2)
        .zip(&ema3)
        .map(|((e1, e2), e3)| 3.0 * e1 - 3.0 * e2 + e3)
        .collect();

    IndicatorSeries::from_raw(IndicatorType::Tema(period), candles, &raw)
}
