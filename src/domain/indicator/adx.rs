//! ADX (Average Directional Index) with Wilder smoothing.
//!
//! +DM = up-move when up-move > down-move and > 0, else 0 (mirrored for -DM).
//! Smoothed sums start as the plain sum of the first n values, then
//! S[i] = S[i-1] - S[i-1]/n + X[i].
//! DX = 100 * |+DI - -DI| / (+DI + -DI); ADX seeds with the mean of the first
//! n DX values, then ADX[i] = (ADX[i-1]*(n-1) + DX[i]) / n.
//!
//! Warmup: first 2n-1 candles are invalid (27 for n=14).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;

pub fn calculate_adx(candles: &[Candle], period: usize) -> IndicatorSeries {
    let raw = adx_raw(candles, period);
    IndicatorSeries::from_raw(IndicatorType::Adx(period), candles, &raw)
}

fn adx_raw(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < 2 * period {
        return out;
    }

    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    let mut tr = vec![0.0; n];

    for i in 1..n {
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
        tr[i] = candles[i].true_range(candles[i - 1].close);
    }

    let p = period as f64;
    let mut s_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut s_minus: f64 = minus_dm[1..=period].iter().sum();
    let mut s_tr: f64 = tr[1..=period].iter().sum();

    let mut dx = vec![f64::NAN; n];
    dx[period] = directional_index(s_plus, s_minus, s_tr);
    for i in (period + 1)..n {
        s_plus = s_plus - s_plus / p + plus_dm[i];
        s_minus = s_minus - s_minus / p + minus_dm[i];
        s_tr = s_tr - s_tr / p + tr[i];
        dx[i] = directional_index(s_plus, s_minus, s_tr);
    }

    let seed_idx = 2 * period - 1;
    let mut adx = dx[period..=seed_idx].iter().sum::<f64>() / p;
    out[seed_idx] = adx;
    for i in (seed_idx + 1)..n {
        adx = (adx * (p - 1.0) + dx[i]) / p;
        out[i] = adx;
    }

    out
}

fn directional_index(s_plus: f64, s_minus: f64, s_tr: f64) -> f64 {
    if s_tr == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * s_plus / s_tr;
    let minus_di = 100.0 * s_minus / s_tr;
    let sum = plus_di + minus_di;
    if sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / sum
    }
}
