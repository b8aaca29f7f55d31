//! Parabolic SAR (Stop And Reverse).
//!
//! Initial direction comes from the directional movement of the first two
//! candles: a positive -DM starts short, anything else starts long.
//! The SAR reported for candle i is the stop computed from history before i;
//! on a reversal the stop jumps to the prior extreme point and the
//! acceleration factor resets. The stop never enters the range of the
//! current or previous candle.
//!
//! Warmup: candle 0 is invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;

pub fn calculate_sar(
    candles: &[Candle],
    acceleration_x1000: u32,
    maximum_x1000: u32,
) -> IndicatorSeries {
    let raw = sar_raw(
        candles,
        acceleration_x1000 as f64 / 1000.0,
        maximum_x1000 as f64 / 1000.0,
    );
    IndicatorSeries::from_raw(
        IndicatorType::ParabolicSar {
            acceleration_x1000,
            maximum_x1000,
        },
        candles,
        &raw,
    )
}

fn sar_raw(candles: &[Candle], acceleration: f64, maximum: f64) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if n < 2 {
        return out;
    }
    let acceleration = acceleration.min(maximum);

    let up_move = candles[1].high - candles[0].high;
    let down_move = candles[0].low - candles[1].low;
    let mut is_long = !(down_move > 0.0 && up_move < down_move);

    let mut af = acceleration;
    let (mut ep, mut sar) = if is_long {
        (candles[1].high, candles[0].low)
    } else {
        (candles[1].low, candles[0].high)
    };

    let mut new_high = candles[1].high;
    let mut new_low = candles[1].low;

    for (i, candle) in candles.iter().enumerate().skip(1) {
        let prev_low = new_low;
        let prev_high = new_high;
        new_low = candle.low;
        new_high = candle.high;

        if is_long {
            if new_low <= sar {
                is_long = false;
                sar = ep.max(prev_high).max(new_high);
                out[i] = sar;

                af = acceleration;
                ep = new_low;
                sar += af * (ep - sar);
                sar = sar.max(prev_high).max(new_high);
            } else {
                out[i] = sar;
                if new_high > ep {
                    ep = new_high;
                    af = (af + acceleration).min(maximum);
                }
                sar += af * (ep - sar);
                sar = sar.min(prev_low).min(new_low);
            }
        } else if new_high >= sar {
            is_long = true;
            sar = ep.min(prev_low).min(new_low);
            out[i] = sar;

            af = acceleration;
            ep = new_high;
            sar += af * (ep - sar);
            sar = sar.min(prev_low).min(new_low);
        } else {
            out[i] = sar;
            if new_low < ep {
                ep = new_low;
                af = (af + acceleration).min(maximum);
            }
            sar += af * (ep - sar);
            sar = sar.max(prev_high).max(new_high);
        }
    }

    out
}
