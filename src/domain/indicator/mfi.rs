//! MFI (Money Flow Index).
//!
//! Raw money flow = typical price × volume, classed positive or negative by
//! the direction of the typical price versus the previous candle (unchanged
//! prices count as neither). MFI = 100 × positive / (positive + negative)
//! over the last n changes; 0 when there was no money flow at all.
//!
//! Warmup: first n candles are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;

pub fn calculate_mfi(candles: &[Candle], period: usize) -> IndicatorSeries {
    let n = candles.len();
    let mut raw = vec![f64::NAN; n];

    if period > 0 && n > period {
        let mut positive = vec![0.0; n];
        let mut negative = vec![0.0; n];
        for i in 1..n {
            let tp = candles[i].typical_price();
            let prev_tp = candles[i - 1].typical_price();
            let flow = tp * candles[i].volume;
            if tp > prev_tp {
                positive[i] = flow;
            } else if tp < prev_tp {
                negative[i] = flow;
            }
        }

        for i in period..n {
            let window = (i + 1 - period)..=i;
            let pos: f64 = positive[window.clone()].iter().sum();
            let neg: f64 = negative[window].iter().sum();
            let total = pos + neg;
            raw[i] = if total == 0.0 { 0.0 } else { 100.0 * pos / total };
        }
    }

    IndicatorSeries::from_raw(IndicatorType::Mfi(period), candles, &raw)
}
