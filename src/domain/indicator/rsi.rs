//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, or 0 when there was no movement at all
//!
//! Warmup: first n candles are invalid (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{closes, Candle};

pub fn calculate_rsi(candles: &[Candle], period: usize) -> IndicatorSeries {
    let raw = rsi_raw(&closes(candles), period);
    IndicatorSeries::from_raw(IndicatorType::Rsi(period), candles, &raw)
}

fn rsi_raw(prices: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; prices.len()];
    if period == 0 || prices.len() <= period {
        return out;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..prices.len() {
        let change_idx = i - 1;
        avg_gain = (avg_gain * (period - 1) as f64 + gains[change_idx]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[change_idx]) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 0.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_candles(prices: &[f64]) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                pair: "TEST/USDT".into(),
                timestamp: start + chrono::Duration::minutes(5 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn rsi_empty_candles() {
        let series = calculate_rsi(&[], 14);
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].valid, "Candle {} should be invalid", i);
        }
        assert!(series.values[14].valid, "Candle 14 should be valid");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        assert_eq!(series.values[14].value, IndicatorValue::Simple(100.0));
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        if let IndicatorValue::Simple(rsi) = series.values[14].value {
            assert!(rsi.abs() < f64::EPSILON, "RSI should be 0 when all losses");
        } else {
            panic!("Expected Simple value");
        }
    }

    #[test]
    fn rsi_flat_prices_is_zero() {
        let series = calculate_rsi(&make_candles(&[42.0; 20]), 14);
        assert_eq!(series.values[19].value, IndicatorValue::Simple(0.0));
    }

    #[test]
    fn rsi_jumps_from_zero_when_flat_table_starts_rising() {
        let mut prices = vec![100.0; 60];
        prices.extend([101.0, 102.0]);
        let raw = calculate_rsi(&make_candles(&prices), 14).simple_values();
        assert_eq!(&raw[58..62], &[0.0, 0.0, 100.0, 100.0]);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_candles(&prices), 14);

        for rsi in series.simple_values().into_iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_known_calculation() {
        let prices = [
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ];
        let series = calculate_rsi(&make_candles(&prices), 14);

        // gains 4.0, losses 1.5 over 14 changes
        let expected = 100.0 - 100.0 / (1.0 + 4.0 / 1.5);
        if let IndicatorValue::Simple(rsi) = series.values[14].value {
            assert!((rsi - expected).abs() < 1e-9);
        } else {
            panic!("Expected Simple value");
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_candles(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
