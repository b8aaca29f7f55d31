//! Candle row representation.

use chrono::NaiveDateTime;

/// One closed candle for a trading pair. Volume is fractional for crypto pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub pair: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Column extractors used by the indicator implementations.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn typical_prices(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(Candle::typical_price).collect()
}
