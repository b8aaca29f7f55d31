//! Order book snapshot used for the live-only best bid/ask columns.

/// Price levels as (price, amount), best level first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|&(price, _)| price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|&(price, _)| price)
    }

    /// Keep only the top `depth` levels per side.
    pub fn truncated(mut self, depth: usize) -> Self {
        self.bids.truncate(depth);
        self.asks.truncate(depth);
        self
    }
}
