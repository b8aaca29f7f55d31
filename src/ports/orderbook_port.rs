//! Order book access port, used only in live and dry-run modes.

use crate::domain::error::StrategyError;
use crate::domain::orderbook::OrderBook;

pub trait OrderBookPort {
    /// Snapshot of the top `depth` levels per side.
    fn orderbook(&self, pair: &str, depth: usize) -> Result<OrderBook, StrategyError>;
}
