//! Candle data access port.

use crate::domain::error::StrategyError;
use crate::domain::ohlcv::Candle;
use crate::domain::timeframe::Timeframe;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Candles for one pair, oldest first.
    fn fetch_candles(&self, pair: &str, timeframe: Timeframe)
    -> Result<Vec<Candle>, StrategyError>;

    fn list_pairs(&self, timeframe: Timeframe) -> Result<Vec<String>, StrategyError>;

    /// First timestamp, last timestamp and candle count, if any data exists.
    fn get_data_range(
        &self,
        pair: &str,
        timeframe: Timeframe,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, StrategyError>;
}
