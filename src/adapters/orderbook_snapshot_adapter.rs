//! Order book snapshots from CSV files.
//!
//! Reads `<base>/<BASE>_<QUOTE>-orderbook.csv` with header `side,price,amount`,
//! where `side` is `bid` or `ask`. Bids are ordered best (highest) first,
//! asks best (lowest) first.

use crate::domain::error::StrategyError;
use crate::domain::orderbook::OrderBook;
use crate::domain::pairlist::Pair;
use crate::ports::orderbook_port::OrderBookPort;
use std::fs;
use std::path::PathBuf;

pub struct OrderBookSnapshotAdapter {
    base_path: PathBuf,
}

impl OrderBookSnapshotAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

impl OrderBookPort for OrderBookSnapshotAdapter {
    fn orderbook(&self, pair: &str, depth: usize) -> Result<OrderBook, StrategyError> {
        let err = |reason: String| StrategyError::OrderBook {
            pair: pair.to_string(),
            reason,
        };

        let stem = Pair::parse(pair).map_err(|e| err(e.to_string()))?.file_stem();
        let path = self.base_path.join(format!("{}-orderbook.csv", stem));
        let content = fs::read_to_string(&path)
            .map_err(|e| err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut book = OrderBook::default();

        for result in rdr.records() {
            let record = result.map_err(|e| err(format!("CSV parse error: {}", e)))?;
            let field = |i: usize, name: &str| -> Result<f64, StrategyError> {
                record
                    .get(i)
                    .ok_or_else(|| err(format!("missing {} column", name)))?
                    .trim()
                    .parse()
                    .map_err(|e| err(format!("invalid {} value: {}", name, e)))
            };
            let level = (field(1, "price")?, field(2, "amount")?);

            match record.get(0).map(|s| s.trim().to_ascii_lowercase()).as_deref() {
                Some("bid") => book.bids.push(level),
                Some("ask") => book.asks.push(level),
                other => return Err(err(format!("unknown side {:?}", other))),
            }
        }

        book.bids.sort_by(|a, b| b.0.total_cmp(&a.0));
        book.asks.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(book.truncated(depth))
    }
}
