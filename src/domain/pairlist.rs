//! Trading pair lists.
//!
//! Parses pair lists from configuration and checks that each pair has data
//! for the configured timeframe.

use crate::domain::error::StrategyError;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

/// A `BASE/QUOTE` market symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    pub fn parse(input: &str) -> Result<Self, PairlistError> {
        let trimmed = input.trim();
        match trimmed.split_once('/') {
            Some((base, quote))
                if !base.trim().is_empty() && !quote.trim().is_empty() && !quote.contains('/') =>
            {
                Ok(Pair {
                    base: base.trim().to_uppercase(),
                    quote: quote.trim().to_uppercase(),
                })
            }
            _ => Err(PairlistError::Malformed(trimmed.to_string())),
        }
    }

    /// File name stem used by on-disk data: `BASE_QUOTE`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PairlistError {
    #[error("empty token in pair list")]
    EmptyToken,

    #[error("malformed pair '{0}', expected BASE/QUOTE")]
    Malformed(String),

    #[error("duplicate pair: {0}")]
    DuplicatePair(String),
}

pub fn parse_pairs(input: &str) -> Result<Vec<Pair>, PairlistError> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        if token.trim().is_empty() {
            return Err(PairlistError::EmptyToken);
        }
        let pair = Pair::parse(token)?;
        if !seen.insert(pair.clone()) {
            return Err(PairlistError::DuplicatePair(pair.to_string()));
        }
        pairs.push(pair);
    }

    Ok(pairs)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairlistValidation {
    /// Pairs with data, including short ones.
    pub pairs: Vec<Pair>,
    /// Pairs dropped for lack of data.
    pub skipped: Vec<Pair>,
    /// Pairs kept despite having fewer candles than the startup window.
    pub short: Vec<(Pair, usize)>,
}

/// Drop pairs without data and flag pairs shorter than the startup window.
/// Short pairs are kept; their signals stay suppressed. Data port errors
/// (unreadable or corrupt tables) are returned, not skipped.
pub fn validate_pairlist(
    data_port: &dyn DataPort,
    pairs: Vec<Pair>,
    timeframe: Timeframe,
    startup_candle_count: usize,
) -> Result<PairlistValidation, StrategyError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    let mut short = Vec::new();

    for pair in pairs {
        let bars = match data_port.get_data_range(&pair.to_string(), timeframe)? {
            Some((_, _, bars)) if bars > 0 => bars,
            _ => {
                warn!(%pair, %timeframe, "skipping pair: no data found");
                skipped.push(pair);
                continue;
            }
        };

        if bars < startup_candle_count {
            let err = StrategyError::InsufficientData {
                pair: pair.to_string(),
                bars,
                minimum: startup_candle_count,
            };
            warn!("{}; signals will be suppressed", err);
            short.push((pair.clone(), bars));
        }

        info!(%pair, bars, "pair ok");
        valid.push(pair);
    }

    if valid.is_empty() {
        return Err(StrategyError::NoData {
            pair: "all pairs".to_string(),
        });
    }

    if !skipped.is_empty() {
        info!(
            "using {} of {} pairs",
            valid.len(),
            valid.len() + skipped.len()
        );
    }

    Ok(PairlistValidation {
        pairs: valid,
        skipped,
        short,
    })
}
