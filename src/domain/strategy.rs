//! Strategy parameters and static settings.
//!
//! Settings are pass-through values for a host runtime (ROI ladder, stoploss,
//! order policy); only `startup_candle_count` affects signal generation.

use crate::domain::error::StrategyError;
use crate::domain::roi::MinimalRoi;
use crate::domain::timeframe::Timeframe;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Which optimization space a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSpace {
    Buy,
    Sell,
}

/// Bounded integer exposed to an external optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntParameter {
    pub name: &'static str,
    pub low: i64,
    pub high: i64,
    pub default: i64,
    pub space: ParameterSpace,
}

impl IntParameter {
    pub fn range(&self) -> RangeInclusive<i64> {
        self.low..=self.high
    }

    pub fn contains(&self, value: i64) -> bool {
        self.range().contains(&value)
    }

    pub fn check(&self, value: i64) -> Result<i64, StrategyError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(StrategyError::invalid(
                "parameters",
                self.name,
                format!("{} outside [{}, {}]", value, self.low, self.high),
            ))
        }
    }
}

pub const BUY_RSI: IntParameter = IntParameter {
    name: "buy_rsi",
    low: 10,
    high: 40,
    default: 30,
    space: ParameterSpace::Buy,
};

pub const SELL_RSI: IntParameter = IntParameter {
    name: "sell_rsi",
    low: 60,
    high: 90,
    default: 70,
    space: ParameterSpace::Sell,
};

/// RSI crossing thresholds, read-only during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyParams {
    pub buy_rsi: i64,
    pub sell_rsi: i64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            buy_rsi: BUY_RSI.default,
            sell_rsi: SELL_RSI.default,
        }
    }
}

impl StrategyParams {
    pub fn new(buy_rsi: i64, sell_rsi: i64) -> Result<Self, StrategyError> {
        Ok(StrategyParams {
            buy_rsi: BUY_RSI.check(buy_rsi)?,
            sell_rsi: SELL_RSI.check(sell_rsi)?,
        })
    }

    pub fn parameters() -> [IntParameter; 2] {
        [BUY_RSI, SELL_RSI]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        })
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "limit" => Ok(OrderType::Limit),
            "market" => Ok(OrderType::Market),
            other => Err(format!("unknown order type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
    Fok,
    Ioc,
    Po,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Fok => "FOK",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Po => "PO",
        })
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "FOK" => Ok(TimeInForce::Fok),
            "IOC" => Ok(TimeInForce::Ioc),
            "PO" => Ok(TimeInForce::Po),
            other => Err(format!("unknown time in force '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTypes {
    pub entry: OrderType,
    pub exit: OrderType,
    pub stoploss: OrderType,
    pub stoploss_on_exchange: bool,
}

impl Default for OrderTypes {
    fn default() -> Self {
        OrderTypes {
            entry: OrderType::Limit,
            exit: OrderType::Limit,
            stoploss: OrderType::Market,
            stoploss_on_exchange: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTimeInForce {
    pub entry: TimeInForce,
    pub exit: TimeInForce,
}

impl Default for OrderTimeInForce {
    fn default() -> Self {
        OrderTimeInForce {
            entry: TimeInForce::Gtc,
            exit: TimeInForce::Gtc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Backtest,
    Hyperopt,
    DryRun,
    Live,
}

impl RunMode {
    /// Modes trading against a real order book.
    pub fn is_live(self) -> bool {
        matches!(self, RunMode::DryRun | RunMode::Live)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunMode::Backtest => "backtest",
            RunMode::Hyperopt => "hyperopt",
            RunMode::DryRun => "dry_run",
            RunMode::Live => "live",
        })
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backtest" => Ok(RunMode::Backtest),
            "hyperopt" => Ok(RunMode::Hyperopt),
            "dry_run" | "dry-run" | "dryrun" => Ok(RunMode::DryRun),
            "live" => Ok(RunMode::Live),
            other => Err(format!("unknown run mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySettings {
    pub timeframe: Timeframe,
    pub startup_candle_count: usize,
    pub minimal_roi: MinimalRoi,
    pub stoploss: f64,
    pub trailing_stop: bool,
    pub can_short: bool,
    pub use_exit_signal: bool,
    pub exit_profit_only: bool,
    pub ignore_roi_if_entry_signal: bool,
    pub process_only_new_candles: bool,
    pub order_types: OrderTypes,
    pub order_time_in_force: OrderTimeInForce,
}

pub const STARTUP_CANDLE_COUNT: usize = 30;

impl Default for StrategySettings {
    fn default() -> Self {
        StrategySettings {
            timeframe: Timeframe::M5,
            startup_candle_count: STARTUP_CANDLE_COUNT,
            minimal_roi: MinimalRoi::default(),
            stoploss: -0.10,
            trailing_stop: false,
            can_short: false,
            use_exit_signal: true,
            exit_profit_only: false,
            ignore_roi_if_entry_signal: false,
            process_only_new_candles: true,
            order_types: OrderTypes::default(),
            order_time_in_force: OrderTimeInForce::default(),
        }
    }
}
