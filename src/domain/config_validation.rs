//! Configuration loading and validation.
//!
//! Builds strategy settings, parameters and data settings from a
//! `ConfigPort`. Missing keys take their defaults; present keys must parse
//! and fall inside their allowed ranges.

use crate::domain::error::StrategyError;
use crate::domain::pairlist::{parse_pairs, Pair};
use crate::domain::roi::MinimalRoi;
use crate::domain::strategy::{
    OrderTimeInForce, OrderTypes, RunMode, StrategyParams, StrategySettings, BUY_RSI, SELL_RSI,
};
use crate::ports::config_port::ConfigPort;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = "./data";

/// Where candles come from and how the pipeline is run.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub directory: PathBuf,
    /// Empty means every pair found in `directory`.
    pub pairs: Vec<Pair>,
    pub run_mode: RunMode,
}

fn parse_key<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, StrategyError>
where
    T: FromStr,
    T::Err: Display,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| StrategyError::invalid(section, key, format!("'{}': {}", raw.trim(), e))),
    }
}

/// Booleans accept `true`/`yes`/`1` and `false`/`no`/`0`, case-insensitively.
fn parse_bool_key(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, StrategyError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(StrategyError::invalid(
                section,
                key,
                format!("'{}' is not a boolean", other),
            )),
        },
    }
}

pub fn load_settings(config: &dyn ConfigPort) -> Result<StrategySettings, StrategyError> {
    let defaults = StrategySettings::default();

    let timeframe = parse_key(config, "strategy", "timeframe", defaults.timeframe)?;

    let startup_candle_count = parse_key(
        config,
        "strategy",
        "startup_candle_count",
        defaults.startup_candle_count,
    )?;
    if startup_candle_count == 0 {
        return Err(StrategyError::invalid(
            "strategy",
            "startup_candle_count",
            "startup_candle_count must be positive",
        ));
    }

    let stoploss: f64 = parse_key(config, "strategy", "stoploss", defaults.stoploss)?;
    if !(stoploss > -1.0 && stoploss < 0.0) {
        return Err(StrategyError::invalid(
            "strategy",
            "stoploss",
            "stoploss must be between -1 and 0 (exclusive)",
        ));
    }

    let can_short = parse_bool_key(config, "strategy", "can_short", defaults.can_short)?;
    if can_short {
        return Err(StrategyError::invalid(
            "strategy",
            "can_short",
            "strategy is long-only",
        ));
    }

    Ok(StrategySettings {
        timeframe,
        startup_candle_count,
        minimal_roi: load_minimal_roi(config)?,
        stoploss,
        trailing_stop: parse_bool_key(config, "strategy", "trailing_stop", defaults.trailing_stop)?,
        can_short,
        use_exit_signal: parse_bool_key(
            config,
            "strategy",
            "use_exit_signal",
            defaults.use_exit_signal,
        )?,
        exit_profit_only: parse_bool_key(
            config,
            "strategy",
            "exit_profit_only",
            defaults.exit_profit_only,
        )?,
        ignore_roi_if_entry_signal: parse_bool_key(
            config,
            "strategy",
            "ignore_roi_if_entry_signal",
            defaults.ignore_roi_if_entry_signal,
        )?,
        process_only_new_candles: parse_bool_key(
            config,
            "strategy",
            "process_only_new_candles",
            defaults.process_only_new_candles,
        )?,
        order_types: load_order_types(config)?,
        order_time_in_force: load_time_in_force(config)?,
    })
}

fn load_minimal_roi(config: &dyn ConfigPort) -> Result<MinimalRoi, StrategyError> {
    let keys = config.get_keys("minimal_roi");
    if keys.is_empty() {
        return Ok(MinimalRoi::default());
    }

    let mut steps = Vec::with_capacity(keys.len());
    for key in keys {
        let minutes: u32 = key.trim().parse().map_err(|_| {
            StrategyError::invalid("minimal_roi", &key, "key must be whole minutes since entry")
        })?;
        let roi: f64 = parse_key(config, "minimal_roi", &key, f64::NAN)?;
        steps.push((minutes, roi));
    }

    MinimalRoi::new(steps).map_err(|reason| StrategyError::invalid("minimal_roi", "*", reason))
}

fn load_order_types(config: &dyn ConfigPort) -> Result<OrderTypes, StrategyError> {
    let defaults = OrderTypes::default();
    Ok(OrderTypes {
        entry: parse_key(config, "order_types", "entry", defaults.entry)?,
        exit: parse_key(config, "order_types", "exit", defaults.exit)?,
        stoploss: parse_key(config, "order_types", "stoploss", defaults.stoploss)?,
        stoploss_on_exchange: parse_bool_key(
            config,
            "order_types",
            "stoploss_on_exchange",
            defaults.stoploss_on_exchange,
        )?,
    })
}

fn load_time_in_force(config: &dyn ConfigPort) -> Result<OrderTimeInForce, StrategyError> {
    let defaults = OrderTimeInForce::default();
    Ok(OrderTimeInForce {
        entry: parse_key(config, "order_time_in_force", "entry", defaults.entry)?,
        exit: parse_key(config, "order_time_in_force", "exit", defaults.exit)?,
    })
}

pub fn load_params(config: &dyn ConfigPort) -> Result<StrategyParams, StrategyError> {
    let buy_rsi = parse_key(config, "parameters", BUY_RSI.name, BUY_RSI.default)?;
    let sell_rsi = parse_key(config, "parameters", SELL_RSI.name, SELL_RSI.default)?;
    StrategyParams::new(buy_rsi, sell_rsi)
}

pub fn load_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, StrategyError> {
    let directory = config
        .get_string("data", "directory")
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

    let pairs = match config.get_string("data", "pairs") {
        Some(list) if !list.trim().is_empty() => {
            parse_pairs(&list).map_err(|e| StrategyError::invalid("data", "pairs", e.to_string()))?
        }
        _ => Vec::new(),
    };

    Ok(DataSettings {
        directory: PathBuf::from(directory.trim()),
        pairs,
        run_mode: parse_key(config, "data", "runmode", RunMode::default())?,
    })
}
