//! Core domain types and logic: indicators, rules and strategy settings.

pub mod ohlcv;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod frame;
pub mod crossing;
pub mod rule;
pub mod rule_eval;
pub mod signal;
pub mod strategy;
pub mod timeframe;
pub mod roi;
pub mod orderbook;
pub mod position_gate;
pub mod pairlist;
pub mod config_validation;
