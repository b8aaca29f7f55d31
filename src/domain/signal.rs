//! Entry and exit rule stages.
//!
//! Both stages are pure functions of an indicator frame and the strategy
//! parameters. Rows inside the startup window never signal.

use crate::domain::frame::{populate_indicators, Column, IndicatorFrame};
use crate::domain::ohlcv::Candle;
use crate::domain::rule::{Operand, Rule};
use crate::domain::rule_eval::evaluate;
use crate::domain::strategy::{StrategyParams, StrategySettings};
use tracing::debug;

/// RSI crosses above `buy_rsi` while TEMA is rising at or below the mid band.
pub fn entry_rule(params: &StrategyParams) -> Rule {
    Rule::And(vec![
        Rule::CrossAbove {
            left: Operand::Column(Column::Rsi),
            right: Operand::Constant(params.buy_rsi as f64),
        },
        Rule::AtMost {
            left: Operand::Column(Column::Tema),
            right: Operand::Column(Column::BbMiddleband),
        },
        Rule::Above {
            left: Operand::Column(Column::Tema),
            right: Operand::Column(Column::Tema).previous(),
        },
        has_volume(),
    ])
}

/// RSI crosses above `sell_rsi` while TEMA is falling above the mid band.
pub fn exit_rule(params: &StrategyParams) -> Rule {
    Rule::And(vec![
        Rule::CrossAbove {
            left: Operand::Column(Column::Rsi),
            right: Operand::Constant(params.sell_rsi as f64),
        },
        Rule::Above {
            left: Operand::Column(Column::Tema),
            right: Operand::Column(Column::BbMiddleband),
        },
        Rule::Below {
            left: Operand::Column(Column::Tema),
            right: Operand::Column(Column::Tema).previous(),
        },
        has_volume(),
    ])
}

fn has_volume() -> Rule {
    Rule::Above {
        left: Operand::Volume,
        right: Operand::Constant(0.0),
    }
}

pub fn populate_entry_trend(
    frame: &IndicatorFrame,
    params: &StrategyParams,
    startup_candle_count: usize,
) -> Vec<bool> {
    mask_startup(evaluate(&entry_rule(params), frame), startup_candle_count)
}

pub fn populate_exit_trend(
    frame: &IndicatorFrame,
    params: &StrategyParams,
    startup_candle_count: usize,
) -> Vec<bool> {
    mask_startup(evaluate(&exit_rule(params), frame), startup_candle_count)
}

fn mask_startup(mut flags: Vec<bool>, startup_candle_count: usize) -> Vec<bool> {
    let end = startup_candle_count.min(flags.len());
    flags[..end].fill(false);
    flags
}

/// Indicator frame with its entry/exit flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame {
    pub frame: IndicatorFrame,
    pub enter_long: Vec<bool>,
    pub exit_long: Vec<bool>,
}

impl SignalFrame {
    pub fn entry_count(&self) -> usize {
        self.enter_long.iter().filter(|&&f| f).count()
    }

    pub fn exit_count(&self) -> usize {
        self.exit_long.iter().filter(|&&f| f).count()
    }
}

/// Run both rule stages over an already populated frame.
pub fn populate_signals(
    frame: IndicatorFrame,
    params: &StrategyParams,
    settings: &StrategySettings,
) -> SignalFrame {
    let enter_long = populate_entry_trend(&frame, params, settings.startup_candle_count);
    let exit_long = populate_exit_trend(&frame, params, settings.startup_candle_count);

    let signals = SignalFrame {
        frame,
        enter_long,
        exit_long,
    };
    debug!(
        pair = %signals.frame.pair,
        entries = signals.entry_count(),
        exits = signals.exit_count(),
        "evaluated signals"
    );
    signals
}

/// Full pipeline: indicator stage, then entry and exit stages.
pub fn analyze(
    pair: &str,
    candles: Vec<Candle>,
    params: &StrategyParams,
    settings: &StrategySettings,
) -> SignalFrame {
    populate_signals(populate_indicators(pair, candles), params, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_candles(volumes: &[f64]) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| Candle {
                pair: "BTC/USDT".into(),
                timestamp: start + chrono::Duration::minutes(5 * i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume,
            })
            .collect()
    }

    /// Frame where row 2 satisfies every entry clause.
    fn entry_frame(volumes: &[f64]) -> IndicatorFrame {
        IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(volumes),
            vec![
                (Column::Rsi, vec![28.0, 29.0, 31.0, 33.0]),
                (Column::Tema, vec![95.0, 96.0, 97.0, 98.0]),
                (Column::BbMiddleband, vec![100.0; 4]),
            ],
        )
    }

    /// Frame where row 2 satisfies every exit clause.
    fn exit_frame() -> IndicatorFrame {
        IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(&[10.0; 4]),
            vec![
                (Column::Rsi, vec![68.0, 69.0, 71.0, 73.0]),
                (Column::Tema, vec![105.0, 104.0, 103.0, 102.0]),
                (Column::BbMiddleband, vec![100.0; 4]),
            ],
        )
    }

    #[test]
    fn entry_fires_on_rsi_cross_only() {
        let flags = populate_entry_trend(&entry_frame(&[10.0; 4]), &StrategyParams::default(), 0);
        assert_eq!(flags, vec![false, false, true, false]);
    }

    #[test]
    fn entry_blocked_by_zero_volume() {
        let flags = populate_entry_trend(
            &entry_frame(&[10.0, 10.0, 0.0, 10.0]),
            &StrategyParams::default(),
            0,
        );
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn entry_blocked_inside_startup_window() {
        let flags = populate_entry_trend(&entry_frame(&[10.0; 4]), &StrategyParams::default(), 3);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn entry_requires_tema_at_or_below_mid() {
        let frame = IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(&[10.0; 4]),
            vec![
                (Column::Rsi, vec![28.0, 29.0, 31.0, 33.0]),
                (Column::Tema, vec![95.0, 99.0, 100.5, 101.0]),
                (Column::BbMiddleband, vec![100.0; 4]),
            ],
        );
        let flags = populate_entry_trend(&frame, &StrategyParams::default(), 0);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn entry_flat_tema_at_mid_band_never_fires() {
        let frame = IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(&[10.0; 4]),
            vec![
                (Column::Rsi, vec![28.0, 29.0, 31.0, 33.0]),
                (Column::Tema, vec![100.0; 4]),
                (Column::BbMiddleband, vec![100.0; 4]),
            ],
        );
        let flags = populate_entry_trend(&frame, &StrategyParams::default(), 0);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn entry_threshold_follows_params() {
        let params = StrategyParams::new(35, 70).unwrap();
        let flags = populate_entry_trend(&entry_frame(&[10.0; 4]), &params, 0);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn exit_fires_on_rsi_cross_only() {
        let flags = populate_exit_trend(&exit_frame(), &StrategyParams::default(), 0);
        assert_eq!(flags, vec![false, false, true, false]);
    }

    #[test]
    fn exit_needs_falling_tema() {
        let frame = IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(&[10.0; 4]),
            vec![
                (Column::Rsi, vec![68.0, 69.0, 71.0, 73.0]),
                (Column::Tema, vec![102.0, 103.0, 104.0, 105.0]),
                (Column::BbMiddleband, vec![100.0; 4]),
            ],
        );
        let flags = populate_exit_trend(&frame, &StrategyParams::default(), 0);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn nan_inputs_never_signal() {
        let frame = IndicatorFrame::from_columns(
            "BTC/USDT",
            make_candles(&[10.0; 4]),
            vec![
                (Column::Rsi, vec![28.0, 29.0, 31.0, 33.0]),
                (Column::Tema, vec![95.0, 96.0, 97.0, 98.0]),
                (Column::BbMiddleband, vec![f64::NAN; 4]),
            ],
        );
        let flags = populate_entry_trend(&frame, &StrategyParams::default(), 0);
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn startup_mask_longer_than_frame() {
        assert_eq!(mask_startup(vec![true, true], 30), vec![false, false]);
    }

    #[test]
    fn populate_signals_counts() {
        let settings = StrategySettings {
            startup_candle_count: 0,
            ..StrategySettings::default()
        };
        let signals = populate_signals(
            entry_frame(&[10.0; 4]),
            &StrategyParams::default(),
            &settings,
        );
        assert_eq!(signals.entry_count(), 1);
        assert_eq!(signals.exit_count(), 0);
        assert_eq!(signals.enter_long.len(), 4);
        assert_eq!(signals.exit_long.len(), 4);
    }

    #[test]
    fn analyze_short_table_has_no_signals() {
        let signals = analyze(
            "BTC/USDT",
            make_candles(&[10.0; 20]),
            &StrategyParams::default(),
            &StrategySettings::default(),
        );
        assert_eq!(signals.enter_long, vec![false; 20]);
        assert_eq!(signals.exit_long, vec![false; 20]);
    }

    #[test]
    fn rule_display() {
        let rule = entry_rule(&StrategyParams::default());
        assert_eq!(
            rule.to_string(),
            "CROSS_ABOVE(rsi, 30) AND tema <= bb_middleband AND tema > tema[-1] AND volume > 0"
        );
    }
}
