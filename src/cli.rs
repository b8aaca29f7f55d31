//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::{CsvAdapter, CsvSignalWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::orderbook_snapshot_adapter::OrderBookSnapshotAdapter;
use crate::domain::config_validation::{
    load_data_settings, load_params, load_settings, DataSettings,
};
use crate::domain::error::StrategyError;
use crate::domain::frame::populate_indicators_with_orderbook;
use crate::domain::pairlist::{validate_pairlist, Pair};
use crate::domain::signal::{entry_rule, exit_rule, populate_signals};
use crate::domain::strategy::{RunMode, StrategyParams, StrategySettings, BUY_RSI, SELL_RSI};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::orderbook_port::OrderBookPort;
use crate::ports::signal_port::SignalPort;

pub const DEFAULT_OUTPUT_DIR: &str = "signals";

#[derive(Parser, Debug)]
#[command(name = "rsimomentum", about = "RSI momentum entry/exit signal generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators and entry/exit signals for each pair
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        pair: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        buy_rsi: Option<i64>,
        #[arg(long)]
        sell_rsi: Option<i64>,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for pair(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        pair: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signals {
            config,
            pair,
            output,
            buy_rsi,
            sell_rsi,
        } => run_signals(&config, pair.as_deref(), output, buy_rsi, sell_rsi),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, pair } => run_info(&config, pair.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StrategyError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Parameters from the config, with command-line overrides applied.
pub fn build_params(
    config: &dyn ConfigPort,
    buy_rsi: Option<i64>,
    sell_rsi: Option<i64>,
) -> Result<StrategyParams, StrategyError> {
    let params = load_params(config)?;
    StrategyParams::new(
        buy_rsi.unwrap_or(params.buy_rsi),
        sell_rsi.unwrap_or(params.sell_rsi),
    )
}

/// `--pair` wins, then the configured list, then every pair with data.
pub fn resolve_pairs(
    pair_override: Option<&str>,
    data: &DataSettings,
    data_port: &dyn DataPort,
    settings: &StrategySettings,
) -> Result<Vec<Pair>, StrategyError> {
    if let Some(pair) = pair_override {
        return Pair::parse(pair)
            .map(|p| vec![p])
            .map_err(|e| StrategyError::invalid("data", "pairs", e.to_string()));
    }
    if !data.pairs.is_empty() {
        return Ok(data.pairs.clone());
    }

    let mut pairs = Vec::new();
    for name in data_port.list_pairs(settings.timeframe)? {
        match Pair::parse(&name) {
            Ok(pair) => pairs.push(pair),
            Err(e) => warn!("ignoring data file for {}: {}", name, e),
        }
    }
    if pairs.is_empty() {
        return Err(StrategyError::NoData {
            pair: format!("any pair at {}", settings.timeframe),
        });
    }
    Ok(pairs)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    pub pair: String,
    pub candles: usize,
    pub entries: usize,
    pub exits: usize,
    pub output: String,
}

/// Indicator, entry and exit stages for each pair, written through `signal_port`.
pub fn run_signals_pipeline(
    data_port: &dyn DataPort,
    orderbook: &dyn OrderBookPort,
    signal_port: &dyn SignalPort,
    pairs: Vec<Pair>,
    params: &StrategyParams,
    settings: &StrategySettings,
    run_mode: RunMode,
) -> Result<Vec<PairSummary>, StrategyError> {
    let validated = validate_pairlist(
        data_port,
        pairs,
        settings.timeframe,
        settings.startup_candle_count,
    )?;

    let mut summaries = Vec::with_capacity(validated.pairs.len());
    for pair in &validated.pairs {
        let name = pair.to_string();
        let candles = data_port.fetch_candles(&name, settings.timeframe)?;
        let count = candles.len();

        let frame = populate_indicators_with_orderbook(&name, candles, run_mode, orderbook)?;
        let signals = populate_signals(frame, params, settings);
        let output = signal_port.write(&signals, settings.timeframe)?;

        info!(
            pair = %name,
            candles = count,
            entries = signals.entry_count(),
            exits = signals.exit_count(),
            "wrote {}",
            output
        );
        summaries.push(PairSummary {
            pair: name,
            candles: count,
            entries: signals.entry_count(),
            exits: signals.exit_count(),
            output,
        });
    }

    Ok(summaries)
}

fn run_signals(
    config_path: &Path,
    pair: Option<&str>,
    output: Option<PathBuf>,
    buy_rsi: Option<i64>,
    sell_rsi: Option<i64>,
) -> Result<(), StrategyError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config)?;
    let params = build_params(&config, buy_rsi, sell_rsi)?;
    let data = load_data_settings(&config)?;

    info!(
        timeframe = %settings.timeframe,
        buy_rsi = params.buy_rsi,
        sell_rsi = params.sell_rsi,
        runmode = %data.run_mode,
        "running signal pipeline"
    );

    let data_port = CsvAdapter::new(data.directory.clone());
    let orderbook = OrderBookSnapshotAdapter::new(data.directory.clone());
    let writer = CsvSignalWriter::new(output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)));

    let pairs = resolve_pairs(pair, &data, &data_port, &settings)?;
    let summaries = run_signals_pipeline(
        &data_port,
        &orderbook,
        &writer,
        pairs,
        &params,
        &settings,
        data.run_mode,
    )?;

    for s in &summaries {
        println!(
            "{}: {} candles, {} entries, {} exits -> {}",
            s.pair, s.candles, s.entries, s.exits, s.output
        );
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StrategyError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config)?;
    let params = load_params(&config)?;
    let data = load_data_settings(&config)?;

    println!("Configuration OK: {}", config_path.display());
    println!();
    println!("timeframe:            {}", settings.timeframe);
    println!("startup_candle_count: {}", settings.startup_candle_count);
    println!("stoploss:             {}", settings.stoploss);
    println!("trailing_stop:        {}", settings.trailing_stop);
    println!("use_exit_signal:      {}", settings.use_exit_signal);
    println!("exit_profit_only:     {}", settings.exit_profit_only);
    println!(
        "ignore_roi_if_entry_signal: {}",
        settings.ignore_roi_if_entry_signal
    );
    println!(
        "process_only_new_candles:   {}",
        settings.process_only_new_candles
    );
    println!("minimal_roi:");
    for (minutes, roi) in settings.minimal_roi.steps() {
        println!("  {:>5} min: {}", minutes, roi);
    }
    println!(
        "order_types:          entry={} exit={} stoploss={} on_exchange={}",
        settings.order_types.entry,
        settings.order_types.exit,
        settings.order_types.stoploss,
        settings.order_types.stoploss_on_exchange
    );
    println!(
        "order_time_in_force:  entry={} exit={}",
        settings.order_time_in_force.entry, settings.order_time_in_force.exit
    );
    println!();
    for (p, value) in [(BUY_RSI, params.buy_rsi), (SELL_RSI, params.sell_rsi)] {
        println!(
            "{:<9} {} (range {}..={}, default {})",
            p.name, value, p.low, p.high, p.default
        );
    }
    println!();
    println!("entry: {}", entry_rule(&params));
    println!("exit:  {}", exit_rule(&params));
    println!();
    println!("data:    {}", data.directory.display());
    println!("runmode: {}", data.run_mode);
    if data.pairs.is_empty() {
        println!("pairs:   all available");
    } else {
        let pairs: Vec<String> = data.pairs.iter().map(Pair::to_string).collect();
        println!("pairs:   {}", pairs.join(", "));
    }
    Ok(())
}

fn run_info(config_path: &Path, pair: Option<&str>) -> Result<(), StrategyError> {
    let config = load_config(config_path)?;
    let settings = load_settings(&config)?;
    let data = load_data_settings(&config)?;
    let data_port = CsvAdapter::new(data.directory.clone());

    for pair in resolve_pairs(pair, &data, &data_port, &settings)? {
        let name = pair.to_string();
        match data_port.get_data_range(&name, settings.timeframe)? {
            Some((first, last, count)) => {
                println!(
                    "{} [{}]: {} candles, {} to {}",
                    name, settings.timeframe, count, first, last
                );
                if count < settings.startup_candle_count {
                    warn!(
                        "{}",
                        StrategyError::InsufficientData {
                            pair: name.clone(),
                            bars: count,
                            minimum: settings.startup_candle_count,
                        }
                    );
                }
            }
            None => println!("{} [{}]: no data", name, settings.timeframe),
        }
    }
    Ok(())
}
