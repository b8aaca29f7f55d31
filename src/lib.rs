//! rsimomentum: RSI + momentum signal pipeline for 5-minute candles.
//!
//! Hexagonal architecture: indicator math and entry/exit rules in [`domain`],
//! port traits in [`ports`], file-backed implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
