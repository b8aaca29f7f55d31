//! Port traits between the domain and the outside world.

pub mod config_port;
pub mod data_port;
pub mod orderbook_port;
pub mod signal_port;
