//! Signal output port.

use crate::domain::error::StrategyError;
use crate::domain::signal::SignalFrame;
use crate::domain::timeframe::Timeframe;

/// Port for persisting an evaluated signal frame.
pub trait SignalPort {
    /// Writes the frame and returns where it was written.
    fn write(&self, signals: &SignalFrame, timeframe: Timeframe) -> Result<String, StrategyError>;
}
