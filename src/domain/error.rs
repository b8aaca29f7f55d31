//! Error types for the outer shell (config, data, I/O).
//!
//! The indicator and rule stages never fail: undefined values propagate as
//! "no signal" instead.

/// Top-level error type for rsimomentum.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {pair}")]
    NoData { pair: String },

    #[error("insufficient data for {pair}: have {bars} candles, need {minimum}")]
    InsufficientData {
        pair: String,
        bars: usize,
        minimum: usize,
    },

    #[error("order book unavailable for {pair}: {reason}")]
    OrderBook { pair: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StrategyError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StrategyError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StrategyError> for std::process::ExitCode {
    fn from(err: &StrategyError) -> Self {
        let code: u8 = match err {
            StrategyError::Io(_) => 1,
            StrategyError::ConfigParse { .. }
            | StrategyError::ConfigMissing { .. }
            | StrategyError::ConfigInvalid { .. } => 2,
            StrategyError::Data { .. } | StrategyError::OrderBook { .. } => 3,
            StrategyError::NoData { .. } | StrategyError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_helper_builds_config_invalid() {
        let err = StrategyError::invalid("parameters", "buy_rsi", "out of range");
        assert_eq!(
            err.to_string(),
            "invalid config value [parameters] buy_rsi: out of range"
        );
    }

    #[test]
    fn insufficient_data_message() {
        let err = StrategyError::InsufficientData {
            pair: "ETH/USDT".into(),
            bars: 12,
            minimum: 30,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for ETH/USDT: have 12 candles, need 30"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StrategyError = io.into();
        assert!(matches!(err, StrategyError::Io(_)));
    }
}
