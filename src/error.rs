//! Unified error handling for the paper grid bot
//!
//! Every trading operation returns a [`TradingResult`]. Errors never escape a
//! single operation: the chat layer renders them with [`TradingError::user_message`]
//! and the session keeps running.

use std::fmt;

use thiserror::Error;

/// Why a price could not be obtained
#[derive(Debug, Clone, PartialEq)]
pub enum PriceFailure {
    /// No asset is selected for the session
    NoAssetSelected,
    /// The exchange request failed or returned an unusable price
    Fetch(String),
}

impl fmt::Display for PriceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceFailure::NoAssetSelected => write!(f, "no asset selected"),
            PriceFailure::Fetch(reason) => write!(f, "{}", reason),
        }
    }
}

/// Main error type for trading operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Price unavailable: {0}")]
    PriceUnavailable(PriceFailure),

    #[error("Insufficient funds: required {required:.2}, available {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("Insufficient position: no open position holds {requested}")]
    InsufficientPosition { requested: f64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Session closed")]
    SessionClosed,
}

impl TradingError {
    /// Price fetch failure with a human-readable reason
    pub fn price_unavailable(reason: impl Into<String>) -> Self {
        TradingError::PriceUnavailable(PriceFailure::Fetch(reason.into()))
    }

    /// Trading attempted before an asset was chosen
    pub fn no_asset_selected() -> Self {
        TradingError::PriceUnavailable(PriceFailure::NoAssetSelected)
    }

    /// Get a user-facing message suitable for a chat reply
    pub fn user_message(&self) -> String {
        match self {
            TradingError::PriceUnavailable(PriceFailure::NoAssetSelected) => {
                "Please choose an asset first with the \"Choose asset\" button.".to_string()
            }
            TradingError::PriceUnavailable(PriceFailure::Fetch(reason)) => {
                format!("Could not fetch the current price: {}", reason)
            }
            TradingError::InsufficientFunds { required, available } => {
                format!(
                    "Insufficient funds for this purchase.\n\
                    Required: {:.2} USD\n\
                    Available: {:.2} USD",
                    required, available
                )
            }
            TradingError::InsufficientPosition { .. } => {
                "Not enough assets to sell.".to_string()
            }
            TradingError::InvalidAmount(_) => "Please enter a valid number.".to_string(),
            TradingError::InvalidConfiguration(msg) => {
                format!("The grid could not be built: {}", msg)
            }
            TradingError::SessionClosed => {
                "Your trading session is no longer running. Send /start to begin again.".to_string()
            }
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TradingError::InvalidConfiguration(_) => "config",
            TradingError::PriceUnavailable(_) => "price",
            TradingError::InsufficientFunds { .. }
            | TradingError::InsufficientPosition { .. }
            | TradingError::InvalidAmount(_) => "validation",
            TradingError::SessionClosed => "internal",
        }
    }

    /// Whether the autotrade loop should stop instead of skipping a tick
    pub fn halts_autotrade(&self) -> bool {
        matches!(self, TradingError::PriceUnavailable(PriceFailure::NoAssetSelected))
    }
}

impl From<reqwest::Error> for TradingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TradingError::price_unavailable(format!("request timed out: {}", err))
        } else if err.is_status() {
            TradingError::price_unavailable(format!("bad status: {}", err))
        } else if err.is_decode() {
            TradingError::price_unavailable(format!("malformed response: {}", err))
        } else {
            TradingError::price_unavailable(err.to_string())
        }
    }
}

/// Result type alias using TradingError
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TradingError::InsufficientFunds { required: 150.0, available: 100.0 };
        assert_eq!(err.to_string(), "Insufficient funds: required 150.00, available 100.00");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(TradingError::no_asset_selected().category(), "price");
        assert_eq!(TradingError::InvalidAmount("x".to_string()).category(), "validation");
        assert_eq!(TradingError::InvalidConfiguration("x".to_string()).category(), "config");
    }

    #[test]
    fn test_only_missing_asset_halts_autotrade() {
        assert!(TradingError::no_asset_selected().halts_autotrade());
        assert!(!TradingError::price_unavailable("timeout").halts_autotrade());
    }

    #[test]
    fn test_missing_asset_is_a_price_failure() {
        let err = TradingError::no_asset_selected();
        assert!(matches!(err, TradingError::PriceUnavailable(_)));
        assert_eq!(err.to_string(), "Price unavailable: no asset selected");
    }

    #[test]
    fn test_user_message() {
        let err = TradingError::InsufficientFunds { required: 100.0, available: 50.0 };
        let msg = err.user_message();
        assert!(msg.contains("100.00"));
        assert!(msg.contains("50.00"));
    }
}
