//! Error and decline types

use thiserror::Error;

use crate::credits::Credits;

/// Configuration / IO error
#[derive(Error, Debug)]
pub enum SzError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}

/// Result type alias
pub type SzResult<T> = Result<T, SzError>;

/// A gameplay command the engine refused.
///
/// Declines never mutate state. Sessions turn them into a status message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Declined {
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Credits, available: Credits },

    #[error("Busy: previous command is still revealing")]
    Busy,

    #[error("Number {0} is not open for straight bets")]
    RestrictedNumber(u8),

    #[error("No bets placed")]
    NoBets,

    #[error("Invalid bet: {0}")]
    InvalidBet(String),

    #[error("Nothing to gamble")]
    NothingToGamble,

    #[error("Gamble is not open")]
    GambleClosed,

    #[error("Gamble is already open")]
    GambleOpen,

    #[error("Not available during free spins")]
    InFreeSpins,

    #[error("{0} out of range")]
    OutOfRange(String),

    #[error("Unknown box: {0}")]
    UnknownBox(String),
}

impl Declined {
    /// Shorthand for the funds check every stake goes through
    pub fn check_funds(required: Credits, available: Credits) -> Result<(), Declined> {
        if available < required {
            Err(Declined::InsufficientFunds {
                required,
                available,
            })
        } else {
            Ok(())
        }
    }
}

/// Result of a gameplay command
pub type Outcome<T> = Result<T, Declined>;
