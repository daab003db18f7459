//! Unified error types and result handling
//!
//! The simulator rejects bad input before it computes anything, so every
//! error here is total: a caller either gets a complete schedule or one of
//! these variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any simulation work was done.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The iteration cap was reached with at least one debt still owing.
    #[error("Schedule does not amortize within {months} months (still owing: {})", debts.join(", "))]
    NonAmortizing { months: u32, debts: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
