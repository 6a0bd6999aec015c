//! Error types for expense settlement

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any computation (empty roster, duplicate ids,
    /// negative amounts, non-integral or overflowing amounts)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Balances do not sum to zero within the rounding tolerance.
    /// Indicates a bug in the caller's balance computation.
    #[error("Arithmetic invariant violated: {0}")]
    ArithmeticInvariant(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Event file could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
