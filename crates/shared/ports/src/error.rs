use thiserror::Error;

/// Errors raised when an operation falls outside what the account is configured for
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{action}: symbol '{symbol}' is not supported")]
    UnknownSymbol { action: String, symbol: String },

    #[error("Please configure trading fees")]
    MissingTradingFees,

    #[error("Failed to read configuration from {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigurationResult<T> = std::result::Result<T, ConfigurationError>;
