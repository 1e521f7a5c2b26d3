//! Ledger errors

use rust_decimal::Decimal;
use tally_ports::ConfigurationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A debit reached a pool that cannot cover it.
    /// Signals broken order/fund accounting upstream, not bad user input.
    #[error(
        "Insufficient funds for {symbol}: requested={requested}, locked={locked}, free={free}"
    )]
    InsufficientFunds {
        symbol: String,
        requested: Decimal,
        locked: Decimal,
        free: Decimal,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
