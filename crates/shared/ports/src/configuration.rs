use rust_decimal::Decimal;

use crate::error::ConfigurationError;

/// Port for the account's symbol and margin configuration
pub trait AccountConfiguration: Send + Sync {
    /// Whether funds or orders may be held for `symbol`
    fn is_symbol_supported(&self, symbol: &str) -> bool;

    /// Build (not raise) the error reported for an unsupported symbol
    fn report_unknown_symbol(&self, action: &str, symbol: &str) -> ConfigurationError {
        ConfigurationError::UnknownSymbol {
            action: action.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Multiplier applied to raw amounts to obtain the margin to reserve
    ///
    /// Always >= 1; 1.5 means half of the position value again is held back.
    fn margin_reserve_factor(&self) -> Decimal;
}
