//! Simulation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::Symbol;
use tally_ledger::AccountConfig;
use tally_ports::{AccountConfiguration, ConfigurationError, ConfigurationResult};

/// What a simulation run trades and with which account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Account symbols, margin policy and starting funds
    #[serde(default)]
    pub account: AccountConfig,

    /// Trading pairs to drive, one worker each.
    /// Empty means every asset against the reference currency.
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl SimulationConfig {
    pub fn new(account: AccountConfig) -> Self {
        Self {
            account,
            symbols: Vec::new(),
        }
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigurationResult<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigurationError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> ConfigurationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigurationResult<()> {
        self.account.validate()?;
        match self
            .symbols
            .iter()
            .find(|symbol| !self.account.is_symbol_supported(symbol))
        {
            Some(symbol) => Err(self
                .account
                .report_unknown_symbol("Can't simulate", symbol)),
            None => Ok(()),
        }
    }

    /// Symbols the run will drive
    pub fn trading_symbols(&self) -> Vec<Symbol> {
        if self.symbols.is_empty() {
            self.account.trading_symbols()
        } else {
            self.symbols.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_default_to_account_pairs() {
        let json = r#"{ "account": { "assets": ["BTC", "ETH"] } }"#;

        let config = SimulationConfig::from_json(json).unwrap();

        assert_eq!(config.trading_symbols(), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_explicit_symbols_win() {
        let json = r#"{
            "account": { "reference_currency": "USDT", "assets": ["BTC", "ETH"] },
            "symbols": ["ETHUSDT"]
        }"#;

        let config = SimulationConfig::from_json(json).unwrap();

        assert_eq!(config.trading_symbols(), vec!["ETHUSDT"]);
    }

    #[test]
    fn test_unsupported_symbol_rejected() {
        let json = r#"{ "account": { "assets": ["BTC"] }, "symbols": ["XRPUSDT"] }"#;

        let err = SimulationConfig::from_json(json).unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::UnknownSymbol {
                action: "Can't simulate".to_string(),
                symbol: "XRPUSDT".to_string(),
            }
        );
    }
}
