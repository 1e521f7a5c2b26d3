//! Account configuration loading
//!
//! Supports JSON configuration files describing:
//! - The reference currency and tradeable assets
//! - The margin reserve percentage used for leveraged positions
//! - Initial funds to credit when a simulation starts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tally_core::{Quantity, Symbol};
use tally_ports::{AccountConfiguration, ConfigurationError, ConfigurationResult};

/// Symbols, margin policy and starting funds of a simulated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Currency every trading pair is quoted in
    #[serde(default = "default_reference_currency")]
    pub reference_currency: Symbol,

    /// Tradeable assets (e.g. "BTC", "ETH")
    #[serde(default)]
    pub assets: Vec<Symbol>,

    /// Margin reserved per unit of position value, in percent (150 = 1.5x)
    #[serde(default = "default_margin_reserve_percentage")]
    pub margin_reserve_percentage: u32,

    /// Funds credited to the free pool at bootstrap
    #[serde(default)]
    pub initial_funds: HashMap<Symbol, Quantity>,
}

fn default_reference_currency() -> Symbol {
    "USDT".to_string()
}

fn default_margin_reserve_percentage() -> u32 {
    150
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            reference_currency: default_reference_currency(),
            assets: Vec::new(),
            margin_reserve_percentage: default_margin_reserve_percentage(),
            initial_funds: HashMap::new(),
        }
    }
}

impl AccountConfig {
    pub fn new(reference_currency: impl Into<Symbol>) -> Self {
        Self {
            reference_currency: reference_currency.into(),
            ..Default::default()
        }
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.assets.extend(assets.into_iter().map(Into::into));
        self
    }

    pub fn with_margin_reserve_percentage(mut self, percentage: u32) -> Self {
        self.margin_reserve_percentage = percentage;
        self
    }

    pub fn with_initial_funds(mut self, symbol: impl Into<Symbol>, amount: Quantity) -> Self {
        self.initial_funds.insert(symbol.into(), amount);
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
        if self.margin_reserve_percentage < 100 {
            return Err(ConfigurationError::Invalid(format!(
                "margin reserve percentage must be at least 100, got {}",
                self.margin_reserve_percentage
            )));
        }
        if let Some(symbol) = self
            .initial_funds
            .keys()
            .find(|symbol| !self.is_symbol_supported(symbol))
        {
            return Err(self.report_unknown_symbol("Can't set initial funds", symbol));
        }
        Ok(())
    }

    /// Trading pair symbols, one per asset against the reference currency
    pub fn trading_symbols(&self) -> Vec<Symbol> {
        self.assets
            .iter()
            .map(|asset| format!("{}{}", asset, self.reference_currency))
            .collect()
    }
}

impl AccountConfiguration for AccountConfig {
    fn is_symbol_supported(&self, symbol: &str) -> bool {
        if symbol == self.reference_currency {
            return true;
        }
        self.assets.iter().any(|asset| {
            asset == symbol
                || symbol
                    .strip_prefix(asset.as_str())
                    .is_some_and(|quote| quote == self.reference_currency)
        })
    }

    fn margin_reserve_factor(&self) -> Decimal {
        Decimal::from(self.margin_reserve_percentage) / Decimal::ONE_HUNDRED
    }
}
