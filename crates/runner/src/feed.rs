//! Symbol Feed - per-symbol trading manager

use parking_lot::RwLock;
use tally_core::{Candle, Symbol};
use tally_ports::TradingManager;

/// Tracks the latest candle seen by one symbol worker
///
/// Registered with the account so the end-of-run order replay can use the
/// last price each symbol traded at.
#[derive(Debug)]
pub struct SymbolFeed {
    symbol: Symbol,
    latest: RwLock<Option<Candle>>,
}

impl SymbolFeed {
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            latest: RwLock::new(None),
        }
    }

    /// Remember `candle` as the most recent one
    pub fn record(&self, candle: &Candle) {
        *self.latest.write() = Some(candle.clone());
    }
}

impl TradingManager for SymbolFeed {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn latest_candle(&self) -> Option<Candle> {
        self.latest.read().clone()
    }
}
