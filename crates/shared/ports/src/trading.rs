use tally_core::Candle;

/// Port for a per-symbol trading manager known to the account
pub trait TradingManager: Send + Sync {
    /// Trading pair this manager drives
    fn symbol(&self) -> &str;

    /// Most recent candle seen for the symbol, if any arrived yet
    fn latest_candle(&self) -> Option<Candle>;
}
