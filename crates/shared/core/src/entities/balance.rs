use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::values::{Quantity, Symbol};

/// Funds held for a single symbol, split into four pools
///
/// The pools are plain values. Nothing here rejects a transition that would
/// drive a pool negative; callers own that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Symbol these funds belong to
    symbol: Symbol,

    /// Immediately available for new orders
    free: Quantity,

    /// Committed to open orders
    locked: Quantity,

    /// Borrowed and sold short
    shorted: Quantity,

    /// Funds reserved as collateral, keyed by the asset they back
    margin_reserve: HashMap<Symbol, Quantity>,
}

impl Balance {
    /// Create an empty balance
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Create a balance funded with `free`, every other pool empty
    pub fn with_free(symbol: impl Into<Symbol>, free: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            free,
            ..Default::default()
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn free(&self) -> Quantity {
        self.free
    }

    pub fn set_free(&mut self, free: Quantity) {
        self.free = free;
    }

    pub fn locked(&self) -> Quantity {
        self.locked
    }

    pub fn set_locked(&mut self, locked: Quantity) {
        self.locked = locked;
    }

    pub fn shorted(&self) -> Quantity {
        self.shorted
    }

    pub fn set_shorted(&mut self, shorted: Quantity) {
        self.shorted = shorted;
    }

    /// Margin reserved against `asset`, zero if nothing was ever reserved
    pub fn margin_reserve(&self, asset: &str) -> Quantity {
        self.margin_reserve
            .get(asset)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn set_margin_reserve(&mut self, asset: impl Into<Symbol>, amount: Quantity) {
        self.margin_reserve.insert(asset.into(), amount);
    }

    /// Spendable-or-committed funds (free + locked)
    ///
    /// Excludes shorted and margin pools.
    pub fn total(&self) -> Quantity {
        self.free + self.locked
    }

    /// True when every pool is zero
    pub fn is_empty(&self) -> bool {
        self.free.is_zero()
            && self.locked.is_zero()
            && self.shorted.is_zero()
            && self.margin_reserve.values().all(|amount| amount.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_balance_is_empty() {
        let balance = Balance::new("USDT");

        assert_eq!(balance.symbol(), "USDT");
        assert_eq!(balance.free(), Decimal::ZERO);
        assert_eq!(balance.locked(), Decimal::ZERO);
        assert_eq!(balance.shorted(), Decimal::ZERO);
        assert!(balance.is_empty());
    }

    #[test]
    fn test_with_free_only_funds_free_pool() {
        let balance = Balance::with_free("USDT", dec!(1000));

        assert_eq!(balance.free(), dec!(1000));
        assert_eq!(balance.locked(), Decimal::ZERO);
        assert_eq!(balance.total(), dec!(1000));
        assert!(!balance.is_empty());
    }

    #[test]
    fn test_margin_reserve_defaults_to_zero() {
        let mut balance = Balance::new("USDT");
        assert_eq!(balance.margin_reserve("BTC"), Decimal::ZERO);

        balance.set_margin_reserve("BTC", dec!(150));
        assert_eq!(balance.margin_reserve("BTC"), dec!(150));
        assert_eq!(balance.margin_reserve("ETH"), Decimal::ZERO);

        // Margin is not part of the spendable total
        assert_eq!(balance.total(), Decimal::ZERO);
    }

    #[test]
    fn test_pools_accept_negative_values() {
        let mut balance = Balance::with_free("USDT", dec!(10));
        balance.set_free(dec!(-5));
        balance.set_locked(dec!(-1));

        assert_eq!(balance.total(), dec!(-6));
    }

    #[test]
    fn test_serde_round_trip_keeps_margin_map() {
        let mut balance = Balance::with_free("USDT", dec!(100));
        balance.set_margin_reserve("BTC", dec!(15));

        let json = serde_json::to_string(&balance).unwrap();
        let parsed: Balance = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, balance);
    }
}
