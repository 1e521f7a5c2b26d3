//! Concurrent symbol -> balance map

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tally_core::{Balance, Symbol};

/// Thread-safe storage for per-symbol balances using DashMap.
///
/// Different symbols can be looked up, created and mutated from different
/// threads without external locking. A single `update` call holds the entry
/// exclusively, but nothing spans two calls: multi-step operations on one
/// symbol must be serialized by the caller.
#[derive(Debug, Default)]
pub struct BalanceStore {
    balances: DashMap<Symbol, Balance>,
    /// Sorted symbol index, rebuilt lazily after any insert or clear
    index: RwLock<Option<Arc<[Symbol]>>>,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for `symbol`, created empty on first lookup
    pub fn get(&self, symbol: &str) -> Balance {
        if let Some(balance) = self.balances.get(symbol) {
            return balance.value().clone();
        }
        self.update(symbol, |balance| balance.clone())
    }

    /// Mutate the balance for `symbol` in place, creating it if absent
    pub fn update<R>(&self, symbol: &str, f: impl FnOnce(&mut Balance) -> R) -> R {
        if let Some(mut balance) = self.balances.get_mut(symbol) {
            return f(balance.value_mut());
        }

        let mut inserted = false;
        let result = {
            let mut entry = self.balances.entry(symbol.to_string()).or_insert_with(|| {
                inserted = true;
                Balance::new(symbol)
            });
            f(entry.value_mut())
        };
        if inserted {
            self.invalidate_index();
        }
        result
    }

    /// Replace whatever is held for the balance's symbol
    pub fn replace(&self, balance: Balance) {
        self.balances.insert(balance.symbol().to_string(), balance);
        self.invalidate_index();
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.balances.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn clear(&self) {
        self.balances.clear();
        self.invalidate_index();
    }

    /// All known symbols in sorted order
    pub fn symbols(&self) -> Arc<[Symbol]> {
        if let Some(index) = self.index.read().as_ref() {
            return Arc::clone(index);
        }

        // Rebuilt under the write lock; invalidation cannot interleave
        let mut cached = self.index.write();
        if let Some(index) = cached.as_ref() {
            return Arc::clone(index);
        }
        let mut symbols: Vec<Symbol> = self.balances.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        let index: Arc<[Symbol]> = symbols.into();
        *cached = Some(Arc::clone(&index));
        index
    }

    /// Copy of every balance, ordered by symbol
    pub fn snapshot(&self) -> Vec<Balance> {
        self.symbols()
            .iter()
            .filter_map(|symbol| self.balances.get(symbol).map(|b| b.value().clone()))
            .collect()
    }

    fn invalidate_index(&self) {
        *self.index.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn test_get_creates_empty_balance() {
        let store = BalanceStore::new();
        assert!(!store.contains("USDT"));

        let balance = store.get("USDT");

        assert_eq!(balance.symbol(), "USDT");
        assert!(balance.is_empty());
        assert!(store.contains("USDT"));
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store = BalanceStore::new();
        store.update("USDT", |b| b.set_free(dec!(50)));
        store.update("USDT", |b| b.set_free(b.free() + dec!(25)));

        assert_eq!(store.get("USDT").free(), dec!(75));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_discards_previous_balance() {
        let store = BalanceStore::new();
        store.update("USDT", |b| {
            b.set_locked(dec!(10));
            b.set_margin_reserve("BTC", dec!(3));
        });

        store.replace(Balance::with_free("USDT", dec!(100)));

        let balance = store.get("USDT");
        assert_eq!(balance.free(), dec!(100));
        assert_eq!(balance.locked(), Decimal::ZERO);
        assert_eq!(balance.margin_reserve("BTC"), Decimal::ZERO);
    }

    #[test]
    fn test_symbol_index_tracks_inserts_and_clear() {
        let store = BalanceStore::new();
        store.get("ETH");
        store.get("BTC");
        assert_eq!(&*store.symbols(), &["BTC".to_string(), "ETH".to_string()]);

        store.get("ADA");
        assert_eq!(store.symbols().len(), 3);
        assert_eq!(store.snapshot()[0].symbol(), "ADA");

        store.clear();
        assert!(store.is_empty());
        assert!(store.symbols().is_empty());
    }

    #[test]
    fn test_snapshot_reflects_latest_values() {
        let store = BalanceStore::new();
        store.get("USDT");
        let _ = store.symbols();

        store.update("USDT", |b| b.set_free(dec!(9)));

        assert_eq!(store.snapshot()[0].free(), dec!(9));
    }

    #[test]
    fn test_concurrent_updates_on_distinct_symbols() {
        let store = BalanceStore::new();

        thread::scope(|scope| {
            for symbol in ["BTC", "ETH", "SOL", "ADA"] {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..1000 {
                        store.update(symbol, |b| b.set_free(b.free() + Decimal::ONE));
                    }
                });
            }
        });

        for symbol in ["BTC", "ETH", "SOL", "ADA"] {
            assert_eq!(store.get(symbol).free(), dec!(1000));
        }
    }
}
