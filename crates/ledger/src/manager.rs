//! Simulated account manager - construction and account lifecycle

use log::info;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_core::{Balance, Quantity};
use tally_ports::{
    AccountConfiguration, ClientAccount, ConfigurationError, PendingOrder, TradingFees,
    TradingManager,
};

use crate::error::Result;
use crate::store::BalanceStore;

/// In-memory ledger of a simulated trading account
///
/// Owns the per-symbol balances, the pending-order set and the trading
/// managers registered for the run. One instance is shared (behind an
/// `Arc`) by every symbol worker of a simulation.
///
/// Balance operations live in `ledger.rs`, order coordination in `orders.rs`.
pub struct SimulatedAccountManager {
    pub(crate) client: Arc<dyn ClientAccount>,
    pub(crate) configuration: Arc<dyn AccountConfiguration>,
    pub(crate) trading_fees: Arc<dyn TradingFees>,
    pub(crate) margin_reserve_factor: Decimal,
    pub(crate) balances: BalanceStore,
    /// Pending orders; the mutex is the account-wide order lock
    pub(crate) pending_orders: Mutex<Vec<Arc<dyn PendingOrder>>>,
    pub(crate) trading_managers: RwLock<Vec<Arc<dyn TradingManager>>>,
}

impl SimulatedAccountManager {
    /// Create a manager; a simulated account cannot run without a fee model
    pub fn new(
        client: Arc<dyn ClientAccount>,
        configuration: Arc<dyn AccountConfiguration>,
        trading_fees: Option<Arc<dyn TradingFees>>,
    ) -> Result<Self> {
        let trading_fees = trading_fees.ok_or(ConfigurationError::MissingTradingFees)?;
        let margin_reserve_factor = configuration.margin_reserve_factor();
        if margin_reserve_factor < Decimal::ONE {
            return Err(ConfigurationError::Invalid(format!(
                "margin reserve factor {} is below 1",
                margin_reserve_factor
            ))
            .into());
        }

        Ok(Self {
            client,
            configuration,
            trading_fees,
            margin_reserve_factor,
            balances: BalanceStore::new(),
            pending_orders: Mutex::new(Vec::new()),
            trading_managers: RwLock::new(Vec::new()),
        })
    }

    pub fn trading_fees(&self) -> &Arc<dyn TradingFees> {
        &self.trading_fees
    }

    /// Current balance for `symbol`, created empty if never seen
    pub fn balance(&self, symbol: &str) -> Balance {
        self.balances.get(symbol)
    }

    /// Every balance held, ordered by symbol
    pub fn balances(&self) -> Vec<Balance> {
        self.balances.snapshot()
    }

    /// Replace the balance for `symbol` with one holding `amount` free funds
    pub fn set_amount(&self, symbol: &str, amount: Quantity) -> Result<&Self> {
        if !self.configuration.is_symbol_supported(symbol) {
            return Err(self
                .configuration
                .report_unknown_symbol("Can't set funds", symbol)
                .into());
        }

        self.balances.replace(Balance::with_free(symbol, amount));
        info!("Funds set: {} free={}", symbol, amount);
        Ok(self)
    }

    /// Move `amount` from free to locked when an order is placed
    ///
    /// The two pool updates are separate steps; see `BalanceStore`.
    pub fn lock_amount(&self, symbol: &str, amount: Quantity) -> Result<&Self> {
        if !self.configuration.is_symbol_supported(symbol) {
            return Err(self
                .configuration
                .report_unknown_symbol("Can't lock funds", symbol)
                .into());
        }

        self.subtract_from_free_balance(symbol, amount);
        self.add_to_locked_balance(symbol, amount);
        Ok(self)
    }

    /// Track a per-symbol trading manager for the end-of-run order replay
    pub fn register_trading_manager(&self, manager: Arc<dyn TradingManager>) {
        self.trading_managers.write().push(manager);
    }

    pub fn trading_managers(&self) -> Vec<Arc<dyn TradingManager>> {
        self.trading_managers.read().clone()
    }

    /// Return the account to a fresh state
    ///
    /// Drops all balances, pending orders and trading managers, then asks the
    /// client account to reset itself.
    pub fn reset_balances(&self) -> &Self {
        self.balances.clear();
        self.pending_orders.lock().clear();
        self.trading_managers.write().clear();

        self.client.reset();
        info!("Account reset");
        self
    }
}

impl std::fmt::Debug for SimulatedAccountManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedAccountManager")
            .field("margin_reserve_factor", &self.margin_reserve_factor)
            .field("balances", &self.balances.len())
            .field("pending_orders", &self.pending_orders.lock().len())
            .field("trading_managers", &self.trading_managers.read().len())
            .finish()
    }
}
