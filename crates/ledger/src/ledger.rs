//! Balance pool operations
//!
//! Simple mutators read a pool, apply the delta and write it back without any
//! bounds check. The two policies on top of them, the cascading debit and the
//! locked-funds release, are the only places that decide between pools.

use log::{debug, error, warn};
use rust_decimal::Decimal;
use tally_core::Quantity;

use crate::error::{LedgerError, Result};
use crate::manager::SimulatedAccountManager;

/// Which pools a cascading debit drew from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Locked funds covered the whole amount
    LockedOnly,
    /// Locked was emptied, the remainder came from free funds
    LockedAndFree { from_free: Quantity },
    /// Locked was emptied, the remainder was charged to the margin reserve
    LockedAndMargin { from_margin: Quantity },
}

/// How a release of locked funds was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// `amount` moved from locked to free
    Released,
    /// More was released than was locked; locked was zeroed and
    /// `credited` (locked - shortfall, possibly negative) added to free
    Shortfall {
        shortfall: Quantity,
        credited: Quantity,
    },
}

impl SimulatedAccountManager {
    pub fn free_balance(&self, symbol: &str) -> Quantity {
        self.balances.get(symbol).free()
    }

    pub fn locked_balance(&self, symbol: &str) -> Quantity {
        self.balances.get(symbol).locked()
    }

    pub fn shorted_balance(&self, symbol: &str) -> Quantity {
        self.balances.get(symbol).shorted()
    }

    /// Funds of `fund_symbol` reserved as margin against `asset_symbol`
    pub fn margin_reserve(&self, fund_symbol: &str, asset_symbol: &str) -> Quantity {
        self.balances.get(fund_symbol).margin_reserve(asset_symbol)
    }

    /// Scale a raw amount by the configured margin reserve factor
    pub fn apply_margin_reserve(&self, amount: Quantity) -> Quantity {
        amount * self.margin_reserve_factor
    }

    pub fn add_to_free_balance(&self, symbol: &str, amount: Quantity) {
        let free = self.balances.update(symbol, |balance| {
            balance.set_free(balance.free() + amount);
            balance.free()
        });
        debug!("{} free +{} -> {}", symbol, amount, free);
    }

    pub fn subtract_from_free_balance(&self, symbol: &str, amount: Quantity) {
        let free = self.balances.update(symbol, |balance| {
            balance.set_free(balance.free() - amount);
            balance.free()
        });
        debug!("{} free -{} -> {}", symbol, amount, free);
    }

    pub fn add_to_locked_balance(&self, symbol: &str, amount: Quantity) {
        let locked = self.balances.update(symbol, |balance| {
            balance.set_locked(balance.locked() + amount);
            balance.locked()
        });
        debug!("{} locked +{} -> {}", symbol, amount, locked);
    }

    pub fn subtract_from_locked_balance(&self, symbol: &str, amount: Quantity) {
        let locked = self.balances.update(symbol, |balance| {
            balance.set_locked(balance.locked() - amount);
            balance.locked()
        });
        debug!("{} locked -{} -> {}", symbol, amount, locked);
    }

    pub fn add_to_shorted_balance(&self, symbol: &str, amount: Quantity) {
        let shorted = self.balances.update(symbol, |balance| {
            balance.set_shorted(balance.shorted() + amount);
            balance.shorted()
        });
        debug!("{} shorted +{} -> {}", symbol, amount, shorted);
    }

    pub fn subtract_from_shorted_balance(&self, symbol: &str, amount: Quantity) {
        let shorted = self.balances.update(symbol, |balance| {
            balance.set_shorted(balance.shorted() - amount);
            balance.shorted()
        });
        debug!("{} shorted -{} -> {}", symbol, amount, shorted);
    }

    // TODO: release or call margin as the asset price moves; reserves only change on explicit calls today
    pub fn add_to_margin_reserve_balance(
        &self,
        fund_symbol: &str,
        asset_symbol: &str,
        amount: Quantity,
    ) {
        let reserve = self.balances.update(fund_symbol, |balance| {
            let reserve = balance.margin_reserve(asset_symbol) + amount;
            balance.set_margin_reserve(asset_symbol, reserve);
            reserve
        });
        debug!(
            "{} margin[{}] +{} -> {}",
            fund_symbol, asset_symbol, amount, reserve
        );
    }

    pub fn subtract_from_margin_reserve_balance(
        &self,
        fund_symbol: &str,
        asset_symbol: &str,
        amount: Quantity,
    ) {
        let reserve = self.balances.update(fund_symbol, |balance| {
            let reserve = balance.margin_reserve(asset_symbol) - amount;
            balance.set_margin_reserve(asset_symbol, reserve);
            reserve
        });
        debug!(
            "{} margin[{}] -{} -> {}",
            fund_symbol, asset_symbol, amount, reserve
        );
    }

    /// Debit `amount` from `funds`, drawing on locked funds first
    ///
    /// 1. `amount < locked`: taken from locked only.
    /// 2. Otherwise locked is emptied and the remainder comes from free when
    ///    free covers it, or from the margin reserve against `asset` when one
    ///    is given (no sufficiency check there).
    /// 3. With neither, the full `amount` is charged to locked through the
    ///    checked path, which fails: upstream accounting is inconsistent.
    ///
    /// Steps are not rolled back on failure.
    pub fn subtract_from_locked_or_free_balance(
        &self,
        funds: &str,
        asset: Option<&str>,
        amount: Quantity,
    ) -> Result<DebitOutcome> {
        let locked = self.locked_balance(funds);

        if amount < locked {
            self.subtract_from_locked_balance(funds, amount);
            return Ok(DebitOutcome::LockedOnly);
        }

        // Reserve can exceed locked when the price moved since the order was placed
        self.subtract_from_locked_balance(funds, locked);
        let remainder = amount - locked;

        if self.free_balance(funds) >= remainder {
            self.subtract_from_free_balance(funds, remainder);
            return Ok(DebitOutcome::LockedAndFree {
                from_free: remainder,
            });
        }

        if let Some(asset) = asset {
            self.subtract_from_margin_reserve_balance(funds, asset, remainder);
            return Ok(DebitOutcome::LockedAndMargin {
                from_margin: remainder,
            });
        }

        self.subtract_from_locked_balance_checked(funds, amount)?;
        Ok(DebitOutcome::LockedOnly)
    }

    /// Return `amount` of locked funds to the free pool
    ///
    /// Releasing more than is locked zeroes locked and credits free with
    /// `locked - (amount - locked)`, which may be negative. A correct
    /// simulation never takes that path.
    pub fn release_from_locked_balance(&self, symbol: &str, amount: Quantity) -> ReleaseOutcome {
        let outcome = self.balances.update(symbol, |balance| {
            let locked = balance.locked();
            if locked < amount {
                let shortfall = amount - locked;
                let credited = locked - shortfall;
                balance.set_locked(Decimal::ZERO);
                balance.set_free(balance.free() + credited);
                ReleaseOutcome::Shortfall {
                    shortfall,
                    credited,
                }
            } else {
                balance.set_locked(locked - amount);
                balance.set_free(balance.free() + amount);
                ReleaseOutcome::Released
            }
        });

        match outcome {
            ReleaseOutcome::Released => debug!("{} released {} to free", symbol, amount),
            ReleaseOutcome::Shortfall {
                shortfall,
                credited,
            } => warn!(
                "{} release of {} exceeds locked funds by {}, credited {} to free",
                symbol, amount, shortfall, credited
            ),
        }
        outcome
    }

    /// Locked-pool debit that refuses to go below zero
    fn subtract_from_locked_balance_checked(&self, symbol: &str, amount: Quantity) -> Result<()> {
        self.balances.update(symbol, |balance| {
            if balance.locked() < amount {
                return Err(LedgerError::InsufficientFunds {
                    symbol: symbol.to_string(),
                    requested: amount,
                    locked: balance.locked(),
                    free: balance.free(),
                });
            }
            balance.set_locked(balance.locked() - amount);
            Ok(())
        })
        .inspect_err(|e| error!("Accounting inconsistency: {}", e))
    }
}
