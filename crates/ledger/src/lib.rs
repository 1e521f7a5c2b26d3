//! Tally Ledger
//!
//! The internal ledger of a simulated trading account:
//! - **Balance Store**: concurrent symbol -> balance map with get-or-create lookups
//! - **Ledger Engine**: add/subtract on the free, locked, shorted and margin pools
//! - **Cascading Policies**: locked -> free -> margin debits, locked -> free releases
//! - **Order Coordination**: candle-driven review of pending orders under one lock
//! - **Lifecycle**: funding, locking for new orders, reset, simulation end
//!
//! ## Architecture
//!
//! ```text
//! Simulation driver ──► candles per symbol
//!                              │
//!                              ▼
//!          ┌────────────────────────────────────────┐
//!          │        SimulatedAccountManager         │
//!          │  ┌──────────────────────────────────┐  │
//!          │  │ order lock ── pending orders     │──┼──► ClientAccount
//!          │  └──────────────────────────────────┘  │    (fills, fees)
//!          │  ┌──────────────────────────────────┐  │         │
//!          │  │ BalanceStore (DashMap)           │◄─┼─────────┘
//!          │  │ free | locked | shorted | margin │  │  credits / debits
//!          │  └──────────────────────────────────┘  │
//!          └────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_ledger::{AccountConfig, SimulatedAccountManager};
//!
//! let manager = SimulatedAccountManager::new(client, Arc::new(config), Some(fees))?;
//! manager.set_amount("USDT", dec!(1000))?;
//! manager.lock_amount("USDT", dec!(300))?;
//! manager.subtract_from_locked_or_free_balance("USDT", None, dec!(500))?;
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod manager;
pub mod orders;
pub mod store;

// Re-export main types
pub use config::AccountConfig;
pub use error::{LedgerError, Result};
pub use ledger::{DebitOutcome, ReleaseOutcome};
pub use manager::SimulatedAccountManager;
pub use store::BalanceStore;
