//! Tally Ports
//!
//! Port definitions (traits) for the Tally simulated account ledger.
//! These define the boundaries between the ledger and the collaborators it
//! is driven by: configuration, fee schedules, the client account that
//! decides fills, pending orders and per-symbol trading managers.

mod client;
mod configuration;
mod error;
mod fees;
mod order;
mod trading;

pub use client::ClientAccount;
pub use configuration::AccountConfiguration;
pub use error::{ConfigurationError, ConfigurationResult};
pub use fees::TradingFees;
pub use order::PendingOrder;
pub use trading::TradingManager;
