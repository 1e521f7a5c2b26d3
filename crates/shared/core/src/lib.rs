//! Tally Core Domain
//!
//! Pure domain types for the Tally simulated account ledger.
//! This crate contains no async, no I/O, no locking, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Balance, Candle, FeeSchedule, OrderStatus};
pub use values::{Price, Quantity, Symbol, Timestamp};
