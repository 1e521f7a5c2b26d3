//! Tally Runner - Backtest Simulation Driver
//!
//! Runs one worker per trading symbol against a single shared account:
//!
//! - **Config**: account configuration plus the symbols to drive
//! - **Symbol Feed**: per-symbol trading manager remembering the latest candle
//! - **Simulation**: bootstrap funds, run workers concurrently, end the run
//!
//! ## Architecture
//!
//! ```text
//!   candles BTCUSDT     candles ETHUSDT     candles ...
//!         │                   │                  │
//!         ▼                   ▼                  ▼
//!   ┌───────────┐       ┌───────────┐      ┌───────────┐
//!   │  worker   │       │  worker   │      │  worker   │
//!   │ (feed)    │       │ (feed)    │      │ (feed)    │
//!   └─────┬─────┘       └─────┬─────┘      └─────┬─────┘
//!         │ update_open_orders │                  │
//!         └──────────────┬─────┴──────────────────┘
//!                        ▼
//!          ┌──────────────────────────────┐
//!          │   SimulatedAccountManager    │
//!          └──────────────────────────────┘
//!                        │ all workers joined
//!                        ▼
//!               notify_simulation_end
//! ```

pub mod config;
pub mod feed;
pub mod simulation;

// Re-export main types
pub use config::SimulationConfig;
pub use feed::SymbolFeed;
pub use simulation::{Simulation, SimulationResults};
