//! Simulation - drives candle streams through a shared account
//!
//! Every symbol gets its own worker task. Workers share one
//! `SimulatedAccountManager`; all activity for a symbol stays on its worker,
//! which is what keeps multi-pool ledger updates for that symbol serialized.

use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tally_core::{Balance, Candle, Symbol};
use tally_ledger::{Result, SimulatedAccountManager};
use tally_ports::{ClientAccount, TradingFees, TradingManager};

use crate::config::SimulationConfig;
use crate::feed::SymbolFeed;

/// Simulation results
#[derive(Debug, Clone, Default)]
pub struct SimulationResults {
    /// Candles processed per symbol
    pub candles_processed: HashMap<Symbol, u64>,
    /// Candles that triggered a pending-order review, per symbol
    pub reviews: HashMap<Symbol, u64>,
    /// Balances just before the end-of-run cleanup
    pub final_balances: Vec<Balance>,
    /// Whether every worker completed
    pub success: bool,
    /// Error message if any
    pub error: Option<String>,
}

/// Per-worker tally
struct WorkerReport {
    symbol: Symbol,
    candles: u64,
    reviews: u64,
}

/// One backtest run over a shared simulated account
pub struct Simulation {
    config: SimulationConfig,
    account: Arc<SimulatedAccountManager>,
    feeds: HashMap<Symbol, Arc<SymbolFeed>>,
}

impl Simulation {
    /// Build the account, credit initial funds and register one feed per symbol
    pub fn new(
        config: SimulationConfig,
        client: Arc<dyn ClientAccount>,
        trading_fees: Option<Arc<dyn TradingFees>>,
    ) -> Result<Self> {
        config.validate()?;
        let account = Arc::new(SimulatedAccountManager::new(
            client,
            Arc::new(config.account.clone()),
            trading_fees,
        )?);

        let mut funds: Vec<_> = config.account.initial_funds.iter().collect();
        funds.sort_by(|a, b| a.0.cmp(b.0));
        for (symbol, amount) in funds {
            account.set_amount(symbol, *amount)?;
        }

        let mut feeds = HashMap::new();
        for symbol in config.trading_symbols() {
            let feed = Arc::new(SymbolFeed::new(symbol.clone()));
            account.register_trading_manager(feed.clone());
            feeds.insert(symbol, feed);
        }

        info!(
            "Simulation ready: {} symbols, {} funded balances",
            feeds.len(),
            account.balances().len()
        );

        Ok(Self {
            config,
            account,
            feeds,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The shared account, for placing orders and inspecting balances
    pub fn account(&self) -> &Arc<SimulatedAccountManager> {
        &self.account
    }

    pub fn feed(&self, symbol: &str) -> Option<&Arc<SymbolFeed>> {
        self.feeds.get(symbol)
    }

    /// Feed every stream through its symbol worker, then end the simulation
    ///
    /// Streams for symbols without a configured feed are skipped.
    pub async fn run(self, streams: HashMap<Symbol, Vec<Candle>>) -> SimulationResults {
        let mut results = SimulationResults {
            success: true,
            ..Default::default()
        };

        let mut handles = Vec::with_capacity(streams.len());
        for (symbol, candles) in streams {
            let Some(feed) = self.feeds.get(&symbol).cloned() else {
                warn!("No feed configured for {}, skipping {} candles", symbol, candles.len());
                continue;
            };
            let account = Arc::clone(&self.account);
            handles.push(tokio::spawn(run_worker(account, feed, candles)));
        }

        for handle in handles {
            match handle.await {
                Ok(report) => {
                    results
                        .candles_processed
                        .insert(report.symbol.clone(), report.candles);
                    results.reviews.insert(report.symbol, report.reviews);
                }
                Err(e) => {
                    error!("Symbol worker failed: {}", e);
                    results.success = false;
                    results.error = Some(e.to_string());
                }
            }
        }

        results.final_balances = self.account.balances();
        self.account.notify_simulation_end();

        info!(
            "Simulation complete: {} candles across {} symbols",
            results.candles_processed.values().sum::<u64>(),
            results.candles_processed.len()
        );
        results
    }
}

async fn run_worker(
    account: Arc<SimulatedAccountManager>,
    feed: Arc<SymbolFeed>,
    candles: Vec<Candle>,
) -> WorkerReport {
    let symbol = feed.symbol().to_string();
    let mut report = WorkerReport {
        symbol,
        candles: 0,
        reviews: 0,
    };

    for candle in candles {
        feed.record(&candle);
        if account.update_open_orders(&report.symbol, &candle) {
            report.reviews += 1;
        }
        report.candles += 1;
        tokio::task::yield_now().await;
    }

    debug!(
        "{} worker done: {} candles, {} reviews",
        report.symbol,
        report.candles,
        report.reviews
    );
    report
}
