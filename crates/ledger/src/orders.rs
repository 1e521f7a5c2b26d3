//! Pending-order coordination
//!
//! Every traversal or structural change of the pending set happens while
//! holding the order lock. Traversal runs newest to oldest.

use log::{debug, info};
use std::sync::Arc;
use tally_core::Candle;
use tally_ports::PendingOrder;

use crate::manager::SimulatedAccountManager;

impl SimulatedAccountManager {
    /// Add an order to the pending set
    pub fn submit_order(&self, order: Arc<dyn PendingOrder>) {
        debug!("Order pending on {}", order.symbol());
        self.pending_orders.lock().push(order);
    }

    pub fn pending_order_count(&self) -> usize {
        self.pending_orders.lock().len()
    }

    /// Snapshot of the pending set, oldest first
    pub fn pending_orders(&self) -> Vec<Arc<dyn PendingOrder>> {
        self.pending_orders.lock().clone()
    }

    /// React to a new candle for `symbol`
    ///
    /// Only when the client account asks for a review are the pending orders
    /// of that symbol re-evaluated; filled or canceled orders are dropped
    /// before the lock is released. The lock is held while
    /// `ClientAccount::update_order` runs, so it must not call back into any
    /// of the order methods here. The guard drops on unwind, so a panicking
    /// client leaves the lock free.
    ///
    /// Returns whether a review happened.
    pub fn update_open_orders(&self, symbol: &str, candle: &Candle) -> bool {
        if !self.client.update_open_orders(symbol, candle) {
            return false;
        }

        let mut pending = self.pending_orders.lock();
        for order in pending.iter().rev() {
            if order.symbol() == symbol {
                self.client.update_order(order.as_ref());
            }
        }

        let before = pending.len();
        pending.retain(|order| !order.is_finalized());
        if pending.len() != before {
            debug!(
                "{}: {} orders finalized, {} pending",
                symbol,
                before - pending.len(),
                pending.len()
            );
        }
        true
    }

    /// Wind the account down once no more candles will arrive
    ///
    /// Cancels every pending order regardless of symbol, replays the order
    /// review with each trading manager's latest candle so cancellations
    /// settle, then drops all balances and pending orders.
    pub fn notify_simulation_end(&self) {
        let canceled = {
            let pending = self.pending_orders.lock();
            for order in pending.iter().rev() {
                order.cancel();
            }
            pending.len()
        };

        for manager in self.trading_managers() {
            if let Some(candle) = manager.latest_candle() {
                self.update_open_orders(manager.symbol(), &candle);
            }
        }

        self.balances.clear();
        self.pending_orders.lock().clear();
        info!("Simulation ended: {} pending orders canceled", canceled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountConfig;
    use chrono::Utc;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tally_core::{FeeSchedule, OrderStatus};
    use tally_ports::{ClientAccount, TradingManager};

    struct TestOrder {
        symbol: String,
        filled: AtomicBool,
        cancels: AtomicUsize,
    }

    impl TestOrder {
        fn new(symbol: &str) -> Arc<Self> {
            Arc::new(Self {
                symbol: symbol.to_string(),
                filled: AtomicBool::new(false),
                cancels: AtomicUsize::new(0),
            })
        }
    }

    impl PendingOrder for TestOrder {
        fn symbol(&self) -> &str {
            &self.symbol
        }

        fn status(&self) -> OrderStatus {
            if self.cancels.load(Ordering::SeqCst) > 0 {
                OrderStatus::Canceled
            } else if self.filled.load(Ordering::SeqCst) {
                OrderStatus::Filled
            } else {
                OrderStatus::New
            }
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records every order it is asked to update, in call order
    #[derive(Default)]
    struct RecordingClient {
        review: AtomicBool,
        updated: Mutex<Vec<String>>,
        resets: AtomicUsize,
    }

    impl ClientAccount for RecordingClient {
        fn update_open_orders(&self, _symbol: &str, _candle: &Candle) -> bool {
            self.review.load(Ordering::SeqCst)
        }

        fn update_order(&self, order: &dyn PendingOrder) {
            self.updated
                .lock()
                .push(format!("{}:{:?}", order.symbol(), order.status()));
        }

        fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Panics on its first order update, behaves afterwards
    #[derive(Default)]
    struct FailingClient {
        failed: AtomicBool,
        updates: AtomicUsize,
    }

    impl ClientAccount for FailingClient {
        fn update_open_orders(&self, _symbol: &str, _candle: &Candle) -> bool {
            true
        }

        fn update_order(&self, _order: &dyn PendingOrder) {
            if !self.failed.swap(true, Ordering::SeqCst) {
                panic!("fill model failure");
            }
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn reset(&self) {}
    }

    struct Feed {
        symbol: String,
        candle: Option<Candle>,
    }

    impl TradingManager for Feed {
        fn symbol(&self) -> &str {
            &self.symbol
        }

        fn latest_candle(&self) -> Option<Candle> {
            self.candle.clone()
        }
    }

    fn candle() -> Candle {
        let now = Utc::now();
        Candle::new(now, now, dec!(100), dec!(101), dec!(99), dec!(100), dec!(1))
    }

    fn manager(client: Arc<RecordingClient>) -> SimulatedAccountManager {
        let config = AccountConfig::new("USDT").with_assets(["BTC", "ETH"]);
        SimulatedAccountManager::new(
            client,
            Arc::new(config),
            Some(Arc::new(FeeSchedule::default())),
        )
        .unwrap()
    }

    #[test]
    fn test_no_review_when_client_declines() {
        let client = Arc::new(RecordingClient::default());
        let m = manager(client.clone());
        m.submit_order(TestOrder::new("BTCUSDT"));

        assert!(!m.update_open_orders("BTCUSDT", &candle()));
        assert!(client.updated.lock().is_empty());
        assert_eq!(m.pending_order_count(), 1);
    }

    #[test]
    fn test_review_only_touches_matching_symbol_newest_first() {
        let client = Arc::new(RecordingClient::default());
        client.review.store(true, Ordering::SeqCst);
        let m = manager(client.clone());

        let first = TestOrder::new("BTCUSDT");
        let other = TestOrder::new("ETHUSDT");
        let second = TestOrder::new("BTCUSDT");
        second.filled.store(true, Ordering::SeqCst);
        m.submit_order(first);
        m.submit_order(other);
        m.submit_order(second);

        assert!(m.update_open_orders("BTCUSDT", &candle()));

        assert_eq!(
            *client.updated.lock(),
            vec!["BTCUSDT:Filled".to_string(), "BTCUSDT:New".to_string()]
        );
    }

    #[test]
    fn test_review_prunes_finalized_orders() {
        let client = Arc::new(RecordingClient::default());
        client.review.store(true, Ordering::SeqCst);
        let m = manager(client.clone());

        let open = TestOrder::new("BTCUSDT");
        let filled = TestOrder::new("BTCUSDT");
        filled.filled.store(true, Ordering::SeqCst);
        m.submit_order(open.clone());
        m.submit_order(filled);

        m.update_open_orders("BTCUSDT", &candle());

        let pending = m.pending_orders();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status(), OrderStatus::New);
    }

    #[test]
    fn test_simulation_end_cancels_every_order_once() {
        let client = Arc::new(RecordingClient::default());
        client.review.store(true, Ordering::SeqCst);
        let m = manager(client.clone());
        m.set_amount("USDT", dec!(1000)).unwrap();

        let orders = [
            TestOrder::new("BTCUSDT"),
            TestOrder::new("BTCUSDT"),
            TestOrder::new("ETHUSDT"),
        ];
        for order in &orders {
            m.submit_order(order.clone());
        }
        m.register_trading_manager(Arc::new(Feed {
            symbol: "BTCUSDT".to_string(),
            candle: Some(candle()),
        }));
        m.register_trading_manager(Arc::new(Feed {
            symbol: "ETHUSDT".to_string(),
            candle: None,
        }));

        m.notify_simulation_end();

        for order in &orders {
            assert_eq!(order.cancels.load(Ordering::SeqCst), 1);
        }
        // Replay ran for the feed with a candle only, after cancellation
        assert_eq!(
            *client.updated.lock(),
            vec![
                "BTCUSDT:Canceled".to_string(),
                "BTCUSDT:Canceled".to_string()
            ]
        );
        assert_eq!(m.pending_order_count(), 0);
        assert!(m.balances().is_empty());
    }

    #[test]
    fn test_order_lock_released_when_client_panics() {
        let client = Arc::new(FailingClient::default());
        let m = SimulatedAccountManager::new(
            client.clone(),
            Arc::new(AccountConfig::new("USDT").with_assets(["BTC"])),
            Some(Arc::new(FeeSchedule::default())),
        )
        .unwrap();
        m.submit_order(TestOrder::new("BTCUSDT"));

        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.update_open_orders("BTCUSDT", &candle())
        }));
        assert!(first.is_err());

        assert!(m.update_open_orders("BTCUSDT", &candle()));
        assert_eq!(client.updates.load(Ordering::SeqCst), 1);
        assert_eq!(m.pending_order_count(), 1);
    }
}
