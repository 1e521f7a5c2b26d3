use tally_core::OrderStatus;

/// Port for an order waiting in the account's pending set
///
/// Orders are shared between the account and whoever placed them, so every
/// method takes `&self`; implementations keep their own interior state.
pub trait PendingOrder: Send + Sync {
    /// Trading pair the order was placed on
    fn symbol(&self) -> &str;

    /// Current lifecycle status
    fn status(&self) -> OrderStatus;

    /// Cancel whatever remains unfilled
    fn cancel(&self);

    /// Filled or canceled orders are dropped from the pending set
    fn is_finalized(&self) -> bool {
        self.status().is_terminal()
    }
}
