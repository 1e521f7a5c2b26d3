use tally_core::Candle;

use crate::order::PendingOrder;

/// Port for the client account that owns fill and fee logic
///
/// Any balance effect of a fill happens inside these calls, outside the
/// ledger's own order lock bookkeeping.
pub trait ClientAccount: Send + Sync {
    /// Whether open orders on `symbol` need a review given the new candle
    fn update_open_orders(&self, symbol: &str, candle: &Candle) -> bool;

    /// Re-evaluate a single pending order
    ///
    /// Runs while the account manager holds its order lock, which is not
    /// re-entrant. Balance operations are fine here; calling back into the
    /// manager's order API (`submit_order`, `pending_orders`,
    /// `pending_order_count`, `update_open_orders`) deadlocks.
    fn update_order(&self, order: &dyn PendingOrder);

    /// Drop all internal state
    fn reset(&self);
}
