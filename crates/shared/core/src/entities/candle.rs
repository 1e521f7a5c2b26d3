use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity, Timestamp};

/// A price sample for one symbol over one interval
///
/// The ledger never inspects a candle; it only hands it on to the client
/// account that decides whether pending orders need review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: Timestamp,
    pub close_time: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

impl Candle {
    pub fn new(
        open_time: Timestamp,
        close_time: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether `price` was traded through during this interval
    pub fn touches(&self, price: Price) -> bool {
        self.low <= price && price <= self.high
    }
}
