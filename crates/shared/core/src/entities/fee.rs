use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::Quantity;

/// Maker/taker fee rates charged on the notional of simulated fills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Rate for orders that add liquidity; negative for rebates
    pub maker_fee: Decimal,

    /// Rate for orders that remove liquidity
    pub taker_fee: Decimal,

    /// Minimum fee per fill (in the funds currency)
    #[serde(default)]
    pub min_fee: Decimal,

    /// Maximum fee per fill, None = uncapped
    #[serde(default)]
    pub max_fee: Option<Decimal>,
}

impl FeeSchedule {
    pub fn new(maker_fee: Decimal, taker_fee: Decimal) -> Self {
        Self {
            maker_fee,
            taker_fee,
            min_fee: Decimal::ZERO,
            max_fee: None,
        }
    }

    /// A schedule that never charges anything
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }

    pub fn with_min_fee(mut self, min_fee: Decimal) -> Self {
        self.min_fee = min_fee;
        self
    }

    pub fn with_max_fee(mut self, max_fee: Decimal) -> Self {
        self.max_fee = Some(max_fee);
        self
    }

    /// Fee owed on a fill of `notional`
    pub fn calculate_fee(&self, notional: Quantity, is_maker: bool) -> Decimal {
        let rate = if is_maker {
            self.maker_fee
        } else {
            self.taker_fee
        };
        let fee = notional * rate;

        // Rebates bypass min/max
        if fee < Decimal::ZERO {
            return fee;
        }
        let fee = fee.max(self.min_fee);
        match self.max_fee {
            Some(max) => fee.min(max),
            None => fee,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            maker_fee: Decimal::new(1, 3), // 0.1% maker
            taker_fee: Decimal::new(1, 3), // 0.1% taker
            min_fee: Decimal::ZERO,
            max_fee: None,
        }
    }
}
