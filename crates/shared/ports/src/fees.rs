use rust_decimal::Decimal;
use tally_core::{FeeSchedule, Quantity};

/// Port for the fee model applied to simulated fills
pub trait TradingFees: Send + Sync {
    /// Fee owed on a fill of `notional`
    fn fee(&self, notional: Quantity, is_maker: bool) -> Decimal;

    /// What remains of `amount` once the fee on it is paid
    fn net_of_fees(&self, amount: Quantity, is_maker: bool) -> Quantity {
        amount - self.fee(amount, is_maker)
    }
}

impl TradingFees for FeeSchedule {
    fn fee(&self, notional: Quantity, is_maker: bool) -> Decimal {
        self.calculate_fee(notional, is_maker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_schedule_as_trading_fees() {
        let fees: &dyn TradingFees = &FeeSchedule::new(dec!(0.001), dec!(0.002));

        assert_eq!(fees.fee(dec!(1000), true), dec!(1));
        assert_eq!(fees.net_of_fees(dec!(1000), false), dec!(998));
    }
}
