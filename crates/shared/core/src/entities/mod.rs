mod balance;
mod candle;
mod fee;
mod order_status;

pub use balance::Balance;
pub use candle::Candle;
pub use fee::FeeSchedule;
pub use order_status::OrderStatus;
