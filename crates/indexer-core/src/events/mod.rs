pub mod bot_factory;
pub mod trading_bot;

pub use bot_factory::*;
pub use trading_bot::*;
