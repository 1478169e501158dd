mod bot_deployed;
mod trade_executed;

pub use bot_deployed::{BotDeployedHandler, Deployment};
pub use trade_executed::{ExecutedTrade, TradeExecutedHandler};
