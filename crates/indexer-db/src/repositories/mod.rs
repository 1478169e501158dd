mod bot;
mod owner;
mod sync_state;
mod trade;

pub use bot::BotRepository;
pub use owner::OwnerRepository;
pub use sync_state::SyncStateRepository;
pub use trade::TradeRepository;
