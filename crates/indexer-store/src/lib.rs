mod bots;
mod owners;
mod store;
mod sync_state;
mod trades;

pub use bots::BotStore;
pub use owners::OwnerStore;
pub use store::IndexerStore;
pub use sync_state::{SyncMode, SyncState, SyncStats};
pub use trades::TradeStore;
