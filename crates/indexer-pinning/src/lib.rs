pub mod client;
pub mod config;
pub mod metadata;

pub use client::PinataClient;
pub use config::PinningConfig;
pub use metadata::{BotAttributes, BotMetadata};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinningError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pinning API returned {status}: {body}")]
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, PinningError>;
