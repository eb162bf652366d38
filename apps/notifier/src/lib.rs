pub mod config;
pub mod error;
pub mod pipeline;
pub mod telegram;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunReport};
pub use telegram::TelegramClient;
