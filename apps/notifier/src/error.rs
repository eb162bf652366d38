use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open configuration file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot load configuration file {}", path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown timezone {0:?}")]
    InvalidTimezone(String),

    #[error("failed to send message to chat {chat_id}")]
    Notify {
        chat_id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Market(#[from] market::Error),
}
