use std::path::Path;

use market::{COINS_QUOTE_URL, JSONBIN_URL};
use serde::Deserialize;

use crate::{Error, Result, telegram::TELEGRAM_URL};

/// Runtime configuration, loaded once at startup and passed by reference.
///
/// Key names follow the deployed `config.json`, hence the renames.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub symbols: Vec<String>,

    #[serde(rename = "bot_id")]
    pub bot_token: String,

    #[serde(rename = "jbin_sk")]
    pub store_secret: String,

    #[serde(rename = "jbin_id")]
    pub store_id: String,

    #[serde(rename = "all_id")]
    pub all_chat_id: String,

    #[serde(rename = "btc_id")]
    pub single_chat_id: String,

    pub single_symbol: String,

    pub endpoints: Endpoints,

    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub quotes: String,
    pub store: String,
    pub telegram: String,
}

/// Cron mode. Without it the binary runs once and exits.
#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    pub cron: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Asia/Manila".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            bot_token: String::new(),
            store_secret: String::new(),
            store_id: String::new(),
            all_chat_id: String::new(),
            single_chat_id: String::new(),
            single_symbol: "BTC-PHP".to_string(),
            endpoints: Endpoints::default(),
            schedule: None,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            quotes: COINS_QUOTE_URL.to_string(),
            store: JSONBIN_URL.to_string(),
            telegram: TELEGRAM_URL.to_string(),
        }
    }
}

impl Config {
    /// Read `path` as JSON. An empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&raw).map_err(|source| Error::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}
