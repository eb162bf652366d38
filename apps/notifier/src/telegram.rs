use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{Error, Result};

pub const TELEGRAM_URL: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_api: String,
    bot_token: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

impl TelegramClient {
    pub fn new(base_api: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_api: base_api.into(),
            bot_token: bot_token.into(),
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_api.trim_end_matches('/'),
            self.bot_token
        )
    }

    /// Post `text` as markdown to `chat_id`.
    #[instrument(
        name = "send_message",
        skip(self, text),
        fields(chars = text.chars().count())
    )]
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "markdown",
        };

        let notify = |source: reqwest::Error| Error::Notify {
            chat_id: chat_id.to_string(),
            source,
        };

        self.client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(notify)?
            .bytes()
            .await
            .map_err(notify)?;

        debug!("message sent");
        Ok(())
    }
}
