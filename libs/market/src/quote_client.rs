use reqwest::Client;
use tracing::{debug, instrument};

use crate::{Error, Result, Snapshot};

pub const COINS_QUOTE_URL: &str = "https://quote.coins.ph/v2/markets?region=PH";

#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    url: String,
}

impl QuoteClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Current market snapshot, all symbols.
    #[instrument(name = "fetch_snapshot", skip(self), fields(url = %self.url))]
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let snapshot: Snapshot = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::Fetch)?
            .json()
            .await
            .map_err(Error::Fetch)?;

        debug!(markets = snapshot.markets.len(), "fetched snapshot");
        Ok(snapshot)
    }
}
