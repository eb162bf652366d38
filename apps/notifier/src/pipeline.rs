use market::{
    QuoteClient, SnapshotStore, filter_markets,
    format::{CurrencyFormatter, PesoFormatter, construct_message, construct_symbol_message},
};
use tracing::{info, instrument, warn};

use crate::{Config, Result, TelegramClient};

/// Messages produced by one run. `None` means nothing was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub all_message: Option<String>,
    pub single_message: Option<String>,
}

pub struct Pipeline<F = PesoFormatter> {
    quotes: QuoteClient,
    store: SnapshotStore,
    telegram: TelegramClient,
    formatter: F,
    symbols: Vec<String>,
    all_chat_id: String,
    single_chat_id: String,
    single_symbol: String,
}

impl Pipeline {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_formatter(config, PesoFormatter::default())
    }
}

impl<F: CurrencyFormatter> Pipeline<F> {
    pub fn with_formatter(config: &Config, formatter: F) -> Result<Self> {
        let endpoints = &config.endpoints;

        Ok(Self {
            quotes: QuoteClient::new(&endpoints.quotes),
            store: SnapshotStore::new(&endpoints.store, &config.store_id, &config.store_secret)?,
            telegram: TelegramClient::new(&endpoints.telegram, &config.bot_token),
            formatter,
            symbols: config.symbols.clone(),
            all_chat_id: config.all_chat_id.clone(),
            single_chat_id: config.single_chat_id.clone(),
            single_symbol: config.single_symbol.clone(),
        })
    }

    /// Fetch, rank, diff, notify, persist, notify again. Stops at the
    /// first error.
    ///
    /// The baseline is written after the all-markets message goes out, so
    /// a failed write leaves that message sent and the old baseline in
    /// place for the next run.
    #[instrument(name = "run", skip(self), fields(symbols = self.symbols.len()))]
    pub async fn run(&self) -> Result<RunReport> {
        let snapshot = self.quotes.fetch_snapshot().await?;
        let ranked = filter_markets(&snapshot, &self.symbols)?;
        info!(
            fetched = snapshot.markets.len(),
            tracked = ranked.len(),
            "ranked markets"
        );

        let old = self.store.fetch_old().await?;
        info!(baseline = old.len(), "loaded baseline");

        let message = construct_message(&ranked, &old, &self.formatter);
        let all_message = if message.is_empty() {
            warn!("no tracked symbol in baseline, skipping all-markets message");
            None
        } else {
            self.telegram
                .send_message(&self.all_chat_id, &message)
                .await?;
            info!(lines = message.lines().count(), "sent all-markets message");
            Some(message)
        };

        self.store.update_old(&ranked).await?;
        info!(markets = ranked.len(), "saved baseline");

        let single_message =
            construct_symbol_message(&ranked, &old, &self.single_symbol, &self.formatter);
        match &single_message {
            Some(message) => {
                self.telegram
                    .send_message(&self.single_chat_id, message)
                    .await?;
                info!(symbol = %self.single_symbol, "sent symbol message");
            }
            None => {
                warn!(symbol = %self.single_symbol, "symbol missing from snapshot or baseline");
            }
        }

        Ok(RunReport {
            all_message,
            single_message,
        })
    }
}
