use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{Error, Quote, Result, Snapshot};

pub const JSONBIN_URL: &str = "https://api.jsonbin.io/b";

/// The previous run's ranked selection, kept in a single jsonbin document.
#[derive(Clone)]
pub struct SnapshotStore {
    client: Client,
    base_api: String,
    bin_id: String,
}

#[derive(Serialize)]
struct StoredMarkets<'a> {
    markets: &'a [Quote],
}

impl SnapshotStore {
    pub fn new(
        base_api: impl Into<String>,
        bin_id: impl Into<String>,
        secret: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("secret-key", HeaderValue::from_str(secret)?);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::Store)?;

        Ok(Self {
            client,
            base_api: base_api.into(),
            bin_id: bin_id.into(),
        })
    }

    fn latest_url(&self) -> String {
        format!("{}/latest", self.bin_url())
    }

    fn bin_url(&self) -> String {
        format!("{}/{}", self.base_api.trim_end_matches('/'), self.bin_id)
    }

    /// Quotes persisted by the last successful run.
    #[instrument(name = "fetch_old", skip(self), fields(bin_id = %self.bin_id))]
    pub async fn fetch_old(&self) -> Result<Vec<Quote>> {
        let stored: Snapshot = self
            .client
            .get(self.latest_url())
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::Store)?
            .json()
            .await
            .map_err(Error::Store)?;

        debug!(markets = stored.markets.len(), "fetched old snapshot");
        Ok(stored.markets)
    }

    /// Replace the stored document with `markets`.
    #[instrument(
        name = "update_old",
        skip(self, markets),
        fields(bin_id = %self.bin_id, markets = markets.len())
    )]
    pub async fn update_old(&self, markets: &[Quote]) -> Result<()> {
        self.client
            .put(self.bin_url())
            .json(&StoredMarkets { markets })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::Store)?
            .bytes()
            .await
            .map_err(Error::Store)?;

        debug!("updated old snapshot");
        Ok(())
    }
}
