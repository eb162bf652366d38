mod error;
mod quote_client;
mod snapshot_store;

pub mod format;
pub mod quote;

pub use error::{Error, Result};
pub use quote::{Quote, Snapshot, filter_markets};
pub use quote_client::{COINS_QUOTE_URL, QuoteClient};
pub use snapshot_store::{JSONBIN_URL, SnapshotStore};
