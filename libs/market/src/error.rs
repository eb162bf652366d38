use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Quote API unreachable, non-success status, or body not a snapshot.
    #[error("failed to fetch market quotes")]
    Fetch(#[source] reqwest::Error),

    /// An ask price that is not finite decimal text.
    #[error("invalid ask price {raw:?} for {symbol}")]
    Parse { symbol: String, raw: String },

    /// Any failure reading or replacing the stored baseline.
    #[error("snapshot store request failed")]
    Store(#[source] reqwest::Error),

    #[error("store secret key is not a valid header value")]
    InvalidSecret(#[from] InvalidHeaderValue),
}
