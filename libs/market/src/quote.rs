use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::{Error, Result};

//
// Match coins.ph market JSON
// https://quote.coins.ph/v2/markets?region=PH
//
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub markets: Vec<Quote>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,

    #[serde(rename = "product", default, deserialize_with = "null_as_default")]
    pub label: String,

    #[serde(rename = "ask", default, deserialize_with = "null_as_default")]
    pub ask_raw: String,

    /// Parsed from `ask_raw`. Absent on the quote API, always present once stored.
    #[serde(rename = "amt", default, deserialize_with = "null_as_default")]
    pub ask_price: f64,
}

// Upstream entries may omit or null out fields; only tracked symbols are
// ever validated.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        label: impl Into<String>,
        ask_raw: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
            ask_raw: ask_raw.into(),
            ask_price: 0.0,
        }
    }

    fn parse_ask(&self) -> Result<f64> {
        match self.ask_raw.parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(Error::Parse {
                symbol: self.symbol.clone(),
                raw: self.ask_raw.clone(),
            }),
        }
    }
}

impl From<Vec<Quote>> for Snapshot {
    fn from(markets: Vec<Quote>) -> Self {
        Self { markets }
    }
}

/// Keep the quotes whose symbol is tracked, highest ask first.
///
/// Tracked symbols missing from the snapshot are skipped. A single
/// unparsable ask price fails the whole selection.
pub fn filter_markets(snapshot: &Snapshot, symbols: &[String]) -> Result<Vec<Quote>> {
    let mut selected = Vec::with_capacity(symbols.len());

    for quote in &snapshot.markets {
        if !symbols.iter().any(|s| *s == quote.symbol) {
            continue;
        }

        let ask_price = quote.parse_ask()?;
        selected.push(Quote {
            ask_price,
            ..quote.clone()
        });
    }

    // stable: equal prices keep upstream order
    selected.sort_by(|a, b| b.ask_price.total_cmp(&a.ask_price));

    debug!(
        tracked = symbols.len(),
        selected = selected.len(),
        "filtered markets"
    );

    Ok(selected)
}
