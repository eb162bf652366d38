use crate::Quote;

/// Prices at or above this render without decimals.
pub const WHOLE_THRESHOLD: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Integer part only, truncated toward zero.
    Whole,
    /// Exactly two decimals.
    Cents,
}

impl Precision {
    pub fn for_price(price: f64) -> Self {
        if price < WHOLE_THRESHOLD {
            Precision::Cents
        } else {
            Precision::Whole
        }
    }
}

pub trait CurrencyFormatter {
    fn format_amount(&self, amount: f64, precision: Precision) -> String;
}

/// Philippine peso amounts with English digit grouping, e.g. `₱1,234,567`.
#[derive(Debug, Clone)]
pub struct PesoFormatter {
    symbol: String,
    separator: char,
}

impl Default for PesoFormatter {
    fn default() -> Self {
        Self {
            symbol: "₱".to_string(),
            separator: ',',
        }
    }
}

impl PesoFormatter {
    fn group(&self, digits: &str) -> String {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.separator);
            }
            out.push(c);
        }
        out
    }
}

impl CurrencyFormatter for PesoFormatter {
    fn format_amount(&self, amount: f64, precision: Precision) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };

        let body = match precision {
            Precision::Whole => self.group(&(amount.abs().trunc() as u64).to_string()),
            Precision::Cents => {
                let fixed = format!("{:.2}", amount.abs());
                let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
                format!("{}.{}", self.group(int), frac)
            }
        };

        format!("{sign}{}{body}", self.symbol)
    }
}

/// Price of `new` annotated with its move since `old`.
///
/// Unchanged prices are bare, rises are bold (`*…*`), drops are a code
/// span. The precision is picked from the new price and used for the
/// delta as well.
pub fn format_delta(
    new: &Quote,
    old: &Quote,
    formatter: &(impl CurrencyFormatter + ?Sized),
) -> String {
    let diff = new.ask_price - old.ask_price;
    let precision = Precision::for_price(new.ask_price);

    let price = formatter.format_amount(new.ask_price, precision);
    let delta = formatter.format_amount(diff.abs(), precision);

    if diff == 0.0 {
        price
    } else if diff > 0.0 {
        format!("*{price} (+{delta})*")
    } else {
        format!("`{price} (-{delta})`")
    }
}

/// One `label: delta` line per ranked quote that also exists in `old`.
pub fn construct_message(
    ranked: &[Quote],
    old: &[Quote],
    formatter: &(impl CurrencyFormatter + ?Sized),
) -> String {
    ranked
        .iter()
        .filter_map(|new| {
            old.iter()
                .find(|o| o.symbol == new.symbol)
                .map(|o| format!("{}: {}", new.label, format_delta(new, o, formatter)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Delta string for a single symbol, if both snapshots carry it.
pub fn construct_symbol_message(
    ranked: &[Quote],
    old: &[Quote],
    symbol: &str,
    formatter: &(impl CurrencyFormatter + ?Sized),
) -> Option<String> {
    let new = ranked.iter().find(|q| q.symbol == symbol)?;
    let old = old.iter().find(|q| q.symbol == symbol)?;
    Some(format_delta(new, old, formatter))
}
