//! Quote record and marquee text helpers.
//!
//! A `Quote` is the last known value of one tracked ticker: its display name,
//! price, fractional percent change and the time of the last successful fetch.
//! A quote that has never been fetched carries no timestamp and renders as
//! "pending".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::net::CELL_WIDTH;
use crate::tickers::Ticker;

/// Stable identity of a store entry, handed to the presentation layer for removal.
pub type QuoteId = Uuid;

/// Separator placed between quotes on the marquee line.
pub const MARQUEE_SEPARATOR: &str = "   •   ";

/// Market quote for a single ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Store identity; survives value refreshes.
    pub id: QuoteId,
    /// Symbol identifier; the store key.
    pub ticker: Ticker,
    /// Instrument display name.
    pub name: String,
    /// Last price.
    pub price: f64,
    /// Change in fractional form, `0.0234` meaning +2.34%.
    pub percent_change: f64,
    /// Time of the last successful fetch; `None` while pending.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Quote {
    /// Creates a never-fetched entry for `ticker`.
    pub fn pending(ticker: Ticker, name: impl Into<String>) -> Self {
        Quote {
            id: Uuid::new_v4(),
            ticker,
            name: name.into(),
            price: 0.0,
            percent_change: 0.0,
            last_updated: None,
        }
    }

    /// Creates a freshly fetched quote stamped with the current time.
    pub fn fetched(ticker: Ticker, name: impl Into<String>, price: f64, percent_change: f64) -> Self {
        Quote {
            id: Uuid::new_v4(),
            ticker,
            name: name.into(),
            price,
            percent_change,
            last_updated: Some(Utc::now()),
        }
    }

    /// `true` until the first successful fetch.
    pub fn is_pending(&self) -> bool {
        self.last_updated.is_none()
    }

    /// Single marquee entry, e.g. `AAPL 105.00 ▲ +2.00%`.
    pub fn label(&self) -> String {
        if self.is_pending() {
            return format!("{} pending", self.ticker);
        }
        let arrow = if self.percent_change >= 0.0 { '▲' } else { '▼' };
        format!(
            "{} {:.2} {} {:+.2}%",
            self.ticker,
            self.price,
            arrow,
            self.percent_change * 100.0
        )
    }
}

/// Full marquee text for `quotes` in store order.
pub fn marquee_text(quotes: &[Quote]) -> String {
    quotes
        .iter()
        .map(Quote::label)
        .collect::<Vec<_>>()
        .join(MARQUEE_SEPARATOR)
}

/// Rendered width of the marquee text in pixels; zero for an empty list.
pub fn content_width(quotes: &[Quote]) -> f64 {
    if quotes.is_empty() {
        return 0.0;
    }
    let text = marquee_text(quotes);
    // one loop also scrolls past the separator leading into the repeat
    let cells = text.chars().count() + MARQUEE_SEPARATOR.chars().count();
    cells as f64 * CELL_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    #[test]
    fn pending_quote_has_no_timestamp() {
        let quote = Quote::pending(ticker("AAPL"), "AAPL");
        assert!(quote.is_pending());
        assert_eq!(quote.label(), "AAPL pending");
    }

    #[test]
    fn fetched_quote_renders_percent() {
        let quote = Quote::fetched(ticker("AAPL"), "Apple Inc", 105.0, 0.02);
        assert!(!quote.is_pending());
        assert_eq!(quote.label(), "AAPL 105.00 ▲ +2.00%");

        let down = Quote::fetched(ticker("MSFT"), "Microsoft", 200.0, -0.0234);
        assert_eq!(down.label(), "MSFT 200.00 ▼ -2.34%");
    }

    #[test]
    fn equality_includes_timestamp() {
        let a = Quote::fetched(ticker("AAPL"), "Apple Inc", 105.0, 0.02);
        let mut b = a.clone();
        assert_eq!(a, b);
        b.last_updated = None;
        assert_ne!(a, b);
    }

    #[test]
    fn empty_list_has_zero_width() {
        assert_eq!(content_width(&[]), 0.0);
        assert_eq!(marquee_text(&[]), "");
    }

    #[test]
    fn width_counts_cells() {
        let quotes = vec![Quote::pending(ticker("AAPL"), "AAPL")];
        let cells = "AAPL pending".len() + MARQUEE_SEPARATOR.chars().count();
        assert_eq!(content_width(&quotes), cells as f64 * CELL_WIDTH);
    }
}
