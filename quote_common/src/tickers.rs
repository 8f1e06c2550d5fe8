//! Ticker symbols and helpers shared by the engine and the marquee.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::QuoteError;

/// Longest symbol accepted, exchange suffixes included (e.g. `BRK.B`, `EUR/USD`).
const MAX_TICKER_LEN: usize = 20;

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines; empty
    /// fragments are skipped. Returns an error if any symbol cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, QuoteError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError> {
        let mut tickers = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(QuoteError::Io)?;
            for fragment in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if fragment.is_empty() {
                    continue;
                }
                match fragment.parse::<Self>() {
                    Ok(ticker) => tickers.push(ticker),
                    Err(e) => return Err(QuoteError::ParseTickersFile(e.to_string())),
                }
            }
        }
        Ok(tickers)
    }
}

/// Upper-cased symbol identifying a tracked instrument; the store's key.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Symbol text, always upper-case.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = QuoteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let symbol = raw.trim().to_ascii_uppercase();
        if symbol.is_empty() || symbol.len() > MAX_TICKER_LEN {
            return Err(QuoteError::InvalidTicker(raw.to_string()));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | ':' | '-');
        if !symbol.chars().all(allowed) {
            return Err(QuoteError::InvalidTicker(raw.to_string()));
        }
        Ok(Ticker(symbol))
    }
}

impl TryFrom<String> for Ticker {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
