//! Offline provider producing synthetic quotes.
//!
//! Each fetch moves the ticker's price by a small random walk around its last
//! value. Prices are remembered per ticker so consecutive fetches form a
//! continuous series, and the percent change is measured against the first
//! price of the session. An optional failure rate makes some fetches fail,
//! which is handy for watching stale values survive a refresh.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use quote_common::{Quote, QuoteError, Result, Ticker};
use rand::Rng;

use super::{QuoteProvider, SymbolMatch};

const INITIAL_PRICE: f64 = 100.0;

/// Symbols offered by the offline search.
const CATALOGUE: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc"),
    ("MSFT", "Microsoft Corp"),
    ("GOOGL", "Alphabet Inc"),
    ("AMZN", "Amazon.com Inc"),
    ("NVDA", "NVIDIA Corp"),
    ("META", "Meta Platforms Inc"),
    ("TSLA", "Tesla Inc"),
    ("JPM", "JPMorgan Chase & Co"),
    ("V", "Visa Inc"),
    ("NFLX", "Netflix Inc"),
    ("INTC", "Intel Corp"),
    ("DIS", "Walt Disney Co"),
];

/// Random-walk quote source.
pub struct SimulatedProvider {
    /// Session opening and last price per ticker.
    prices: Mutex<HashMap<Ticker, (f64, f64)>>,
    failure_rate: f64,
    latency: Duration,
}

impl SimulatedProvider {
    /// Provider that always succeeds immediately.
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            failure_rate: 0.0,
            latency: Duration::ZERO,
        }
    }

    /// Fail roughly `rate` (0.0–1.0) of all fetches.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sleep up to `latency` per fetch to mimic network delay.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Next synthetic price: a uniform step in `[-1%, +1%)`, floored at 0.01.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        let new_price = current_price * (1.0 + change);
        new_price.max(0.01)
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for SimulatedProvider {
    fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote> {
        let (fail, delay) = {
            let mut rng = rand::rng();
            let fail = rng.random_bool(self.failure_rate);
            let delay = self.latency.mul_f64(rng.random_range(0.0..=1.0));
            (fail, delay)
        };
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if fail {
            return Err(QuoteError::Network(format!("{ticker}: simulated outage")));
        }

        let (open, price) = {
            let mut prices = self.prices.lock()?;
            let entry = prices
                .entry(ticker.clone())
                .or_insert((INITIAL_PRICE, INITIAL_PRICE));
            entry.1 = Self::next_price(entry.1);
            *entry
        };

        let name = CATALOGUE
            .iter()
            .find(|(symbol, _)| *symbol == ticker.as_str())
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| ticker.to_string());

        Ok(Quote::fetched(ticker.clone(), name, price, (price - open) / open))
    }

    fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        let needle = query.trim().to_ascii_lowercase();
        Ok(CATALOGUE
            .iter()
            .filter(|(symbol, name)| {
                !needle.is_empty()
                    && (symbol.to_ascii_lowercase().contains(&needle)
                        || name.to_ascii_lowercase().contains(&needle))
            })
            .map(|(symbol, name)| SymbolMatch {
                symbol: symbol.to_string(),
                instrument_name: name.to_string(),
                country: "United States".to_string(),
            })
            .collect())
    }
}
