//! Ordered collection of tracked quotes.
//!
//! Insertion order is the render order and depends only on the add/remove
//! history. Value refreshes replace entries in place. A refresh for a ticker
//! that is no longer tracked is dropped, so a symbol removed while its fetch was
//! in flight never comes back.
//!
//! The store is not synchronized; it is owned and mutated by the engine's
//! single owner context only.

use quote_common::{Quote, QuoteError, QuoteId, Result, Ticker};

/// Tracked quotes keyed by ticker, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from a persisted sequence.
    ///
    /// Later duplicates of a ticker are dropped so the key stays unique.
    pub fn restore(quotes: Vec<Quote>) -> Self {
        let mut store = Self::new();
        for quote in quotes {
            // duplicates can only come from a hand-edited file
            let _ = store.add(quote);
        }
        store
    }

    /// Append `quote`. A ticker that is already tracked is rejected and the store is left as is.
    pub fn add(&mut self, quote: Quote) -> Result<()> {
        if self.find_by_ticker(&quote.ticker).is_some() {
            return Err(QuoteError::DuplicateTicker(quote.ticker.to_string()));
        }
        self.quotes.push(quote);
        Ok(())
    }

    /// Remove the entry with `id`, returning it. No-op when absent.
    pub fn remove_by_id(&mut self, id: QuoteId) -> Option<Quote> {
        let index = self.quotes.iter().position(|q| q.id == id)?;
        Some(self.quotes.remove(index))
    }

    /// Replace the entry for `ticker` in place, keeping its position and id.
    ///
    /// Returns `false` and leaves the store untouched when the ticker is not tracked.
    pub fn update_by_ticker(&mut self, ticker: &Ticker, mut quote: Quote) -> bool {
        match self.quotes.iter_mut().find(|q| &q.ticker == ticker) {
            Some(slot) => {
                quote.id = slot.id;
                *slot = quote;
                true
            }
            None => false,
        }
    }

    /// Look up the entry for `ticker`.
    pub fn find_by_ticker(&self, ticker: &Ticker) -> Option<&Quote> {
        self.quotes.iter().find(|q| &q.ticker == ticker)
    }

    /// Full ordered sequence, for rendering or persistence.
    pub fn snapshot(&self) -> Vec<Quote> {
        self.quotes.clone()
    }

    /// Tracked tickers in order.
    pub fn tickers(&self) -> Vec<Ticker> {
        self.quotes.iter().map(|q| q.ticker.clone()).collect()
    }

    /// Borrowing view of the ordered sequence.
    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of tracked quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    fn fetched(symbol: &str, price: f64, change: f64) -> Quote {
        Quote::fetched(ticker(symbol), symbol, price, change)
    }

    fn symbols(store: &QuoteStore) -> Vec<String> {
        store.tickers().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = QuoteStore::new();
        for s in ["MSFT", "AAPL", "TSLA"] {
            store.add(Quote::pending(ticker(s), s)).unwrap();
        }
        assert_eq!(symbols(&store), vec!["MSFT", "AAPL", "TSLA"]);
    }

    #[test]
    fn duplicate_add_is_rejected_without_change() {
        let mut store = QuoteStore::new();
        store.add(fetched("AAPL", 100.0, 0.01)).unwrap();
        let before = store.clone();

        let err = store.add(fetched("aapl", 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, QuoteError::DuplicateTicker(ref t) if t == "AAPL"));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_by_id_and_absent_id() {
        let mut store = QuoteStore::new();
        let aapl = fetched("AAPL", 100.0, 0.01);
        let aapl_id = aapl.id;
        store.add(aapl).unwrap();
        store.add(fetched("MSFT", 200.0, -0.02)).unwrap();

        let removed = store.remove_by_id(aapl_id).unwrap();
        assert_eq!(removed.ticker.as_str(), "AAPL");
        assert_eq!(symbols(&store), vec!["MSFT"]);

        let before = store.clone();
        assert!(store.remove_by_id(aapl_id).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn update_replaces_in_place_and_keeps_id() {
        let mut store = QuoteStore::new();
        store.add(fetched("AAPL", 100.0, 0.01)).unwrap();
        store.add(fetched("MSFT", 200.0, -0.02)).unwrap();
        store.add(fetched("TSLA", 300.0, 0.0)).unwrap();
        let msft_id = store.find_by_ticker(&ticker("MSFT")).unwrap().id;

        let fresh = fetched("MSFT", 210.0, 0.05);
        assert!(store.update_by_ticker(&ticker("MSFT"), fresh.clone()));

        assert_eq!(symbols(&store), vec!["AAPL", "MSFT", "TSLA"]);
        let stored = store.find_by_ticker(&ticker("MSFT")).unwrap();
        assert_eq!(stored.id, msft_id);
        assert_eq!(stored.price, 210.0);
        assert_eq!(stored.last_updated, fresh.last_updated);
    }

    #[test]
    fn update_for_absent_ticker_is_a_noop() {
        let mut store = QuoteStore::new();
        store.add(fetched("AAPL", 100.0, 0.01)).unwrap();
        let before = store.snapshot();

        assert!(!store.update_by_ticker(&ticker("GOOG"), fetched("GOOG", 1.0, 0.0)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn order_is_independent_of_update_history() {
        let mut store = QuoteStore::new();
        for s in ["A", "B", "C", "D"] {
            store.add(Quote::pending(ticker(s), s)).unwrap();
        }
        for (round, s) in ["D", "A", "C", "B", "D", "B"].iter().enumerate() {
            store.update_by_ticker(&ticker(s), fetched(s, round as f64, 0.0));
        }
        assert_eq!(symbols(&store), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn restore_drops_later_duplicates() {
        let first = fetched("AAPL", 100.0, 0.01);
        let store = QuoteStore::restore(vec![
            first.clone(),
            fetched("MSFT", 200.0, 0.0),
            fetched("AAPL", 1.0, 0.0),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_ticker(&ticker("AAPL")), Some(&first));
    }
}
