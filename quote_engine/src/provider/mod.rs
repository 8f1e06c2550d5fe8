//! Quote and symbol-search providers.
//!
//! The engine talks to the outside world only through `QuoteProvider`. Two
//! implementations ship with the crate:
//! - `twelve_data` — HTTP provider with a bounded request timeout.
//! - `simulated` — offline random-walk provider for demos and development.

use quote_common::{Quote, Result, Ticker};
use serde::{Deserialize, Serialize};

pub mod simulated;
pub mod twelve_data;

pub use simulated::SimulatedProvider;
pub use twelve_data::TwelveDataProvider;

/// One result of a symbol search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    /// Ticker symbol as reported by the provider.
    pub symbol: String,
    /// Instrument display name.
    pub instrument_name: String,
    /// Listing country.
    pub country: String,
}

/// Source of quotes and symbol search results.
///
/// Implementations are called concurrently from fetch threads and must bound
/// every call by their own timeout.
pub trait QuoteProvider: Send + Sync {
    /// Fetches the current quote for `ticker`, stamped with the fetch time.
    fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote>;

    /// Free-text search for symbols.
    fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>>;
}
