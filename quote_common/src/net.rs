//! Provider endpoint constants and small helpers used by the engine.
use std::time::Duration;

/// Default base URL of the quote/search provider.
pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";
/// Path of the single-symbol quote endpoint.
pub const QUOTE_PATH: &str = "quote";
/// Path of the free-text symbol search endpoint.
pub const SEARCH_PATH: &str = "symbol_search";
/// Upper bound for one provider call; past it the fetch counts as failed.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Width in pixels of one rendered marquee character cell.
pub const CELL_WIDTH: f64 = 8.0;

/// Joins a base URL and an endpoint path like "base/path".
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
