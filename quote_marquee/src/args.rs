//! Command-line arguments for the quote marquee.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use quote_common::net::DEFAULT_BASE_URL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File holding the tracked quotes and the settings.
    #[clap(long, default_value = "quote_marquee.json")]
    pub storage: String,

    /// Provider API key. Without one, quotes are simulated offline.
    #[clap(long, env = "TWELVE_DATA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider base URL.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Text file with tickers used to seed an empty watch list.
    /// Tickers may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub tickers: Option<String>,

    /// Width of the marquee window in terminal columns.
    #[clap(long, default_value_t = 80)]
    pub columns: usize,

    /// Redraw interval in milliseconds.
    #[clap(long, default_value_t = 100)]
    pub frame_ms: u64,

    /// One-shot action instead of the live marquee.
    #[command(subcommand)]
    pub action: Option<Action>,
}

/// One-shot actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Search the provider for symbols and exit.
    Search {
        /// Free-text query, e.g. a company name.
        query: String,
    },
}
