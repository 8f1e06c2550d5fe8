//! Quote Marquee — a terminal ticker that keeps a small watch list of quotes
//! fresh and draws them as a single stationary or scrolling line.
//!
//! The watch list and the settings persist in a JSON file between runs. Quotes
//! come from the Twelve Data HTTP API when an API key is given, otherwise from
//! an offline random-walk simulation. While running, commands typed on stdin
//! (`add AAPL`, `remove AAPL`, `speed 40`, `style scrolling`, `quit`, ...)
//! change the list and the settings.
//!
//! Usage example (CLI):
//! ```bash
//! quote_marquee --storage ./marquee.json --tickers ./tickers.txt
//! quote_marquee search apple
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `info` level); the
//! marquee line is redrawn in place on stdout.
#![warn(missing_docs)]
mod args;
mod console;
mod render;

use crate::args::{Action, Args};
use crate::console::{Console, USAGE};
use clap::Parser;
use log::{error, info, warn};
use quote_common::{QuoteError, Result};
use quote_common::net::FETCH_TIMEOUT;
use quote_common::tickers::{Ticker, TickerParser};
use quote_engine::{
    JsonFileStorage, QuoteEngine, QuoteProvider, SimulatedProvider, TwelveDataProvider,
};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    match args.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => {
            info!("Using quote provider at {}", args.base_url);
            let provider = TwelveDataProvider::with_base_url(key, &args.base_url, FETCH_TIMEOUT)?;
            launch(Arc::new(provider), &args)
        }
        None => {
            warn!("No API key given; quotes are simulated");
            let provider = SimulatedProvider::new()
                .with_failure_rate(0.05)
                .with_latency(Duration::from_millis(400));
            launch(Arc::new(provider), &args)
        }
    }
}

fn launch<P: QuoteProvider + 'static>(provider: Arc<P>, args: &Args) -> Result<()> {
    if let Some(Action::Search { query }) = &args.action {
        return search(provider.as_ref(), query);
    }

    let storage = JsonFileStorage::open(normalize_path(&args.storage))?;
    info!("Storage file: {}", storage.path().display());
    let mut engine = QuoteEngine::new(provider, Box::new(storage))?;

    if engine.quotes().is_empty() {
        if let Some(path) = &args.tickers {
            for ticker in read_tickers(&normalize_path(path))? {
                if let Err(e) = engine.track(ticker) {
                    warn!("Skipping seed ticker: {}", e);
                }
            }
        }
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        let handle = engine.handle();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down...");
            shutdown.store(true, Ordering::SeqCst);
            let _ = handle.shutdown();
        })
        .map_err(|e| QuoteError::Format(format!("Error setting Ctrl+C handler: {e}")))?;
    }

    let console = Console::new(engine.handle(), engine.settings());
    console.start(BufReader::new(io::stdin()), shutdown.clone());
    info!("{}", USAGE);

    let columns = args.columns;
    let mut stdout = io::stdout();
    let result = engine.run(shutdown, Duration::from_millis(args.frame_ms), |engine| {
        let line = render::render_line(engine.quotes(), engine.frame(), engine.is_loading(), columns);
        if let Err(e) = write!(stdout, "\r{line}").and_then(|_| stdout.flush()) {
            error!("Failed to draw marquee: {}", e);
        }
    });
    println!();
    result
}

fn search<P: QuoteProvider + ?Sized>(provider: &P, query: &str) -> Result<()> {
    let matches = provider.search_symbols(query)?;
    if matches.is_empty() {
        println!("No symbols match `{query}`");
    }
    for m in matches {
        println!("{:<12} {:<40} {}", m.symbol, m.instrument_name, m.country);
    }
    Ok(())
}

fn read_tickers(path: &Path) -> Result<Vec<Ticker>> {
    let file = File::open(path)?;
    let tickers = Ticker::parse_from_file(BufReader::new(file))?;
    info!("Seed tickers: {:?}", tickers);
    Ok(tickers)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
