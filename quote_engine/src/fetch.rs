//! Batched concurrent fetching.
//!
//! A batch fans out one fetch thread per ticker and joins them through a
//! crossbeam channel, counting outstanding fetches down to zero. Successes are
//! forwarded to the owner as they arrive so the display can update
//! incrementally; failures are only recorded. The batch result is an aggregate
//! `RefreshOutcome`, never an error.
//!
//! Fan-out is unbounded: a batch over N tickers runs N threads at once. That is
//! fine for a marquee's handful of symbols but does not scale to large watch lists.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender, unbounded};
use log::{debug, error, info, warn};
use quote_common::net::FETCH_TIMEOUT;
use quote_common::{FailureKind, Quote, Result, Ticker};

use crate::model::command::Command;
use crate::provider::QuoteProvider;

/// Why one ticker produced no update.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    /// Ticker that failed.
    pub ticker: Ticker,
    /// Network or decode failure.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub reason: String,
}

/// Aggregate result of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshOutcome {
    /// Number of fetches launched.
    pub requested: usize,
    /// Tickers whose fresh quote was forwarded for merging.
    pub updated: Vec<Ticker>,
    /// Tickers that kept their previous value.
    pub failed: Vec<FetchFailure>,
}

/// Runs batches against a shared provider.
pub struct FetchCoordinator<P> {
    provider: Arc<P>,
    timeout: Duration,
}

impl<P> Clone for FetchCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }
}

impl<P: QuoteProvider + 'static> FetchCoordinator<P> {
    /// Coordinator bounding each fetch by the default timeout.
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_timeout(provider, FETCH_TIMEOUT)
    }

    /// Coordinator bounding each fetch by `timeout`.
    pub fn with_timeout(provider: Arc<P>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// The shared provider.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Fetch every ticker in `tickers` concurrently and wait for all of them.
    ///
    /// Each success is sent as `Command::Fetched` on `merges` the moment it
    /// arrives. Returns once every fetch has either reported or outlived the
    /// timeout; fetches still running then are recorded as failures and their
    /// late results are dropped.
    pub fn refresh_all(&self, tickers: Vec<Ticker>, merges: &Sender<Command>) -> RefreshOutcome {
        let mut outcome = RefreshOutcome {
            requested: tickers.len(),
            ..RefreshOutcome::default()
        };
        let (result_tx, result_rx) = unbounded::<(Ticker, Result<Quote>)>();

        for ticker in &tickers {
            let provider = Arc::clone(&self.provider);
            let tx = result_tx.clone();
            let ticker = ticker.clone();
            thread::spawn(move || {
                let result = provider.fetch_quote(&ticker);
                // receiver is gone once the batch timed out
                let _ = tx.send((ticker, result));
            });
        }
        drop(result_tx);

        let deadline = Instant::now() + self.timeout;
        let mut pending = tickers;

        while !pending.is_empty() {
            match result_rx.recv_deadline(deadline) {
                Ok((ticker, result)) => {
                    if let Some(index) = pending.iter().position(|t| t == &ticker) {
                        pending.swap_remove(index);
                    }
                    match result {
                        Ok(quote) => {
                            debug!("Fetched {}: {}", ticker, quote.label());
                            if let Err(e) = merges.send(Command::Fetched(quote)) {
                                error!("Failed to forward quote for {}: {}", ticker, e);
                            }
                            outcome.updated.push(ticker);
                        }
                        Err(e) => {
                            warn!("Fetch for {} failed: {}", ticker, e);
                            outcome.failed.push(FetchFailure {
                                ticker,
                                kind: e.failure_kind(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    error!("Fetch threads exited without reporting: {:?}", pending);
                    break;
                }
            }
        }

        for ticker in pending {
            warn!("Fetch for {} timed out after {:?}", ticker, self.timeout);
            outcome.failed.push(FetchFailure {
                ticker,
                kind: FailureKind::Network,
                reason: format!("timed out after {:?}", self.timeout),
            });
        }
        outcome
    }

    /// Run `refresh_all` on a background thread, then send `Command::BatchFinished`.
    ///
    /// Merges and the final outcome travel on the same channel from the same
    /// thread, so every `Fetched` precedes `BatchFinished`.
    pub fn spawn_batch(&self, tickers: Vec<Ticker>, inbox: Sender<Command>) -> JoinHandle<()> {
        let coordinator = self.clone();
        thread::spawn(move || {
            let outcome = coordinator.refresh_all(tickers, &inbox);
            info!(
                "Batch finished: {} requested, {} updated, {} failed",
                outcome.requested,
                outcome.updated.len(),
                outcome.failed.len()
            );
            if let Err(e) = inbox.send(Command::BatchFinished(outcome)) {
                error!("Failed to report batch outcome: {}", e);
            }
        })
    }
}
