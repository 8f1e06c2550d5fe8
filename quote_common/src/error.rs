//! Error types shared by the engine and the marquee front end.
//!
//! The `QuoteError` enum unifies the failure cases for I/O, provider transport,
//! payload decoding, channel communication and store bookkeeping, so every
//! crate in the workspace can propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Coarse classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeout, connectivity or transport error.
    Network,
    /// Missing or malformed fields in a provider payload.
    Decode,
}

/// Unified error type shared across the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Transport-level failure while talking to the quote provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered, but the payload lacked a required field or was malformed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Symbol text that cannot be a ticker.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// A ticker that is already tracked was added again.
    #[error("Ticker already tracked: {0}")]
    DuplicateTicker(String),

    /// Error while parsing a ticker file into `Ticker` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl QuoteError {
    /// Maps the error onto the fetch failure taxonomy.
    ///
    /// Anything that is not clearly a payload problem counts as a network failure.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            QuoteError::Decode(_) | QuoteError::SerdeJson(_) => FailureKind::Decode,
            _ => FailureKind::Network,
        }
    }
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
