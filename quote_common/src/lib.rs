//!
//! Common types and utilities shared by the quote engine and the marquee.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `tickers` — ticker symbols and parsing helpers.
//! - `quote` — the `Quote` record and marquee text helpers.
//! - `settings` — the immutable `Settings` value and its normalizer.
//! - `net` — provider constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod settings;
pub mod tickers;

pub use error::{FailureKind, QuoteError};
pub use quote::{Quote, QuoteId};
pub use result::Result;
pub use settings::{DisplayStyle, RawSettings, Settings};
pub use tickers::Ticker;
