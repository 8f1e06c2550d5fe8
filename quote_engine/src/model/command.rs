//! Messages exchanged with the engine's owner context.
//!
//! A `Command` is delivered to the owner's inbox, either by another thread
//! holding an `EngineHandle` (user actions) or by a fetch batch (results).
//! An `EngineEvent` is broadcast by the owner to every subscriber after its
//! state changed.
use std::time::Duration;

use quote_common::{Quote, QuoteId, RawSettings, Settings, Ticker};

use crate::fetch::RefreshOutcome;

/// Inbox message processed by the owner context.
#[derive(Debug, Clone)]
pub enum Command {
    /// Start tracking a symbol.
    AddTicker(Ticker),
    /// Stop tracking the entry with this id.
    RemoveTicker(QuoteId),
    /// Stop tracking the entry for this symbol.
    RemoveSymbol(Ticker),
    /// Replace the settings with the normalized form of these raw values.
    SetSettings(RawSettings),
    /// Refresh now, unless a batch is already in flight.
    ManualRefresh,
    /// One successful fetch, to be merged into the store.
    Fetched(Quote),
    /// Every fetch of the current batch has terminated.
    BatchFinished(RefreshOutcome),
    /// Leave the event loop.
    Shutdown,
}

/// Change notification broadcast to subscribers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The quote list changed (structure or values).
    QuotesChanged,
    /// A batch started (`true`) or finished (`false`).
    LoadingChanged(bool),
    /// New settings were accepted.
    SettingsChanged(Settings),
    /// The scrolling loop restarted; `None` while suspended.
    AnimationRestarted {
        /// Duration of one pass of the new loop.
        loop_duration: Option<Duration>,
    },
    /// Aggregate result of a finished batch.
    BatchFinished(RefreshOutcome),
}
