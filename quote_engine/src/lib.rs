//! Quote synchronization and marquee timing engine.
//!
//! The engine keeps a small ordered set of quotes fresh and tells a
//! presentation layer what to draw. It wires together these building blocks:
//!
//! - `QuoteStore` — ordered quotes keyed by ticker; the only mutable collection.
//! - `FetchCoordinator` — fans one fetch thread out per ticker and joins them into a
//!   `RefreshOutcome`, forwarding every success as it lands.
//! - `RefreshScheduler` — fixed 30 s cadence plus on-demand refreshes, never two
//!   batches at once.
//! - `AnimationTimer` — loop duration and scroll offset from content width and speed.
//! - `QuoteEngine` — the single owner of all of the above, driven by an inbox of
//!   `Command`s and broadcasting `EngineEvent`s.
//!
//! Per-symbol failures never surface as errors: a ticker whose fetch failed
//! simply keeps its previous value until a later batch succeeds.
#![warn(missing_docs)]

pub mod engine;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod scheduler;
pub mod storage;

pub use engine::{EngineHandle, QuoteEngine};
pub use fetch::{FetchCoordinator, FetchFailure, RefreshOutcome};
pub use model::animation::{AnimationTimer, MarqueeFrame};
pub use model::command::{Command, EngineEvent};
pub use model::store::QuoteStore;
pub use provider::{QuoteProvider, SimulatedProvider, SymbolMatch, TwelveDataProvider};
pub use scheduler::{REFRESH_PERIOD, RefreshScheduler, RefreshState, Trigger};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
