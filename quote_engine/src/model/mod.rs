//! Domain models owned by the engine.
//!
//! - `store` — ordered `QuoteStore` keyed by ticker.
//! - `animation` — loop timing for the scrolling marquee.
//! - `command` — inbox `Command`s and broadcast `EngineEvent`s.

pub mod animation;
pub mod command;
pub mod store;
