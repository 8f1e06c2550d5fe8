//! The owning component.
//!
//! `QuoteEngine` holds the store, the settings, the animation timer and the
//! scheduler, and is the only code that mutates them. It lives on one thread
//! (the owner context). Other threads reach it through an `EngineHandle`,
//! fetch batches report back through the same inbox, and observers receive
//! `EngineEvent`s on channels handed out by `subscribe`.
//!
//! Concurrency and shutdown:
//! - Crossbeam `select!` multiplexes the inbox, the scheduler tick and the frame tick.
//! - Fetches run on their own threads and are never cancelled; a result that arrives
//!   for a ticker removed in the meantime is dropped by the store.
//! - The loop exits on `Command::Shutdown` or when the shared shutdown flag is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, select, unbounded};
use log::{debug, error, info, warn};
use quote_common::quote::content_width;
use quote_common::{Quote, QuoteError, QuoteId, RawSettings, Result, Settings, Ticker};

use crate::fetch::{FetchCoordinator, RefreshOutcome};
use crate::model::animation::{AnimationTimer, MarqueeFrame};
use crate::model::command::{Command, EngineEvent};
use crate::model::store::QuoteStore;
use crate::provider::{QuoteProvider, SymbolMatch};
use crate::scheduler::{RefreshScheduler, Trigger};
use crate::storage::{self, Storage};

/// Cloneable sender for driving an engine from other threads.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: Sender<Command>,
}

impl EngineHandle {
    /// Deliver a raw command to the owner.
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|e| QuoteError::ChannelSend(format!("engine inbox closed: {e}")))
    }

    /// Start tracking `ticker`.
    pub fn add_ticker(&self, ticker: Ticker) -> Result<()> {
        self.send(Command::AddTicker(ticker))
    }

    /// Stop tracking the entry with `id`.
    pub fn remove_ticker(&self, id: QuoteId) -> Result<()> {
        self.send(Command::RemoveTicker(id))
    }

    /// Stop tracking `ticker`.
    pub fn remove_symbol(&self, ticker: Ticker) -> Result<()> {
        self.send(Command::RemoveSymbol(ticker))
    }

    /// Replace the settings.
    pub fn set_settings(&self, raw: RawSettings) -> Result<()> {
        self.send(Command::SetSettings(raw))
    }

    /// Refresh now unless a batch is in flight.
    pub fn manual_refresh(&self) -> Result<()> {
        self.send(Command::ManualRefresh)
    }

    /// Ask the event loop to exit.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}

/// Owner of all quote, settings and animation state.
pub struct QuoteEngine<P> {
    store: QuoteStore,
    settings: Settings,
    animation: AnimationTimer,
    scheduler: RefreshScheduler,
    coordinator: FetchCoordinator<P>,
    storage: Box<dyn Storage>,
    inbox_tx: Sender<Command>,
    inbox_rx: Receiver<Command>,
    subscribers: Vec<Sender<EngineEvent>>,
}

impl<P: QuoteProvider + 'static> QuoteEngine<P> {
    /// Engine over `provider`, restoring quotes and settings from `storage`.
    pub fn new(provider: Arc<P>, storage: Box<dyn Storage>) -> Result<Self> {
        Self::with_parts(FetchCoordinator::new(provider), RefreshScheduler::new(), storage)
    }

    /// Engine from explicit parts.
    pub fn with_parts(
        coordinator: FetchCoordinator<P>,
        scheduler: RefreshScheduler,
        storage: Box<dyn Storage>,
    ) -> Result<Self> {
        let store = QuoteStore::restore(storage::load_quotes(storage.as_ref())?);
        let settings = storage::load_settings(storage.as_ref())?;
        info!(
            "Restored {} quotes; settings: interval {}s, speed {}px/s, {}",
            store.len(),
            settings.refresh_interval_display(),
            settings.scroll_speed(),
            settings.display_style()
        );

        let now = Instant::now();
        let speed = f64::from(settings.scroll_speed());
        let mut animation = AnimationTimer::new(speed, settings.display_style(), now);
        animation.update(content_width(store.as_slice()), speed, settings.display_style(), now);

        let (inbox_tx, inbox_rx) = unbounded();
        Ok(Self {
            store,
            settings,
            animation,
            scheduler,
            coordinator,
            storage,
            inbox_tx,
            inbox_rx,
            subscribers: Vec::new(),
        })
    }

    /// Handle for other threads.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.inbox_tx.clone(),
        }
    }

    /// Register an observer. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Ordered snapshot of the tracked quotes.
    pub fn current_quotes(&self) -> Vec<Quote> {
        self.store.snapshot()
    }

    /// Borrowing view of the tracked quotes.
    pub fn quotes(&self) -> &[Quote] {
        self.store.as_slice()
    }

    /// `true` from the start of a batch until its last fetch terminated.
    pub fn is_loading(&self) -> bool {
        self.scheduler.is_refreshing()
    }

    /// Accepted settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Scroll offset right now.
    pub fn current_animation_offset(&self) -> f64 {
        self.animation.offset_at(Instant::now())
    }

    /// Duration of one loop; `None` while the marquee is empty.
    pub fn loop_duration(&self) -> Option<Duration> {
        self.animation.loop_duration()
    }

    /// What to draw right now.
    pub fn frame(&self) -> MarqueeFrame {
        self.animation.frame_at(Instant::now())
    }

    /// Search the provider for symbols.
    pub fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        self.coordinator.provider().search_symbols(query)
    }

    /// Track `ticker` as a pending quote without refreshing.
    pub fn track(&mut self, ticker: Ticker) -> Result<QuoteId> {
        let quote = Quote::pending(ticker.clone(), ticker.as_str());
        let id = quote.id;
        self.store.add(quote)?;
        info!("Tracking {}", ticker);
        self.persist_quotes();
        self.content_changed();
        self.notify(EngineEvent::QuotesChanged);
        Ok(id)
    }

    /// Track `ticker` and refresh if no batch is in flight.
    pub fn add_ticker(&mut self, ticker: Ticker) -> Result<QuoteId> {
        let id = self.track(ticker)?;
        self.refresh(Trigger::TickerAdded);
        Ok(id)
    }

    /// Stop tracking the entry with `id`. No-op when absent.
    pub fn remove_ticker(&mut self, id: QuoteId) -> Option<Quote> {
        let removed = self.store.remove_by_id(id)?;
        info!("Stopped tracking {}", removed.ticker);
        self.persist_quotes();
        self.content_changed();
        self.notify(EngineEvent::QuotesChanged);
        Some(removed)
    }

    /// Stop tracking `ticker`. No-op when absent.
    pub fn remove_symbol(&mut self, ticker: &Ticker) -> Option<Quote> {
        let id = self.store.find_by_ticker(ticker)?.id;
        self.remove_ticker(id)
    }

    /// Normalize `raw`, replace the settings with it and persist them.
    pub fn set_settings(&mut self, raw: RawSettings) -> Settings {
        self.settings = Settings::normalize(raw);
        if let Err(e) = storage::save_settings(self.storage.as_mut(), &self.settings) {
            error!("Failed to persist settings: {}", e);
        }
        self.content_changed();
        self.notify(EngineEvent::SettingsChanged(self.settings));
        self.settings
    }

    /// Start a batch unless one is in flight. Returns whether a batch started.
    pub fn manual_refresh(&mut self) -> bool {
        self.refresh(Trigger::Manual)
    }

    /// Apply one inbox command. Returns `false` on `Shutdown`.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::AddTicker(ticker) => {
                if let Err(e) = self.add_ticker(ticker) {
                    warn!("Add rejected: {}", e);
                }
            }
            Command::RemoveTicker(id) => {
                if self.remove_ticker(id).is_none() {
                    debug!("Remove for unknown id {} ignored", id);
                }
            }
            Command::RemoveSymbol(ticker) => {
                if self.remove_symbol(&ticker).is_none() {
                    debug!("Remove for untracked {} ignored", ticker);
                }
            }
            Command::SetSettings(raw) => {
                self.set_settings(raw);
            }
            Command::ManualRefresh => {
                self.manual_refresh();
            }
            Command::Fetched(quote) => self.merge(quote),
            Command::BatchFinished(outcome) => self.finish_batch(outcome),
            Command::Shutdown => return false,
        }
        true
    }

    /// Wait up to `timeout` for one inbox command and apply it.
    ///
    /// Returns `Ok(false)` when the command was `Shutdown`.
    pub fn pump(&mut self, timeout: Duration) -> Result<bool> {
        match self.inbox_rx.recv_timeout(timeout) {
            Ok(command) => Ok(self.handle_command(command)),
            Err(RecvTimeoutError::Timeout) => Err(QuoteError::ChannelRecv(format!(
                "no engine command within {timeout:?}"
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(QuoteError::ChannelRecv("engine inbox disconnected".to_string()))
            }
        }
    }

    /// Event loop: refresh at launch and on every scheduler tick, apply inbox
    /// commands, and call `view` once per `frame_interval`.
    pub fn run<F>(mut self, shutdown: Arc<AtomicBool>, frame_interval: Duration, mut view: F) -> Result<()>
    where
        F: FnMut(&Self),
    {
        let inbox = self.inbox_rx.clone();
        let ticks = self.scheduler.ticks();
        let frames = crossbeam_channel::tick(frame_interval);

        self.refresh(Trigger::Launch);
        view(&self);

        while !shutdown.load(Ordering::Relaxed) {
            select! {
                recv(inbox) -> msg => match msg {
                    Ok(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    Err(e) => return Err(QuoteError::ChannelRecv(e.to_string())),
                },
                recv(ticks) -> _ => {
                    self.refresh(Trigger::Periodic);
                },
                recv(frames) -> _ => view(&self),
            }
        }
        info!("Engine loop stopping...");
        Ok(())
    }

    fn refresh(&mut self, trigger: Trigger) -> bool {
        if !self.scheduler.try_begin(trigger) {
            return false;
        }
        self.notify(EngineEvent::LoadingChanged(true));
        self.coordinator
            .spawn_batch(self.store.tickers(), self.inbox_tx.clone());
        true
    }

    fn merge(&mut self, quote: Quote) {
        let ticker = quote.ticker.clone();
        if self.store.update_by_ticker(&ticker, quote) {
            self.content_changed();
            self.notify(EngineEvent::QuotesChanged);
        } else {
            debug!("Dropping result for untracked {}", ticker);
        }
    }

    fn finish_batch(&mut self, outcome: RefreshOutcome) {
        self.scheduler.finish();
        self.persist_quotes();
        self.notify(EngineEvent::LoadingChanged(false));
        self.notify(EngineEvent::BatchFinished(outcome));
    }

    fn content_changed(&mut self) {
        let restarted = self.animation.update(
            content_width(self.store.as_slice()),
            f64::from(self.settings.scroll_speed()),
            self.settings.display_style(),
            Instant::now(),
        );
        if restarted {
            let loop_duration = self.animation.loop_duration();
            debug!(
                "Marquee loop restarted: {:.0}px at {:.0}px/s, {:?}",
                self.animation.content_width(),
                self.animation.speed(),
                loop_duration
            );
            self.notify(EngineEvent::AnimationRestarted { loop_duration });
        }
    }

    fn persist_quotes(&mut self) {
        if let Err(e) = storage::save_quotes(self.storage.as_mut(), self.store.as_slice()) {
            error!("Failed to persist quotes: {}", e);
        }
    }

    fn notify(&mut self, event: EngineEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
