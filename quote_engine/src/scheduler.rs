//! Refresh cadence and batch exclusion.
//!
//! The scheduler is a two-state machine: `Idle` or `Refreshing`. Any trigger
//! moves it to `Refreshing` when idle and is ignored otherwise, so two batches
//! never overlap on the same store. The outcome of the running batch moves it
//! back to `Idle`.
//!
//! The periodic cadence is fixed at `REFRESH_PERIOD`. The refresh interval a
//! user picks in the settings is shown to them but never consulted here.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info};

/// Fixed period between scheduled batches.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(30);

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No batch in flight.
    Idle,
    /// A batch is in flight.
    Refreshing,
}

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Application start.
    Launch,
    /// Scheduler tick.
    Periodic,
    /// User asked for it.
    Manual,
    /// A new ticker is waiting for its first value.
    TickerAdded,
}

/// Decides when a batch may start.
#[derive(Debug)]
pub struct RefreshScheduler {
    state: RefreshState,
    period: Duration,
    started_at: Option<Instant>,
    batches_started: u64,
    triggers_skipped: u64,
}

impl RefreshScheduler {
    /// Scheduler with the fixed `REFRESH_PERIOD`.
    pub fn new() -> Self {
        Self::with_period(REFRESH_PERIOD)
    }

    /// Scheduler ticking every `period`.
    pub fn with_period(period: Duration) -> Self {
        Self {
            state: RefreshState::Idle,
            period,
            started_at: None,
            batches_started: 0,
            triggers_skipped: 0,
        }
    }

    /// Channel that fires once per period.
    pub fn ticks(&self) -> Receiver<Instant> {
        crossbeam_channel::tick(self.period)
    }

    /// Move `Idle -> Refreshing`. Returns `false` and changes nothing while a batch is in flight.
    pub fn try_begin(&mut self, trigger: Trigger) -> bool {
        if self.state == RefreshState::Refreshing {
            self.triggers_skipped += 1;
            debug!("{:?} refresh ignored: a batch is already in flight", trigger);
            return false;
        }
        self.state = RefreshState::Refreshing;
        self.started_at = Some(Instant::now());
        self.batches_started += 1;
        info!("Batch #{} started ({:?})", self.batches_started, trigger);
        true
    }

    /// Move back to `Idle` once the running batch reported.
    pub fn finish(&mut self) {
        if let Some(started) = self.started_at.take() {
            debug!("Batch #{} took {:?}", self.batches_started, started.elapsed());
        }
        self.state = RefreshState::Idle;
    }

    /// Current state.
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// `true` while a batch is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Batches started so far.
    pub fn batches_started(&self) -> u64 {
        self.batches_started
    }

    /// Triggers dropped because a batch was in flight.
    pub fn triggers_skipped(&self) -> u64 {
        self.triggers_skipped
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}
