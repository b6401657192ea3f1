//! Expiry of cached career pages.
//!
//! The sweep itself ([`CleanupSweeper::sweep`]) takes the current time as a
//! parameter and knows nothing about scheduling. [`run_cleanup`] drives it from
//! any [`CleanupTrigger`]; [`IntervalTrigger`] is the tokio-timer one used by
//! the CLI.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::Result;
use crate::config::MAX_SCHEDULE_HOURS;
use crate::storage::CacheStore;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries looked at
    pub examined: usize,
    /// Entries deleted
    pub removed: usize,
    /// Entries kept
    pub retained: usize,
}

/// Deletes cache entries older than a time-to-live.
#[derive(Debug, Clone)]
pub struct CleanupSweeper {
    store: Arc<CacheStore>,
    ttl: Duration,
}

impl CleanupSweeper {
    /// Create a sweeper for `store` with the given `ttl`.
    pub const fn new(store: Arc<CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Configured time-to-live.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Remove every entry with `now - stored_at > ttl`.
    ///
    /// Entries that disappear while the sweep runs are counted as retained.
    pub fn sweep(&self, now: SystemTime) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        for entry in self.store.entries()? {
            report.examined += 1;
            if self.store.remove_if_expired(&entry.key, now, self.ttl)? {
                report.removed += 1;
            } else {
                report.retained += 1;
            }
        }
        info!(
            "Cache sweep: {} examined, {} removed, {} retained",
            report.examined, report.removed, report.retained
        );
        Ok(report)
    }
}

/// Source of "run the sweep now" signals.
#[async_trait]
pub trait CleanupTrigger: Send {
    /// Wait for the next tick. Returns `false` once the trigger is exhausted.
    async fn next_tick(&mut self) -> bool;
}

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(MAX_SCHEDULE_HOURS * 3600);

/// Fires at a fixed period, starting one period from now.
pub struct IntervalTrigger {
    interval: Interval,
}

impl IntervalTrigger {
    /// Create a trigger firing every `period`.
    ///
    /// The period is clamped to `[1ms, MAX_SCHEDULE_HOURS]`.
    pub fn new(period: Duration) -> Self {
        let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl CleanupTrigger for IntervalTrigger {
    async fn next_tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Run `sweeper` on every tick of `trigger` until the trigger is exhausted.
///
/// A failed sweep is logged and the loop continues. Returns the number of
/// sweeps that ran.
pub async fn run_cleanup<T: CleanupTrigger>(sweeper: &CleanupSweeper, mut trigger: T) -> usize {
    let mut runs = 0;
    while trigger.next_tick().await {
        runs += 1;
        if let Err(e) = sweeper.sweep(SystemTime::now()) {
            warn!("Cache sweep failed: {}", e);
        }
    }
    runs
}
