//! Polling cycle and the held snapshot.
//!
//! [`SyncController`] is driven cooperatively: the runtime loop calls
//! [`SyncController::poll`] between input events, and a refresh blocks that
//! one control flow until the backend answers or the request times out.
//!
//! Refreshes go through a ticket protocol so that in-flight behaviour is
//! explicit and testable:
//!
//! - a scheduled poll is skipped while any ticket is outstanding (skip-if-busy);
//! - every ticket carries a sequence number, and a completion older than the
//!   last applied one is discarded, so issue order wins;
//! - a completion for a ticket issued before the latest [`SyncController::stop`]
//!   is discarded.
//!
//! The snapshot is replaced by a single assignment of a fully built value and
//! is never partially updated.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::{AggregateStats, Backend, FeedItem, SimulationStatus};
use crate::core::config::SyncConfig;
use crate::core::errors::Result;
use crate::logger::{EventType, LogEntry, LogSink, Severity};

/// Last successfully fetched backend state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub stats: AggregateStats,
    /// Most recent first, exactly as the backend ordered it.
    pub feed: Vec<FeedItem>,
    pub status: SimulationStatus,
}

/// Handle for one refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
    epoch: u64,
}

impl RefreshTicket {
    /// Monotonic sequence number, starting at 1.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

/// What a refresh attempt did to the held snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All three fetches succeeded and the snapshot was replaced.
    Applied,
    /// A fetch failed; the previous snapshot is untouched.
    Failed,
    /// The fetch succeeded but the result was stale and dropped.
    Discarded,
}

/// Running totals, read by the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounters {
    pub applied: u64,
    pub failed: u64,
    pub discarded: u64,
    pub skipped_busy: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Stopped,
    Running { period: Duration, next_due: Instant },
}

/// Owns the polling schedule and the last good [`Snapshot`].
pub struct SyncController<B> {
    backend: B,
    log: Arc<dyn LogSink>,
    feed_limit: usize,
    snapshot: Option<Snapshot>,
    schedule: Schedule,
    next_seq: u64,
    last_applied_seq: u64,
    epoch: u64,
    outstanding: BTreeSet<u64>,
    counters: SyncCounters,
    last_success: Option<DateTime<Utc>>,
}

impl<B: Backend> SyncController<B> {
    pub fn new(backend: B, feed_limit: usize, log: Arc<dyn LogSink>) -> Self {
        Self {
            backend,
            log,
            feed_limit: feed_limit.max(1),
            snapshot: None,
            schedule: Schedule::Stopped,
            next_seq: 0,
            last_applied_seq: 0,
            epoch: 0,
            outstanding: BTreeSet::new(),
            counters: SyncCounters::default(),
            last_success: None,
        }
    }

    pub fn from_config(backend: B, config: &SyncConfig, log: Arc<dyn LogSink>) -> Self {
        Self::new(backend, config.feed_limit, log)
    }

    /// The held snapshot, or `None` before the first successful refresh.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Cached run-state; never triggers a request.
    pub fn last_known_status(&self) -> Option<SimulationStatus> {
        self.snapshot.as_ref().map(|s| s.status)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn counters(&self) -> SyncCounters {
        self.counters
    }

    /// Wall-clock time of the last applied refresh.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    pub fn feed_limit(&self) -> usize {
        self.feed_limit
    }

    pub fn is_running(&self) -> bool {
        matches!(self.schedule, Schedule::Running { .. })
    }

    /// Whether a refresh ticket is outstanding.
    pub fn is_busy(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Begin polling: refresh once now, then every `period`.
    pub fn start(&mut self, period: Duration, now: Instant) -> RefreshOutcome {
        self.log.record(
            &LogEntry::new(EventType::SyncStarted, Severity::Info)
                .with_details(format!("period_ms={}", period.as_millis())),
        );
        self.schedule = Schedule::Running {
            period,
            next_due: now + period,
        };
        self.refresh()
    }

    /// Cancel the schedule. Results of requests issued before this call are dropped.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.log
                .record(&LogEntry::new(EventType::SyncStopped, Severity::Info));
        }
        self.schedule = Schedule::Stopped;
        self.epoch += 1;
    }

    /// Timer hook: refresh if a scheduled poll is due.
    ///
    /// Returns `None` when nothing was due, the controller is stopped, or the
    /// poll was skipped because a refresh is still outstanding.
    pub fn poll(&mut self, now: Instant) -> Option<RefreshOutcome> {
        let Schedule::Running { period, next_due } = self.schedule else {
            return None;
        };
        if now < next_due {
            return None;
        }
        self.schedule = Schedule::Running {
            period,
            next_due: now + period,
        };
        if self.is_busy() {
            self.counters.skipped_busy += 1;
            return None;
        }
        Some(self.refresh())
    }

    /// Time left until the next scheduled poll, if running.
    pub fn until_next_poll(&self, now: Instant) -> Option<Duration> {
        match self.schedule {
            Schedule::Running { next_due, .. } => Some(next_due.saturating_duration_since(now)),
            Schedule::Stopped => None,
        }
    }

    /// Fetch stats, feed and run-state, and replace the snapshot if all succeed.
    pub fn refresh(&mut self) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let result = fetch_snapshot(&self.backend, self.feed_limit);
        self.complete_refresh(ticket, result)
    }

    /// Issue a ticket for a refresh whose requests the caller will perform.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_seq += 1;
        self.outstanding.insert(self.next_seq);
        RefreshTicket {
            seq: self.next_seq,
            epoch: self.epoch,
        }
    }

    /// Settle a ticket with the result of its requests.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Snapshot>,
    ) -> RefreshOutcome {
        self.outstanding.remove(&ticket.seq);

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.counters.failed += 1;
                self.log.record(
                    &LogEntry::new(EventType::RefreshFailed, Severity::Warning)
                        .with_error(&err)
                        .with_seq(ticket.seq),
                );
                return RefreshOutcome::Failed;
            }
        };

        let stale_reason = if ticket.epoch != self.epoch {
            Some("issued before stop")
        } else if ticket.seq < self.last_applied_seq {
            Some("superseded by a newer refresh")
        } else {
            None
        };
        if let Some(reason) = stale_reason {
            self.counters.discarded += 1;
            self.log.record(
                &LogEntry::new(EventType::RefreshDiscarded, Severity::Info)
                    .with_seq(ticket.seq)
                    .with_details(reason),
            );
            return RefreshOutcome::Discarded;
        }

        self.snapshot = Some(snapshot);
        self.last_applied_seq = ticket.seq;
        self.last_success = Some(Utc::now());
        self.counters.applied += 1;
        RefreshOutcome::Applied
    }
}

/// Perform the three independent fetches. Any failure fails the whole set.
pub fn fetch_snapshot<B: Backend + ?Sized>(backend: &B, feed_limit: usize) -> Result<Snapshot> {
    let stats = backend.fetch_stats()?;
    let mut feed = backend.fetch_feed(feed_limit)?;
    let status = backend.fetch_status()?;
    feed.truncate(feed_limit);
    Ok(Snapshot {
        stats,
        feed,
        status,
    })
}

// ──────────────────── tests ────────────────────
