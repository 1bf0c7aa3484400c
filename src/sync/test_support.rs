//! Scripted in-memory backend shared by unit tests.

use std::cell::{Cell, RefCell};

use crate::backend::{
    AggregateStats, Backend, FeedItem, FeedTimestamp, SimulationCommand, SimulationStatus,
    TaskType, Verdict,
};
use crate::core::errors::{HecError, Result};
use crate::sync::Snapshot;

pub fn feed_item(id: &str, task_type: TaskType, hours: f64, verdict: Verdict) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        task_type,
        time: FeedTimestamp::parse("2025-03-01T12:30:15Z"),
        worker: format!("worker-{id}"),
        hours,
        verdict,
    }
}

/// Backend whose answers are set by the test and whose calls are counted.
pub struct ScriptedBackend {
    stats: Cell<AggregateStats>,
    feed: RefCell<Vec<FeedItem>>,
    status: Cell<SimulationStatus>,
    fail_once: RefCell<Vec<&'static str>>,
    reject_commands: Cell<bool>,
    honour_limit: Cell<bool>,
    stats_calls: Cell<usize>,
    last_feed_limit: Cell<Option<usize>>,
    commands: RefCell<Vec<SimulationCommand>>,
}

impl ScriptedBackend {
    /// Backend with a small, valid data set and the given run-state.
    pub fn healthy(active: bool) -> Self {
        Self {
            stats: Cell::new(AggregateStats {
                total_users: 1_234,
                total_minted: 340.5,
                total_tasks: 89,
            }),
            feed: RefCell::new(vec![
                feed_item("a", TaskType::Coding, 4.0, Verdict::Approved),
                feed_item("b", TaskType::Gardening, 2.5, Verdict::Rejected),
            ]),
            status: Cell::new(SimulationStatus { active }),
            fail_once: RefCell::new(Vec::new()),
            reject_commands: Cell::new(false),
            honour_limit: Cell::new(true),
            stats_calls: Cell::new(0),
            last_feed_limit: Cell::new(None),
            commands: RefCell::new(Vec::new()),
        }
    }

    /// Make the next call to `stats`, `feed`, `status` or `command` fail.
    pub fn fail_next(&self, which: &'static str) {
        self.fail_once.borrow_mut().push(which);
    }

    pub fn reject_commands(&self, reject: bool) {
        self.reject_commands.set(reject);
    }

    /// Return the whole feed regardless of the requested limit.
    pub fn ignore_limit(&self) {
        self.honour_limit.set(false);
    }

    pub fn set_stats(&self, stats: AggregateStats) {
        self.stats.set(stats);
    }

    pub fn set_feed(&self, feed: Vec<FeedItem>) {
        *self.feed.borrow_mut() = feed;
    }

    pub fn set_active(&self, active: bool) {
        self.status.set(SimulationStatus { active });
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.get()
    }

    pub fn last_feed_limit(&self) -> Option<usize> {
        self.last_feed_limit.get()
    }

    pub fn commands(&self) -> Vec<SimulationCommand> {
        self.commands.borrow().clone()
    }

    fn take_failure(&self, which: &str) -> Result<()> {
        let mut pending = self.fail_once.borrow_mut();
        if let Some(pos) = pending.iter().position(|w| *w == which) {
            pending.remove(pos);
            return Err(HecError::Network {
                endpoint: format!("scripted://{which}"),
                details: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl Backend for ScriptedBackend {
    fn fetch_stats(&self) -> Result<AggregateStats> {
        self.stats_calls.set(self.stats_calls.get() + 1);
        self.take_failure("stats")?;
        Ok(self.stats.get())
    }

    fn fetch_feed(&self, limit: usize) -> Result<Vec<FeedItem>> {
        self.last_feed_limit.set(Some(limit));
        self.take_failure("feed")?;
        let feed = self.feed.borrow();
        let take = if self.honour_limit.get() {
            limit
        } else {
            feed.len()
        };
        Ok(feed.iter().take(take).cloned().collect())
    }

    fn fetch_status(&self) -> Result<SimulationStatus> {
        self.take_failure("status")?;
        Ok(self.status.get())
    }

    fn send_command(&self, command: SimulationCommand) -> Result<()> {
        self.commands.borrow_mut().push(command);
        if self.reject_commands.get() {
            return Err(HecError::Command {
                command: command.as_str(),
                details: "HTTP 500".to_string(),
            });
        }
        self.take_failure("command")?;
        self.status.set(SimulationStatus {
            active: command == SimulationCommand::Start,
        });
        Ok(())
    }
}

/// The snapshot a refresh against `backend` would produce right now.
pub fn snapshot_of(backend: &ScriptedBackend) -> Snapshot {
    Snapshot {
        stats: backend.stats.get(),
        feed: backend.feed.borrow().clone(),
        status: backend.status.get(),
    }
}
