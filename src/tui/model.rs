//! Elm-style state model for the terminal dashboard.
//!
//! [`DashboardModel`] holds only view-local state: cursor, overlay flags,
//! terminal size. The snapshot belongs to the sync controller and the
//! selection to the selection controller; the model asks for changes to
//! those through [`DashboardCmd`] values.
//!
//! **Design invariant:** no I/O happens here.

use crossterm::event::KeyEvent;

/// View-local dashboard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardModel {
    /// Index of the highlighted feed row.
    pub cursor: usize,
    /// Number of feed rows in the current snapshot.
    pub feed_len: usize,
    /// Mirrors whether the selection controller holds an item.
    pub detail_open: bool,
    pub help_open: bool,
    /// Terminal dimensions (columns, rows).
    pub terminal_size: (u16, u16),
    /// Monotonic tick counter.
    pub tick: u64,
    pub quit: bool,
    /// Use colour when drawing.
    pub color: bool,
}

impl DashboardModel {
    #[must_use]
    pub const fn new(terminal_size: (u16, u16), color: bool) -> Self {
        Self {
            cursor: 0,
            feed_len: 0,
            detail_open: false,
            help_open: false,
            terminal_size,
            tick: 0,
            quit: false,
            color,
        }
    }

    /// Keep the cursor inside the feed after it shrinks.
    pub const fn clamp_cursor(&mut self) {
        if self.feed_len == 0 {
            self.cursor = 0;
        } else if self.cursor >= self.feed_len {
            self.cursor = self.feed_len - 1;
        }
    }
}

// ──────────────────── messages ────────────────────

/// Everything that can happen to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardMsg {
    /// Loop iteration; gives the sync controller a chance to poll.
    Tick,
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    /// A refresh settled, applied or not; `feed_len` is the length of the
    /// feed now held.
    Refreshed { feed_len: usize },
}

// ──────────────────── commands ────────────────────

/// Side-effects returned by [`super::update::update`] for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCmd {
    None,
    /// Let the sync controller run a due scheduled poll.
    PollSync,
    /// Refresh immediately, bypassing the schedule.
    Refresh,
    /// Flip the simulation run-state.
    ToggleSimulation,
    /// Select the feed row at this index.
    Select(usize),
    ClearSelection,
    Quit,
}
