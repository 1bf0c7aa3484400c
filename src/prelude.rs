//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use hec_overseer::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{HecError, Result};

// Backend
pub use crate::backend::{
    AggregateStats, Backend, FeedItem, HttpBackend, SimulationCommand, SimulationStatus,
    TaskType, Verdict,
};

// Sync
pub use crate::sync::{RefreshOutcome, SimulationToggle, Snapshot, SyncController, ToggleOutcome};

// Dashboard
pub use crate::dashboard::{DashboardView, FeedCard, RunState, Selection, StatCard, compose};

// Logger
pub use crate::logger::{EventType, JsonlSink, LogEntry, LogSink, MemorySink};
