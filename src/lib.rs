#![forbid(unsafe_code)]

//! HEC Overseer — live terminal dashboard for a proof-of-labor economic
//! simulation.
//!
//! The client polls three backend endpoints (aggregate stats, the recent
//! verification feed, and the simulation run-state), keeps the latest complete
//! snapshot, and projects it into a display model:
//! 1. **Sync** — periodic all-or-nothing refresh with stale-response discard
//! 2. **Dashboard** — pure projection of a snapshot into stat cards and feed cards
//! 3. **TUI** — crossterm front-end with selection overlay and pause/resume
//!
//! # Library usage
//!
//! ```rust,no_run
//! use hec_overseer::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use hec_overseer::core::config::Config;
//! use hec_overseer::sync::{SyncController, SimulationToggle};
//! ```

pub mod prelude;

pub mod backend;
pub mod core;
pub mod dashboard;
pub mod logger;
pub mod sync;
#[cfg(feature = "tui")]
pub mod tui;
