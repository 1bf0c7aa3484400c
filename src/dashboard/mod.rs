//! Presentation: pure derivation of everything the operator sees.

#![allow(missing_docs)]

pub mod compose;
pub mod feed;
pub mod format;
pub mod selection;
pub mod stats;

pub use compose::{DashboardView, DetailOverlay, Header, RunState, compose};
pub use feed::{EconomicImpact, FeedCard, Tone, economic_impact, project};
pub use selection::{Selection, SelectionController};
pub use stats::{StatCard, stat_cards};
