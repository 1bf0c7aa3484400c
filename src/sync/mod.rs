//! Keeping the local snapshot in step with the backend.

#![allow(missing_docs)]

pub mod controller;
pub mod toggle;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{
    RefreshOutcome, RefreshTicket, Snapshot, SyncController, SyncCounters, fetch_snapshot,
};
pub use toggle::{SimulationToggle, ToggleOutcome};
