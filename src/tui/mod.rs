//! Terminal dashboard: model/update/render seams plus the runtime loop.

#![allow(missing_docs)]

pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod update;

pub use runtime::{DashboardRuntimeConfig, DashboardSession, run_dashboard};

#[cfg(test)]
mod test_properties;
