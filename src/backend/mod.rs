//! Fetch capability: the backend contract and its HTTP implementation.

pub mod contract;
pub mod http;

use crate::core::errors::Result;

pub use contract::{AggregateStats, FeedItem, FeedTimestamp, SimulationStatus, TaskType, Verdict};
pub use http::HttpBackend;

/// Run-state command accepted by the simulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    /// `POST /simulation/start`
    Start,
    /// `POST /simulation/stop`
    Stop,
}

impl SimulationCommand {
    /// Lower-case command name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    /// Endpoint path relative to the backend base address.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Start => "/simulation/start",
            Self::Stop => "/simulation/stop",
        }
    }
}

/// Everything the client needs from the backend.
///
/// Each call is one independent request. Implementations map every transport
/// problem to an error; callers decide whether to swallow it.
pub trait Backend {
    /// `GET /stats`
    fn fetch_stats(&self) -> Result<AggregateStats>;

    /// `GET /feed?limit=N`, most recent first.
    fn fetch_feed(&self, limit: usize) -> Result<Vec<FeedItem>>;

    /// `GET /simulation/status`
    fn fetch_status(&self) -> Result<SimulationStatus>;

    /// `POST /simulation/start` or `POST /simulation/stop`.
    fn send_command(&self, command: SimulationCommand) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn fetch_stats(&self) -> Result<AggregateStats> {
        (**self).fetch_stats()
    }

    fn fetch_feed(&self, limit: usize) -> Result<Vec<FeedItem>> {
        (**self).fetch_feed(limit)
    }

    fn fetch_status(&self) -> Result<SimulationStatus> {
        (**self).fetch_status()
    }

    fn send_command(&self, command: SimulationCommand) -> Result<()> {
        (**self).send_command(command)
    }
}
