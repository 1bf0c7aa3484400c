//! Start/stop control of the remote simulation.

use std::sync::Arc;

use super::controller::{RefreshOutcome, SyncController};
use crate::backend::{Backend, SimulationCommand};
use crate::logger::{EventType, LogEntry, LogSink, Severity};

/// Result of a toggle or explicit command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A command was sent; `accepted` is false when the backend refused it.
    Issued {
        command: SimulationCommand,
        accepted: bool,
        refresh: RefreshOutcome,
    },
    /// No run-state was known yet, so only a refresh was performed.
    Skipped { refresh: RefreshOutcome },
}

impl ToggleOutcome {
    /// The refresh that followed the command.
    #[must_use]
    pub const fn refresh(self) -> RefreshOutcome {
        match self {
            Self::Issued { refresh, .. } | Self::Skipped { refresh } => refresh,
        }
    }
}

/// Flips the simulation run-state based on the last fetched status.
pub struct SimulationToggle {
    log: Arc<dyn LogSink>,
}

impl SimulationToggle {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self { log }
    }

    /// Stop if the cached status is active, start otherwise.
    ///
    /// The decision uses the snapshot held by `sync`; no extra status request
    /// is made. Before the first snapshot nothing is sent.
    pub fn toggle<B: Backend>(&self, sync: &mut SyncController<B>) -> ToggleOutcome {
        let Some(status) = sync.last_known_status() else {
            self.log.record(
                &LogEntry::new(EventType::CommandSkipped, Severity::Info)
                    .with_details("run-state unknown until the first refresh"),
            );
            return ToggleOutcome::Skipped {
                refresh: sync.refresh(),
            };
        };
        let command = if status.active {
            SimulationCommand::Stop
        } else {
            SimulationCommand::Start
        };
        self.issue(sync, command)
    }

    /// Send `command`, then refresh regardless of how the command went.
    pub fn issue<B: Backend>(
        &self,
        sync: &mut SyncController<B>,
        command: SimulationCommand,
    ) -> ToggleOutcome {
        let accepted = match sync.backend().send_command(command) {
            Ok(()) => {
                self.log.record(
                    &LogEntry::new(EventType::CommandIssued, Severity::Info)
                        .with_command(command.as_str()),
                );
                true
            }
            Err(err) => {
                self.log.record(
                    &LogEntry::new(EventType::CommandFailed, Severity::Warning)
                        .with_command(command.as_str())
                        .with_error(&err),
                );
                false
            }
        };
        ToggleOutcome::Issued {
            command,
            accepted,
            refresh: sync.refresh(),
        }
    }
}
