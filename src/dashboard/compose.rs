//! `(snapshot, selection) → DashboardView`.
//!
//! Everything shown on screen or printed by `snapshot` comes out of
//! [`compose`]. It is re-run for every frame; nothing derived is kept
//! between calls.

use serde::Serialize;

use super::feed::{FeedCard, project};
use super::selection::Selection;
use super::stats::{StatCard, stat_cards};
use crate::backend::AggregateStats;
use crate::sync::Snapshot;

pub const TITLE: &str = "HEC Overseer";
pub const SUBTITLE: &str = "Proof-of-Labor Economic Oracle";
pub const FEED_TITLE: &str = "Live Verification Stream";

/// Run-state as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Active,
    Paused,
    /// No snapshot yet.
    Unknown,
}

impl RunState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "System Active",
            Self::Paused => "System Paused",
            Self::Unknown => "Connecting",
        }
    }

    /// Caption of the pause/resume control.
    #[must_use]
    pub const fn control_label(self) -> &'static str {
        match self {
            Self::Active => "⏸ Pause",
            Self::Paused => "▶ Resume",
            Self::Unknown => "⟳ Sync",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub run_state: RunState,
    pub run_state_label: &'static str,
    pub control_label: &'static str,
}

/// Detail overlay for the selected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailOverlay {
    /// `"CODING Task"`
    pub title: String,
    pub card: FeedCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub header: Header,
    pub stats: [StatCard; 3],
    pub feed_title: &'static str,
    /// `"20 recent"`
    pub feed_count: String,
    pub feed: Vec<FeedCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<DetailOverlay>,
}

#[must_use]
pub fn compose(snapshot: Option<&Snapshot>, selection: &Selection) -> DashboardView {
    let run_state = match snapshot {
        Some(s) if s.status.active => RunState::Active,
        Some(_) => RunState::Paused,
        None => RunState::Unknown,
    };
    let stats = snapshot.map_or_else(AggregateStats::default, |s| s.stats);
    let feed: Vec<FeedCard> = snapshot
        .map(|s| s.feed.iter().map(project).collect())
        .unwrap_or_default();

    let overlay = selection.item().map(|item| DetailOverlay {
        title: format!("{} Task", item.task_type),
        card: project(item),
    });

    DashboardView {
        header: Header {
            title: TITLE,
            subtitle: SUBTITLE,
            run_state,
            run_state_label: run_state.label(),
            control_label: run_state.control_label(),
        },
        stats: stat_cards(&stats),
        feed_title: FEED_TITLE,
        feed_count: format!("{} recent", feed.len()),
        feed,
        overlay,
    }
}
