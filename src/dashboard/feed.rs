//! Feed record projection: one [`FeedItem`] to everything a card displays.
//!
//! Pure and total. Nothing here is cached; callers re-project on every render.

use serde::Serialize;

use super::format::{fixed, shortest};
use crate::backend::{FeedItem, TaskType, Verdict};

/// Fixed exchange rate, USD per EC.
pub const USD_PER_EC: f64 = 25.0;

/// Constant transaction fee note.
pub const FEE_NOTE: &str = "2% burned";

const APPROVED_NARRATIVE: &str =
    "All verification checks passed. Metadata aligned with proof media. No fraud detected.";
const REJECTED_NARRATIVE: &str =
    "Visual evidence score below threshold. Insufficient proof of labor detected.";
const PENDING_NARRATIVE: &str =
    "Verification in progress. No tokens are minted until the agent issues a verdict.";
const UNKNOWN_NARRATIVE: &str =
    "Verdict not recognized by this client. No tokens are counted for it.";

/// Derived economics of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EconomicImpact {
    /// `hours` when approved, otherwise zero.
    pub minted: f64,
    pub usd: f64,
    pub skill_multiplier: f64,
    pub fee_note: &'static str,
}

#[must_use]
pub fn economic_impact(item: &FeedItem) -> EconomicImpact {
    let minted = if item.verdict.is_approved() {
        item.hours
    } else {
        0.0
    };
    EconomicImpact {
        minted,
        usd: minted * USD_PER_EC,
        skill_multiplier: skill_multiplier(&item.task_type),
        fee_note: FEE_NOTE,
    }
}

#[must_use]
pub const fn skill_multiplier(task_type: &TaskType) -> f64 {
    match task_type {
        TaskType::Construction => 1.5,
        TaskType::Coding => 1.2,
        TaskType::Gardening | TaskType::Other(_) => 1.0,
    }
}

#[must_use]
pub const fn task_icon(task_type: &TaskType) -> &'static str {
    match task_type {
        TaskType::Gardening => "🌱",
        TaskType::Coding => "💻",
        TaskType::Construction => "🏗️",
        TaskType::Other(_) => "📋",
    }
}

#[must_use]
pub const fn verdict_icon(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Approved => "✓",
        Verdict::Rejected => "✗",
        Verdict::Pending | Verdict::Other(_) => "○",
    }
}

#[must_use]
pub const fn verdict_narrative(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Approved => APPROVED_NARRATIVE,
        Verdict::Rejected => REJECTED_NARRATIVE,
        Verdict::Pending => PENDING_NARRATIVE,
        Verdict::Other(_) => UNKNOWN_NARRATIVE,
    }
}

/// Colour class of a card, independent of any terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Approved,
    Rejected,
    Neutral,
}

impl Tone {
    #[must_use]
    pub const fn of(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Approved => Self::Approved,
            Verdict::Rejected => Self::Rejected,
            Verdict::Pending | Verdict::Other(_) => Self::Neutral,
        }
    }
}

/// Display fields of one feed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedCard {
    pub id: String,
    pub task_icon: &'static str,
    pub task_label: String,
    /// `HH:MM:SS` in UTC.
    pub clock: String,
    /// Full date and time for the detail overlay.
    pub submitted: String,
    pub verdict_icon: &'static str,
    pub verdict_label: String,
    pub tone: Tone,
    pub worker: String,
    /// `"4 hours"`
    pub duration: String,
    /// `"4 EC"` or `"0 EC"`
    pub minted: String,
    /// `"$100.00"`
    pub usd: String,
    /// `"1.2x"`
    pub multiplier: String,
    pub fee_note: &'static str,
    pub narrative: &'static str,
}

/// Project one record into its card.
#[must_use]
pub fn project(item: &FeedItem) -> FeedCard {
    let impact = economic_impact(item);
    FeedCard {
        id: item.id.clone(),
        task_icon: task_icon(&item.task_type),
        task_label: item.task_type.to_string(),
        clock: item.time.clock_label(),
        submitted: item.time.full_label(),
        verdict_icon: verdict_icon(&item.verdict),
        verdict_label: item.verdict.to_string(),
        tone: Tone::of(&item.verdict),
        worker: item.worker.clone(),
        duration: format!("{} hours", shortest(item.hours)),
        minted: format!("{} EC", shortest(impact.minted)),
        usd: format!("${}", fixed(impact.usd, 2)),
        multiplier: format!("{}x", fixed(impact.skill_multiplier, 1)),
        fee_note: impact.fee_note,
        narrative: verdict_narrative(&item.verdict),
    }
}
