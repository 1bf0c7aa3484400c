//! Aggregate stats to the three headline cards.

use serde::Serialize;

use super::feed::USD_PER_EC;
use super::format::{fixed, round_half_away, shortest, thousands};
use crate::backend::AggregateStats;

/// Share of citizens reported as joined this session.
const SESSION_GROWTH_PERCENT: u128 = 8;

/// One headline figure with its trend line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub trend: String,
    /// Drawn with emphasis.
    pub highlight: bool,
}

/// Citizens, GDP, verified tasks, in that order.
#[must_use]
pub fn stat_cards(stats: &AggregateStats) -> [StatCard; 3] {
    [citizens(stats), gdp(stats), verified_tasks(stats)]
}

fn citizens(stats: &AggregateStats) -> StatCard {
    let joined = u128::from(stats.total_users) * SESSION_GROWTH_PERCENT / 100;
    StatCard {
        icon: "👥",
        label: "Active Citizens",
        value: thousands(stats.total_users),
        trend: format!("+{joined} this session"),
        highlight: false,
    }
}

fn gdp(stats: &AggregateStats) -> StatCard {
    StatCard {
        icon: "💰",
        label: "Global GDP",
        value: format!("{} EC", fixed(stats.total_minted, 1)),
        trend: format!(
            "≈ ${} USD @ ${}/EC",
            fixed(stats.total_minted * USD_PER_EC, 0),
            shortest(USD_PER_EC)
        ),
        highlight: true,
    }
}

#[allow(clippy::cast_precision_loss)]
fn verified_tasks(stats: &AggregateStats) -> StatCard {
    let average = if stats.total_tasks > 0 {
        round_half_away(stats.total_minted / stats.total_tasks as f64, 1)
    } else {
        0.0
    };
    StatCard {
        icon: "📊",
        label: "Verified Tasks",
        value: thousands(stats.total_tasks),
        trend: format!("{} EC/task avg", shortest(average)),
        highlight: false,
    }
}
