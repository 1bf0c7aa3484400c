//! JSON contract consumed from the simulation backend.
//!
//! The backend owns these shapes; the client only reads them. Enumerated
//! strings (`type`, `verdict`) are open: unknown values are preserved rather
//! than rejected, so a backend that grows a new task category never breaks a
//! refresh.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Epoch values at or above this magnitude are read as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

// ──────────────────── aggregate stats ────────────────────

/// `GET /stats` payload. Every field is required; a reply without them is
/// malformed, not zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_users: u64,
    pub total_minted: f64,
    pub total_tasks: u64,
}

/// `GET /simulation/status` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub active: bool,
}

// ──────────────────── feed ────────────────────

/// Category of labor a feed record was submitted for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Gardening,
    Coding,
    Construction,
    Other(String),
}

impl TaskType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gardening => "GARDENING",
            Self::Coding => "CODING",
            Self::Construction => "CONSTRUCTION",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "GARDENING" => Self::Gardening,
            "CODING" => Self::Coding,
            "CONSTRUCTION" => Self::Construction,
            _ => Self::Other(raw),
        }
    }
}

impl From<TaskType> for String {
    fn from(value: TaskType) -> Self {
        match value {
            TaskType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the verification agent for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Approved,
    Rejected,
    Pending,
    Other(String),
}

impl Verdict {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Pending => "PENDING",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "PENDING" => Self::Pending,
            _ => Self::Other(raw),
        }
    }
}

impl From<Verdict> for String {
    fn from(value: Verdict) -> Self {
        match value {
            Verdict::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submission time as delivered by the backend.
///
/// Accepts RFC 3339, offset-less ISO-8601 (read as UTC), or a number of
/// seconds/milliseconds since the Unix epoch. Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTimestamp {
    At(DateTime<Utc>),
    Unparsed(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

impl FeedTimestamp {
    /// Parse the textual form used by the backend.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::At(at.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::At(naive.and_utc());
            }
        }
        Self::Unparsed(raw.to_string())
    }

    /// Interpret a numeric epoch, in seconds or milliseconds.
    #[must_use]
    pub fn from_epoch(value: f64) -> Self {
        let parsed = if !value.is_finite() {
            None
        } else if value.abs() >= EPOCH_MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(value.round() as i64)
        } else {
            let secs = value.floor();
            let nanos = ((value - secs) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
            DateTime::from_timestamp(secs as i64, nanos)
        };
        parsed.map_or_else(|| Self::Unparsed(value.to_string()), Self::At)
    }

    /// `HH:MM:SS` for compact feed cards.
    #[must_use]
    pub fn clock_label(&self) -> String {
        match self {
            Self::At(at) => at.format("%H:%M:%S").to_string(),
            Self::Unparsed(raw) => raw.clone(),
        }
    }

    /// Full date and time for the detail view.
    #[must_use]
    pub fn full_label(&self) -> String {
        match self {
            Self::At(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            Self::Unparsed(raw) => raw.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for FeedTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(raw) => Self::parse(&raw),
            RawTimestamp::Epoch(value) => Self::from_epoch(value),
        })
    }
}

impl Serialize for FeedTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::At(at) => {
                serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

/// One verification record from `GET /feed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub time: FeedTimestamp,
    #[serde(deserialize_with = "opaque_id")]
    pub worker: String,
    pub hours: f64,
    pub verdict: Verdict,
}

/// Identifiers are opaque: accept strings or numbers, keep them as text.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(value) => value.to_string(),
        RawId::Float(value) => value.to_string(),
    })
}

// ──────────────────── tests ────────────────────
