use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// State of a commit status as reported by the build provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
    Error,
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusState::Pending => write!(f, "pending"),
            StatusState::Success => write!(f, "success"),
            StatusState::Failure => write!(f, "failure"),
            StatusState::Error => write!(f, "error"),
        }
    }
}

/// A single status entry for a commit. Read-only to the gate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusRecord {
    /// Which check produced this entry, e.g. `OpenPublishing.Build`.
    pub context: String,
    pub state: StatusState,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StatusRecord {
    pub fn new(context: impl Into<String>, state: StatusState) -> Self {
        Self {
            context: context.into(),
            state,
            description: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.state == StatusState::Pending
    }
}

/// Picks the most recent record for `context`.
///
/// The record with the greatest `updated_at` wins. Records without a
/// timestamp rank lowest, and ties keep whichever came first in `records`,
/// so a list without timestamps resolves to its first match.
pub fn select_latest<'a>(records: &'a [StatusRecord], context: &str) -> Option<&'a StatusRecord> {
    // `max_by_key` keeps the last maximum; iterating in reverse makes that the first.
    records
        .iter()
        .rev()
        .filter(|record| record.context == context)
        .max_by_key(|record| record.updated_at)
}
