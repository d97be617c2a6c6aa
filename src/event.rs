//! Classification of the triggering workflow event.
//!
//! The gate only applies to pull request events whose payload carries an
//! `action`. [`classify`] performs that check and extracts the [`CommitRef`]
//! whose status checks are tracked afterwards. [`EventInputs::classify`]
//! does the same from the raw runner inputs, reading the payload file only
//! for pull request events. Any other event is never a fault.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::GateError;

/// Event names the gate accepts.
pub const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// The event that triggered this invocation: its name and raw JSON payload.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub name: String,
    pub payload: Value,
}

impl TriggerEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Reads the payload from the file the runner wrote at `path`.
    /// Without a path the payload is absent and treated as `null`.
    pub fn load(name: impl Into<String>, path: Option<&Path>) -> Result<Self, GateError> {
        let payload = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                serde_json::from_str(&contents)?
            }
            None => Value::Null,
        };
        Ok(Self::new(name, payload))
    }
}

/// Owner and name of the repository hosting the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoords {
    pub owner: String,
    pub repo: String,
}

impl RepoCoords {
    /// Parses an `owner/name` slug as found in `GITHUB_REPOSITORY`.
    pub fn parse(slug: &str) -> Result<Self, GateError> {
        match slug.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(GateError::Event(format!(
                "repository must look like 'owner/name', got '{slug}'"
            ))),
        }
    }

    /// Uses the explicit slug when given, otherwise the payload's
    /// `repository.full_name`.
    pub fn resolve(explicit: Option<&str>, payload: &Value) -> Result<Self, GateError> {
        if let Some(slug) = explicit.filter(|s| !s.trim().is_empty()) {
            return Self::parse(slug);
        }
        match payload.pointer("/repository/full_name").and_then(Value::as_str) {
            Some(slug) => Self::parse(slug),
            None => Err(GateError::Event(
                "no repository given and the payload has no repository.full_name".into(),
            )),
        }
    }
}

/// The commit whose status checks are tracked. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    /// Pull request number, kept for diagnostics only.
    pub pull_number: Option<u64>,
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short: String = self.sha.chars().take(7).collect();
        write!(f, "{}/{}@{short}", self.owner, self.repo)
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Applicable(CommitRef),
    NotApplicable,
}

pub fn is_pull_request_event(name: &str) -> bool {
    PULL_REQUEST_EVENTS.contains(&name)
}

/// Head SHA and pull request number of an applicable event.
fn applicable_head(event: &TriggerEvent) -> Option<(&str, Option<u64>)> {
    if !is_pull_request_event(&event.name) {
        return None;
    }

    // `null` counts as undefined.
    let has_action = event
        .payload
        .get("action")
        .is_some_and(|action| !action.is_null());
    if !has_action {
        return None;
    }

    let sha = event
        .payload
        .pointer("/pull_request/head/sha")
        .and_then(Value::as_str)
        .filter(|sha| !sha.is_empty())?;
    let pull_number = event
        .payload
        .pointer("/pull_request/number")
        .and_then(Value::as_u64);
    Some((sha, pull_number))
}

/// Accepts `pull_request`/`pull_request_target` events whose payload has a
/// defined `action` and a pull request head SHA.
pub fn classify(event: &TriggerEvent, coords: &RepoCoords) -> Classification {
    match applicable_head(event) {
        Some((sha, pull_number)) => Classification::Applicable(CommitRef {
            owner: coords.owner.clone(),
            repo: coords.repo.clone(),
            sha: sha.to_string(),
            pull_number,
        }),
        None => Classification::NotApplicable,
    }
}

/// Raw event inputs as exported by the Actions runner.
#[derive(Debug, Clone, Default)]
pub struct EventInputs {
    pub name: String,
    pub payload_path: Option<PathBuf>,
    /// `owner/name`; falls back to the payload's `repository.full_name`.
    pub repository: Option<String>,
}

impl EventInputs {
    /// Classifies the event described by these inputs.
    ///
    /// The payload is only read for pull request events, and the repository
    /// is only resolved once the payload is known to apply. Errors are
    /// therefore limited to applicable events that cannot be resolved.
    pub fn classify(&self) -> Result<Classification, GateError> {
        if !is_pull_request_event(&self.name) {
            return Ok(Classification::NotApplicable);
        }
        let event = TriggerEvent::load(self.name.clone(), self.payload_path.as_deref())?;
        if applicable_head(&event).is_none() {
            return Ok(Classification::NotApplicable);
        }
        let coords = RepoCoords::resolve(self.repository.as_deref(), &event.payload)?;
        Ok(classify(&event, &coords))
    }
}
