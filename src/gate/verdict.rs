use std::fmt;

use super::status::{StatusRecord, StatusState};

/// The single terminal outcome of one gate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// The build succeeded but reported warnings.
    FailWithWarnings,
    /// The build reported `failure` or `error`.
    FailBuildError,
    /// The tracked context never appeared within the discovery budget.
    FailNoStatusFound { waited_secs: u64 },
    /// The tracked context stayed pending for the whole pending budget.
    FailStillPending { waited_secs: u64 },
    FailNotApplicableEvent,
}

impl Verdict {
    /// Maps a non-pending record to its verdict.
    ///
    /// Only `success` without the exact `warning_description` passes.
    /// A record still `pending` is not resolvable and maps to `None`.
    pub fn from_resolved(record: &StatusRecord, warning_description: &str) -> Option<Self> {
        match record.state {
            StatusState::Pending => None,
            StatusState::Success
                if record.description.as_deref() == Some(warning_description) =>
            {
                Some(Verdict::FailWithWarnings)
            }
            StatusState::Success => Some(Verdict::Pass),
            StatusState::Failure | StatusState::Error => Some(Verdict::FailBuildError),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The message handed to the failure reporter, `None` for `Pass`.
    pub fn failure_message(&self) -> Option<String> {
        let message = match self {
            Verdict::Pass => return None,
            Verdict::FailNotApplicableEvent => {
                "Event is not a pull request or payload action is undefined.".to_string()
            }
            Verdict::FailNoStatusFound { waited_secs } => format!(
                "Did not find OPS status check after waiting for {} minutes. \
                 If it shows 'Expected — Waiting for status to be reported', \
                 close and reopen the pull request to trigger a build.",
                format_minutes(*waited_secs)
            ),
            Verdict::FailWithWarnings => "Please fix OPS build warnings before merging. \
                 To see the warnings, click 'Details' next to the OpenPublishing.build \
                 status check at the bottom of your pull request."
                .to_string(),
            Verdict::FailBuildError => {
                "OpenPublishing.Build status is either failure or error.".to_string()
            }
            Verdict::FailStillPending { waited_secs } => format!(
                "OpenPublishing.Build status is still pending after waiting for {} minutes.",
                format_minutes(*waited_secs)
            ),
        };
        Some(message)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::FailWithWarnings => write!(f, "FAIL_WITH_WARNINGS"),
            Verdict::FailBuildError => write!(f, "FAIL_BUILD_ERROR"),
            Verdict::FailNoStatusFound { .. } => write!(f, "FAIL_NO_STATUS_FOUND"),
            Verdict::FailStillPending { .. } => write!(f, "FAIL_STILL_PENDING"),
            Verdict::FailNotApplicableEvent => write!(f, "FAIL_NOT_APPLICABLE_EVENT"),
        }
    }
}

/// Whole minutes print without a fraction, everything else with one decimal.
pub fn format_minutes(secs: u64) -> String {
    if secs % 60 == 0 {
        (secs / 60).to_string()
    } else {
        format!("{:.1}", secs as f64 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARNINGS: &str = "Validation status: warnings";

    fn record(state: StatusState, description: Option<&str>) -> StatusRecord {
        let record = StatusRecord::new("OpenPublishing.Build", state);
        match description {
            Some(d) => record.with_description(d),
            None => record,
        }
    }

    #[test]
    fn success_without_warnings_passes() {
        let verdict = Verdict::from_resolved(
            &record(StatusState::Success, Some("Validation status: succeeded")),
            WARNINGS,
        );
        assert_eq!(verdict, Some(Verdict::Pass));

        let verdict = Verdict::from_resolved(&record(StatusState::Success, None), WARNINGS);
        assert_eq!(verdict, Some(Verdict::Pass));
    }

    #[test]
    fn success_with_warnings_fails() {
        let verdict =
            Verdict::from_resolved(&record(StatusState::Success, Some(WARNINGS)), WARNINGS);
        assert_eq!(verdict, Some(Verdict::FailWithWarnings));
    }

    #[test]
    fn warning_match_is_exact() {
        let verdict = Verdict::from_resolved(
            &record(StatusState::Success, Some("validation status: warnings")),
            WARNINGS,
        );
        assert_eq!(verdict, Some(Verdict::Pass));
    }

    #[test]
    fn failure_and_error_fail_the_build() {
        for state in [StatusState::Failure, StatusState::Error] {
            let verdict = Verdict::from_resolved(&record(state, Some(WARNINGS)), WARNINGS);
            assert_eq!(verdict, Some(Verdict::FailBuildError));
        }
    }

    #[test]
    fn pending_is_not_resolvable() {
        assert_eq!(
            Verdict::from_resolved(&record(StatusState::Pending, None), WARNINGS),
            None
        );
    }

    #[test]
    fn failure_messages_match_templates() {
        assert_eq!(Verdict::Pass.failure_message(), None);
        assert_eq!(
            Verdict::FailNotApplicableEvent.failure_message().unwrap(),
            "Event is not a pull request or payload action is undefined."
        );
        assert_eq!(
            Verdict::FailNoStatusFound { waited_secs: 300 }
                .failure_message()
                .unwrap(),
            "Did not find OPS status check after waiting for 5 minutes. If it shows \
             'Expected — Waiting for status to be reported', close and reopen the pull \
             request to trigger a build."
        );
        assert_eq!(
            Verdict::FailWithWarnings.failure_message().unwrap(),
            "Please fix OPS build warnings before merging. To see the warnings, click \
             'Details' next to the OpenPublishing.build status check at the bottom of \
             your pull request."
        );
        assert_eq!(
            Verdict::FailBuildError.failure_message().unwrap(),
            "OpenPublishing.Build status is either failure or error."
        );
        assert_eq!(
            Verdict::FailStillPending { waited_secs: 3600 }
                .failure_message()
                .unwrap(),
            "OpenPublishing.Build status is still pending after waiting for 60 minutes."
        );
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(300), "5");
        assert_eq!(format_minutes(0), "0");
        assert_eq!(format_minutes(70), "1.2");
        assert_eq!(format_minutes(90), "1.5");
    }

    #[test]
    fn only_pass_is_pass() {
        assert!(Verdict::Pass.is_pass());
        assert!(!Verdict::FailBuildError.is_pass());
        assert!(!Verdict::FailNoStatusFound { waited_secs: 0 }.is_pass());
    }
}
