//! Transition hooks called by the reconciler.
//!
//! The reconciler never logs on its own. It reports each transition to a
//! [`ReconcileObserver`]; [`TracingObserver`] turns those calls into
//! structured `tracing` events and `crate::ui::GateProgress` renders them on
//! the terminal. Pairs of observers fan out to both.

use tracing::{debug, info, warn};

use super::status::StatusRecord;
use super::verdict::Verdict;
use crate::event::CommitRef;

pub trait ReconcileObserver {
    /// The tracked context was absent from query number `attempt`.
    fn discovery_missed(&self, _commit: &CommitRef, _attempt: u32, _retries_left: u32) {}

    /// The tracked context appeared on query number `attempt`.
    fn discovered(&self, _commit: &CommitRef, _record: &StatusRecord, _attempt: u32) {}

    /// The tracked context is still pending after `polls` re-queries.
    fn still_pending(&self, _commit: &CommitRef, _record: &StatusRecord, _polls: u32) {}

    /// Reconciliation finished with `verdict`.
    fn resolved(&self, _commit: &CommitRef, _record: Option<&StatusRecord>, _verdict: &Verdict) {}
}

/// Observer that ignores every transition.
impl ReconcileObserver for () {}

impl<A: ReconcileObserver, B: ReconcileObserver> ReconcileObserver for (A, B) {
    fn discovery_missed(&self, commit: &CommitRef, attempt: u32, retries_left: u32) {
        self.0.discovery_missed(commit, attempt, retries_left);
        self.1.discovery_missed(commit, attempt, retries_left);
    }

    fn discovered(&self, commit: &CommitRef, record: &StatusRecord, attempt: u32) {
        self.0.discovered(commit, record, attempt);
        self.1.discovered(commit, record, attempt);
    }

    fn still_pending(&self, commit: &CommitRef, record: &StatusRecord, polls: u32) {
        self.0.still_pending(commit, record, polls);
        self.1.still_pending(commit, record, polls);
    }

    fn resolved(&self, commit: &CommitRef, record: Option<&StatusRecord>, verdict: &Verdict) {
        self.0.resolved(commit, record, verdict);
        self.1.resolved(commit, record, verdict);
    }
}

/// Emits one structured `tracing` event per transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ReconcileObserver for TracingObserver {
    fn discovery_missed(&self, commit: &CommitRef, attempt: u32, retries_left: u32) {
        debug!(%commit, attempt, retries_left, "status context not reported yet");
    }

    fn discovered(&self, commit: &CommitRef, record: &StatusRecord, attempt: u32) {
        info!(
            %commit,
            context = %record.context,
            state = %record.state,
            attempt,
            "found status context"
        );
    }

    fn still_pending(&self, commit: &CommitRef, record: &StatusRecord, polls: u32) {
        info!(
            %commit,
            context = %record.context,
            description = record.description.as_deref().unwrap_or(""),
            polls,
            "status context still pending"
        );
    }

    fn resolved(&self, commit: &CommitRef, record: Option<&StatusRecord>, verdict: &Verdict) {
        let state = record.map(|r| r.state.to_string());
        let description = record.and_then(|r| r.description.as_deref());
        if verdict.is_pass() {
            info!(%commit, ?state, ?description, %verdict, "status check resolved");
        } else {
            warn!(%commit, ?state, ?description, %verdict, "status check resolved");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingObserver;
    use super::*;
    use crate::gate::StatusState;

    fn commit() -> CommitRef {
        CommitRef {
            owner: "acme".into(),
            repo: "docs".into(),
            sha: "abcdef1234".into(),
            pull_number: Some(7),
        }
    }

    #[test]
    fn pair_fans_out_to_both_observers() {
        let pair = (RecordingObserver::default(), RecordingObserver::default());
        let record = StatusRecord::new("OpenPublishing.Build", StatusState::Pending);

        pair.discovered(&commit(), &record, 3);
        pair.still_pending(&commit(), &record, 1);
        pair.resolved(&commit(), Some(&record), &Verdict::Pass);

        let expected = vec!["discovered:pending:3", "pending:1", "resolved:PASS"];
        assert_eq!(pair.0.events(), expected);
        assert_eq!(pair.1.events(), expected);
    }

    #[test]
    fn unit_and_tracing_observers_accept_all_transitions() {
        let record = StatusRecord::new("OpenPublishing.Build", StatusState::Success);
        for observer in [&() as &dyn ReconcileObserver, &TracingObserver] {
            observer.discovery_missed(&commit(), 1, 30);
            observer.discovered(&commit(), &record, 2);
            observer.still_pending(&commit(), &record, 1);
            observer.resolved(&commit(), Some(&record), &Verdict::FailBuildError);
            observer.resolved(&commit(), None, &Verdict::FailNoStatusFound { waited_secs: 300 });
        }
    }
}
