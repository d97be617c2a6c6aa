use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::observer::ReconcileObserver;
use super::policy::PollPolicy;
use super::status::{StatusRecord, select_latest};
use super::verdict::Verdict;
use crate::error::GateError;
use crate::event::CommitRef;
use crate::github::StatusSource;

/// Where the reconciler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the tracked context to be reported at all.
    AwaitingDiscovery,
    /// The context exists and is being polled until it leaves `pending`.
    AwaitingResolution,
    Done,
}

/// Mutable state of one reconciliation, discarded with the verdict.
#[derive(Debug, Clone)]
pub struct ReconciliationState {
    pub found_record: Option<StatusRecord>,
    /// Suspensions left in the current phase.
    pub attempts_remaining: u32,
    pub phase: Phase,
    /// Queries issued so far, across both phases.
    pub queries: u32,
}

impl ReconciliationState {
    fn new(policy: &PollPolicy) -> Self {
        Self {
            found_record: None,
            attempts_remaining: policy.discovery_retries,
            phase: Phase::AwaitingDiscovery,
            queries: 0,
        }
    }
}

/// Polls the status list of one commit until the tracked context settles.
pub struct StatusReconciler<'a, S, O> {
    source: &'a S,
    policy: &'a PollPolicy,
    observer: &'a O,
    cancel: CancellationToken,
}

impl<'a, S: StatusSource, O: ReconcileObserver> StatusReconciler<'a, S, O> {
    pub fn new(source: &'a S, policy: &'a PollPolicy, observer: &'a O) -> Self {
        Self::with_cancellation(source, policy, observer, CancellationToken::new())
    }

    pub fn with_cancellation(
        source: &'a S,
        policy: &'a PollPolicy,
        observer: &'a O,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            policy,
            observer,
            cancel,
        }
    }

    /// Resolves the tracked context of `commit` into a verdict.
    ///
    /// Returns an error when a query fails, when the context disappears
    /// while pending, or when the cancellation token fires.
    pub async fn reconcile(&self, commit: &CommitRef) -> Result<Verdict, GateError> {
        let mut state = ReconciliationState::new(self.policy);

        let Some(record) = self.discover(commit, &mut state).await? else {
            state.phase = Phase::Done;
            let verdict = Verdict::FailNoStatusFound {
                waited_secs: self.policy.waited_secs(self.policy.discovery_retries),
            };
            self.observer.resolved(commit, None, &verdict);
            return Ok(verdict);
        };

        let verdict = self.resolve(commit, &mut state, record).await?;
        state.phase = Phase::Done;
        self.observer
            .resolved(commit, state.found_record.as_ref(), &verdict);
        Ok(verdict)
    }

    /// Phase 1: query until the context appears or the retry budget runs out.
    async fn discover(
        &self,
        commit: &CommitRef,
        state: &mut ReconciliationState,
    ) -> Result<Option<StatusRecord>, GateError> {
        loop {
            let records = self.query(commit, state).await?;
            state.found_record = select_latest(&records, &self.policy.context).cloned();

            if let Some(record) = &state.found_record {
                self.observer.discovered(commit, record, state.queries);
                return Ok(Some(record.clone()));
            }

            if state.attempts_remaining == 0 {
                return Ok(None);
            }
            state.attempts_remaining -= 1;
            self.observer
                .discovery_missed(commit, state.queries, state.attempts_remaining);
            self.pause().await?;
        }
    }

    /// Phase 2: re-query while the context is pending, then map it to a verdict.
    async fn resolve(
        &self,
        commit: &CommitRef,
        state: &mut ReconciliationState,
        mut record: StatusRecord,
    ) -> Result<Verdict, GateError> {
        state.phase = Phase::AwaitingResolution;
        state.attempts_remaining = self.policy.pending_retries;
        let mut polls = 0;

        loop {
            if let Some(verdict) = Verdict::from_resolved(&record, &self.policy.warning_description)
            {
                return Ok(verdict);
            }

            if state.attempts_remaining == 0 {
                return Ok(Verdict::FailStillPending {
                    waited_secs: self.policy.waited_secs(polls),
                });
            }
            state.attempts_remaining -= 1;
            self.observer.still_pending(commit, &record, polls);
            self.pause().await?;
            polls += 1;

            state.found_record = None;
            let records = self.query(commit, state).await?;
            state.found_record = select_latest(&records, &self.policy.context).cloned();
            record = state
                .found_record
                .clone()
                .ok_or_else(|| GateError::StatusVanished {
                    context: self.policy.context.clone(),
                    commit: commit.to_string(),
                })?;
        }
    }

    async fn query(
        &self,
        commit: &CommitRef,
        state: &mut ReconciliationState,
    ) -> Result<Vec<StatusRecord>, GateError> {
        state.queries += 1;
        Ok(self.source.list_statuses(commit).await?)
    }

    async fn pause(&self) -> Result<(), GateError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(GateError::Cancelled),
            _ = sleep(self.policy.delay) => Ok(()),
        }
    }
}
