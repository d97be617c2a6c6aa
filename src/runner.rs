use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::GateError;
use crate::event::{Classification, CommitRef, EventInputs};
use crate::gate::{PollPolicy, ReconcileObserver, StatusReconciler, Verdict};
use crate::github::StatusSource;

/// Runs one gate invocation: classify the event, then reconcile its commit.
pub struct GateRunner<S, O> {
    pub source: S,
    pub policy: PollPolicy,
    pub observer: O,
    pub cancel: CancellationToken,
}

impl<S: StatusSource, O: ReconcileObserver> GateRunner<S, O> {
    pub fn new(source: S, policy: PollPolicy, observer: O) -> Self {
        Self {
            source,
            policy,
            observer,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancels pending suspensions when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Produces exactly one verdict, or the fault that prevented it.
    ///
    /// Events that do not apply yield `FailNotApplicableEvent` without a
    /// single status query.
    pub async fn run(&self, inputs: &EventInputs) -> Result<Verdict, GateError> {
        let commit = match inputs.classify()? {
            Classification::Applicable(commit) => commit,
            Classification::NotApplicable => {
                info!(event = %inputs.name, "event does not apply to the gate");
                return Ok(Verdict::FailNotApplicableEvent);
            }
        };
        self.reconcile(&commit).await
    }

    /// Waits for the tracked context of an already classified commit.
    pub async fn reconcile(&self, commit: &CommitRef) -> Result<Verdict, GateError> {
        info!(
            %commit,
            pull_number = ?commit.pull_number,
            context = %self.policy.context,
            "waiting for status check"
        );
        StatusReconciler::with_cancellation(
            &self.source,
            &self.policy,
            &self.observer,
            self.cancel.clone(),
        )
        .reconcile(commit)
        .await
    }
}

/// Cancels `cancel` once `limit` elapses, unless it is cancelled first.
pub fn cancel_after(cancel: &CancellationToken, limit: Duration) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(limit) => {
                warn!(timeout_secs = limit.as_secs(), "timeout reached, cancelling");
                cancel.cancel();
            }
        }
    });
}

/// Cancels `cancel` on Ctrl-C.
pub fn cancel_on_interrupt(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    warn!("interrupted, cancelling");
                    cancel.cancel();
                }
            }
        }
    });
}
