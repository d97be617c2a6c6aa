mod observer;
mod policy;
mod reconciler;
mod status;
mod verdict;

pub use observer::{ReconcileObserver, TracingObserver};
pub use policy::{PollPolicy, TRACKED_CONTEXT, WARNING_DESCRIPTION};
pub use reconciler::{Phase, ReconciliationState, StatusReconciler};
pub use status::{StatusRecord, StatusState, select_latest};
pub use verdict::{Verdict, format_minutes};
