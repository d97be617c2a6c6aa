use std::time::Duration;

/// Bounds for both polling phases.
///
/// Discovery retries after the first query and pending polls share one
/// `delay`. Both ceilings count suspensions, not queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Status context being tracked.
    pub context: String,
    /// `success` description that means the build produced warnings.
    pub warning_description: String,
    /// Suspension between two queries.
    pub delay: Duration,
    /// Retries allowed while the context has not appeared yet.
    pub discovery_retries: u32,
    /// Re-polls allowed while the context stays pending.
    pub pending_retries: u32,
}

pub const TRACKED_CONTEXT: &str = "OpenPublishing.Build";
pub const WARNING_DESCRIPTION: &str = "Validation status: warnings";

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            context: TRACKED_CONTEXT.to_string(),
            warning_description: WARNING_DESCRIPTION.to_string(),
            delay: Duration::from_secs(10),
            discovery_retries: 30,
            pending_retries: 360,
        }
    }
}

impl PollPolicy {
    /// Time spent suspended after `retries` delays.
    pub fn waited_secs(&self, retries: u32) -> u64 {
        self.delay.as_secs() * u64::from(retries)
    }
}
