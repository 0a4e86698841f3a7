//! Configuration for sync runs.

use std::time::Duration;

/// What a run does after an entity fails to sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep syncing the remaining entities.
    #[default]
    Continue,
    /// End the run right after the first failed entity.
    Abort,
}

/// Configuration for sync runs.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Behaviour after an entity fails.
    pub failure_policy: FailurePolicy,
    /// Pause after each emitted progress event.
    pub step_delay: Option<Duration>,
}

impl SyncConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Pauses for `delay` after every progress event.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay).filter(|d| !d.is_zero());
        self
    }

    /// Returns true if the run stops at the first failure.
    pub fn aborts_on_error(&self) -> bool {
        self.failure_policy == FailurePolicy::Abort
    }
}
