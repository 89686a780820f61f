//! Port trait for the task-orchestration service.
//!
//! The launch flow depends only on this capability-restricted facade;
//! infrastructure crates implement it and never add domain rules. Each
//! operation is a direct call-through to the external API with no retry or
//! interpretation logic of its own — bounded retries and timeout budgets are
//! owned by the orchestration layer.

use std::time::Duration;

use async_trait::async_trait;

use crate::{LaunchError, SubmissionOutcome, SubmissionRequest, TaskHandle, TaskResult, WaitOutcome};

/// Capability-restricted facade over the external task-orchestration API.
#[async_trait]
pub trait OrchestrationClient: Send + Sync {
    /// Submits one task.
    ///
    /// Fails only by returning [`SubmissionOutcome::Rejected`] (API-reported)
    /// or by raising [`LaunchError::Transport`] (network, credentials), which
    /// the caller treats as fatal immediately — this client never retries.
    async fn submit(&self, request: &SubmissionRequest)
        -> Result<SubmissionOutcome, LaunchError>;

    /// Blocks until `task` reaches a terminal state or `per_call_timeout`
    /// elapses.
    ///
    /// The timeout elapsing is signaled as [`WaitOutcome::TimedOut`], not as
    /// an error; any other failure (permissions, task not found) is
    /// [`WaitOutcome::Failed`].
    async fn await_terminal(
        &self,
        task: &TaskHandle,
        per_call_timeout: Duration,
    ) -> Result<WaitOutcome, LaunchError>;

    /// Returns the current recorded state of `task`, including the target
    /// container's exit code if available.
    async fn describe(&self, task: &TaskHandle) -> Result<TaskResult, LaunchError>;

    /// Builds a human-readable log-viewer URL for `task`, when enough
    /// configuration exists to construct one.
    ///
    /// This is a formatting concern kept at the facade boundary; the launch
    /// flow only embeds the returned string in terminal messages.
    fn log_link(&self, task: &TaskHandle) -> Option<String>;
}
