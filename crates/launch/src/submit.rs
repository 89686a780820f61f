//! Bounded retry loop around task submission.
//!
//! The controller's only job is to obtain a placed task handle. It retries
//! exclusively on rejections whose *first* failure entry classifies as
//! retryable; any other condition terminates the run.

use std::time::Duration;

use tracing::{debug, info, warn};

use task::{
    LaunchError, OrchestrationClient, RetryPolicy, SubmissionFailure, SubmissionOutcome,
    SubmissionRequest, TaskHandle,
};

/// Immutable configuration for the submission retry loop.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Maximum submission attempts before giving up.
    pub max_attempts: u32,

    /// Fixed delay between attempts. Not exponential: resource contention on
    /// a shared cluster is expected to resolve within a bounded window
    /// independent of attempt count.
    pub backoff: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(60),
        }
    }
}

/// Local mutable retry state, owned by one controller invocation.
///
/// Invariant: `attempts_used <= max_attempts`; once they are equal the
/// controller must stop retrying and report exhaustion.
#[derive(Debug)]
struct RetryState {
    attempts_used: u32,
    max_attempts: u32,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempts_used: 0,
            max_attempts,
        }
    }

    /// Records one completed (rejected) attempt and reports whether the
    /// budget is now spent.
    fn record_attempt(&mut self) -> bool {
        self.attempts_used += 1;
        self.attempts_used >= self.max_attempts
    }
}

/// Obtains a placed task, retrying only on classified-retryable rejection.
///
/// ## Policy
///
/// Only the *first* failure entry of a rejection drives the retry decision.
/// The API may report several simultaneous failures; the policy is
/// conservative: a fatal first reason aborts retrying, and only a retryable
/// first reason triggers backoff. This is deliberate, not an oversight.
pub struct SubmissionRetryController {
    config: SubmitConfig,
}

impl SubmissionRetryController {
    /// Creates a controller with the given retry budget and backoff.
    pub fn new(config: SubmitConfig) -> Self {
        Self { config }
    }

    /// Submits `request` until a task is placed, a fatal rejection occurs,
    /// or the attempt budget is exhausted.
    pub async fn obtain_task(
        &self,
        client: &dyn OrchestrationClient,
        request: &SubmissionRequest,
    ) -> Result<TaskHandle, LaunchError> {
        let mut state = RetryState::new(self.config.max_attempts);

        loop {
            match client.submit(request).await? {
                SubmissionOutcome::Submitted { task } => {
                    info!(task = %task.arn, "task placed");
                    return Ok(task);
                }
                SubmissionOutcome::Rejected { failures } => {
                    // Per API contract a rejection always carries at least one
                    // failure entry; an empty list is unclassifiable and fatal.
                    let Some(first) = failures.first() else {
                        return Err(LaunchError::SubmissionRejected {
                            failure: SubmissionFailure {
                                reason: "EMPTY_FAILURE_LIST".into(),
                                detail: Some(
                                    "rejection carried no failure entries".into(),
                                ),
                                arn: None,
                            },
                        });
                    };

                    debug!(reason = %first.reason, entries = failures.len(), "submission rejected");

                    match first.retry_policy() {
                        RetryPolicy::NonRetryable => {
                            return Err(LaunchError::SubmissionRejected {
                                failure: first.clone(),
                            });
                        }
                        RetryPolicy::Retryable { .. } => {
                            if state.record_attempt() {
                                return Err(LaunchError::RetriesExhausted {
                                    attempts: state.attempts_used,
                                    last_reason: first.reason.clone(),
                                });
                            }
                            warn!(
                                reason = %first.reason,
                                attempt = state.attempts_used,
                                max_attempts = state.max_attempts,
                                backoff_secs = self.config.backoff.as_secs(),
                                "retryable rejection; backing off"
                            );
                            tokio::time::sleep(self.config.backoff).await;
                        }
                    }
                }
            }
        }
    }
}
