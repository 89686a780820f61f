//! Top-level error and retry-policy types for the OneShot launch domain.
//!
//! [`LaunchError`] covers every condition that terminates a run without a
//! container exit code. A container finishing with a nonzero code is *not* an
//! error — it is a reported task failure, carried through
//! [`crate::TaskResult`] and propagated as the process exit code.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any value that participates in
//! retry decisions must be able to produce a [`RetryPolicy`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{SubmissionFailure, TaskHandle};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Failure reasons that may be retried with backoff.
///
/// These are the resource-exhaustion causes a shared cluster reports when it
/// is temporarily unable to place a task. The set is a configuration
/// constant; it is never derived at runtime. Anything not listed here is
/// fatal on first sight.
pub const RETRYABLE_SUBMISSION_REASONS: &[&str] = &[
    "RESOURCE:CPU",
    "RESOURCE:MEMORY",
    "RESOURCE:GPU",
    "RESOURCE:PORTS",
];

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by values that participate in retry decisions to let the
/// controller decide whether to re-invoke an operation without escalating.
///
/// ## Rules
///
/// - `Retryable`: submission rejections whose reason is in
///   [`RETRYABLE_SUBMISSION_REASONS`]; wait-primitive timeouts.
/// - `NonRetryable`: every other rejection reason, transport errors,
///   wait failures, malformed describe responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means the caller
        /// applies its own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried; the run terminates.
    NonRetryable,
}

impl SubmissionFailure {
    /// Classifies this failure against the fixed retry allow-set.
    ///
    /// The backoff duration is owned by the retry controller's configuration,
    /// so `Retryable` carries no delay of its own.
    pub fn retry_policy(&self) -> RetryPolicy {
        if RETRYABLE_SUBMISSION_REASONS.contains(&self.reason.as_str()) {
            RetryPolicy::Retryable { after: None }
        } else {
            RetryPolicy::NonRetryable
        }
    }
}

// ---------------------------------------------------------------------------
// Launch-terminating errors
// ---------------------------------------------------------------------------

/// Errors that terminate a launch run.
///
/// Each variant corresponds to one terminal path of the launch state machine
/// and maps to a distinct process exit code in `launch`'s result mapper.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum LaunchError {
    /// The orchestration API could not be reached or refused the call at the
    /// transport level (network, credentials). Fatal immediately; never
    /// retried.
    #[error("transport failure during {operation}: {message}")]
    Transport {
        /// The operation that failed (`"submit"`, `"wait"`, `"describe"`).
        operation: String,
        /// Service error code, when the response carried one.
        code: Option<String>,
        /// Human-readable failure description.
        message: String,
    },

    /// The submission was rejected for a reason outside the retry allow-set.
    ///
    /// Produced by: the submission retry controller, on the *first* failure
    /// entry of a rejected attempt.
    #[error("fatal submission failure: {failure}")]
    SubmissionRejected {
        /// The failure entry that aborted retrying.
        failure: SubmissionFailure,
    },

    /// Every submission attempt was rejected with a retryable reason and the
    /// attempt budget is spent.
    ///
    /// Distinct from [`LaunchError::SubmissionRejected`] so scripts can tell
    /// "the cluster never had room" from "the request was never placeable".
    #[error("submission retries exhausted after {attempts} attempts; last reason: {last_reason}")]
    RetriesExhausted {
        /// Attempts made, equal to the configured maximum.
        attempts: u32,
        /// Reason reported by the final rejected attempt.
        last_reason: String,
    },

    /// The wait primitive failed for a reason other than its own timeout
    /// (permissions revoked, task vanished). Fatal immediately.
    #[error("wait failed for {task}: {code}: {message}")]
    WaitFailed {
        /// The task being waited on.
        task: TaskHandle,
        /// Machine-readable failure code.
        code: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The task never reached a terminal state within the bounded wait
    /// budget (per-call timeout × wait-retry count).
    #[error("task {task} did not stop within {retries} wait windows")]
    WaiterExhausted {
        /// The task being waited on.
        task: TaskHandle,
        /// Wait windows consumed, equal to the configured maximum.
        retries: u32,
    },

    /// The describe response was missing the task or its target container.
    ///
    /// Defensive check: a terminal task with no recoverable exit code must
    /// surface as an explicit anomaly, not as success.
    #[error("malformed task description for {task}: {detail}")]
    MalformedResult {
        /// The task that was described.
        task: TaskHandle,
        /// What was missing or inconsistent.
        detail: String,
    },
}

impl LaunchError {
    /// Returns the task handle this error relates to, when one exists.
    ///
    /// Submission-phase errors have no handle; every post-submission error
    /// carries one so terminal messages can include the log link.
    pub fn task(&self) -> Option<&TaskHandle> {
        match self {
            LaunchError::WaitFailed { task, .. }
            | LaunchError::WaiterExhausted { task, .. }
            | LaunchError::MalformedResult { task, .. } => Some(task),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(reason: &str) -> SubmissionFailure {
        SubmissionFailure {
            reason: reason.into(),
            detail: None,
            arn: None,
        }
    }

    #[test]
    fn resource_exhaustion_is_retryable() {
        for reason in RETRYABLE_SUBMISSION_REASONS {
            assert_eq!(
                failure(reason).retry_policy(),
                RetryPolicy::Retryable { after: None },
                "expected {reason} to be retryable"
            );
        }
    }

    #[test]
    fn everything_else_is_fatal() {
        for reason in ["AGENT", "ATTRIBUTE", "MISSING", "RESOURCE:DISK", ""] {
            assert_eq!(failure(reason).retry_policy(), RetryPolicy::NonRetryable);
        }
    }

    #[test]
    fn classification_is_exact_match_not_prefix() {
        // "RESOURCE:" alone or unknown RESOURCE subtypes are not in the
        // allow-set and must not be retried.
        assert_eq!(
            failure("RESOURCE:").retry_policy(),
            RetryPolicy::NonRetryable
        );
        assert_eq!(
            failure("resource:cpu").retry_policy(),
            RetryPolicy::NonRetryable
        );
    }
}
