//! Shared value types for the OneShot launch domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. a submission request is immutable
//! once built, a wait outcome is exactly one of three shapes) and participate
//! in domain computations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ClusterName, ContainerName, TaskArn, TaskDefinition};

// ---------------------------------------------------------------------------
// Submission request
// ---------------------------------------------------------------------------

/// A per-invocation replacement of one container's command binding.
///
/// Applied only for this run; the task definition itself is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerOverride {
    /// The container the override targets.
    pub name: ContainerName,

    /// Replacement command tokens, in order. `None` runs the command baked
    /// into the task definition.
    pub command: Option<Vec<String>>,
}

/// Network placement for the launched task (awsvpc mode).
///
/// Consumed, not reinterpreted: values are passed through to the
/// orchestration API unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Subnets the task's elastic network interface may be placed in.
    pub subnets: Vec<String>,

    /// Security groups attached to the task's elastic network interface.
    pub security_groups: Vec<String>,

    /// Whether the task receives a public IP address.
    pub assign_public_ip: bool,
}

/// Everything needed to submit one task. Immutable once built; constructed
/// exactly once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Target cluster.
    pub cluster: ClusterName,

    /// Task definition to launch.
    pub task_definition: TaskDefinition,

    /// Number of task copies to start. Defaults to 1; only the first task in
    /// the submission response is observed.
    pub count: u32,

    /// Ordered container overrides for this run.
    pub overrides: Vec<ContainerOverride>,

    /// Optional awsvpc network configuration.
    pub network: Option<NetworkConfig>,
}

impl SubmissionRequest {
    /// Creates a request for one copy of `task_definition` on `cluster`, with
    /// a single override entry targeting `container` and no command
    /// replacement.
    pub fn new(
        cluster: ClusterName,
        task_definition: TaskDefinition,
        container: ContainerName,
    ) -> Self {
        Self {
            cluster,
            task_definition,
            count: 1,
            overrides: vec![ContainerOverride {
                name: container,
                command: None,
            }],
            network: None,
        }
    }

    /// Replaces the target container's command with `tokens` for this run.
    pub fn with_command(mut self, tokens: Vec<String>) -> Self {
        if let Some(first) = self.overrides.first_mut() {
            first.command = Some(tokens);
        }
        self
    }

    /// Sets the number of task copies to start.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Attaches an awsvpc network configuration.
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    /// Returns the container whose exit code decides the process outcome.
    ///
    /// This is the first (and in practice only) override entry; the request
    /// constructor guarantees one exists.
    pub fn target_container(&self) -> Option<&ContainerName> {
        self.overrides.first().map(|o| &o.name)
    }
}

// ---------------------------------------------------------------------------
// Submission outcome
// ---------------------------------------------------------------------------

/// One failure entry from a rejected submission, as reported by the
/// orchestration API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    /// Machine-readable failure reason (e.g. `"RESOURCE:MEMORY"`).
    pub reason: String,

    /// Optional human-readable detail accompanying the reason.
    pub detail: Option<String>,

    /// ARN of the resource the failure relates to, when the API reports one.
    pub arn: Option<String>,
}

impl std::fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Result of one submission attempt.
///
/// Exactly one of these is produced per call to
/// [`crate::OrchestrationClient::submit`]. Transport-level errors (network,
/// credentials) are not represented here — they surface as
/// [`crate::LaunchError::Transport`] and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// The task was placed; `task` identifies it for waiting and describing.
    Submitted {
        /// Handle to the placed task.
        task: TaskHandle,
    },

    /// The API rejected the submission and reported why.
    ///
    /// The failure list is ordered as reported. Per API contract it is never
    /// empty; an empty list observed in practice is treated as fatal.
    Rejected {
        /// Ordered failure entries.
        failures: Vec<SubmissionFailure>,
    },
}

// ---------------------------------------------------------------------------
// Task handle and wait outcome
// ---------------------------------------------------------------------------

/// Identifies one placed task for the duration of polling.
///
/// Owned by the completion poller; never mutated, only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    /// The ARN assigned by the orchestration service.
    pub arn: TaskArn,

    /// The cluster the task runs on.
    pub cluster: ClusterName,
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.arn)
    }
}

/// Result of one bounded wait call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitOutcome {
    /// The task reached a terminal state; describe may proceed.
    Terminal,

    /// The wait primitive's own per-call timeout elapsed while the task was
    /// still plausibly running. Not a failure — the poller re-issues the
    /// wait, up to its bounded retry budget.
    TimedOut,

    /// The wait failed for a reason other than its timeout (permissions
    /// revoked, task vanished). Never retried.
    Failed {
        /// Machine-readable failure code.
        code: String,
        /// Human-readable failure description.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Task result and process outcome
// ---------------------------------------------------------------------------

/// The recorded state of a finished task, as returned by describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// The described task.
    pub arn: TaskArn,

    /// Exit code of the target container. Absence signals a malformed or
    /// incomplete description and is treated as an anomaly, never as success.
    pub exit_code: Option<i32>,

    /// Last lifecycle status recorded for the task (e.g. `"STOPPED"`).
    pub last_status: Option<String>,

    /// Why the task stopped, when the service recorded a reason.
    pub stop_reason: Option<String>,

    /// Human-readable rendering of the raw task description, included in
    /// failure messages so operators can inspect it without re-querying.
    pub description: String,
}

/// The system's final externally observable result: an exit status plus a
/// human-readable message. Terminal artifact of the whole pipeline; nothing
/// is produced after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// The process exit code to terminate with.
    pub exit_code: i32,

    /// Status line emitted before exiting.
    pub message: String,
}

impl ProcessOutcome {
    /// Returns `true` if this outcome reports success (exit code 0).
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the whole seconds elapsed since `earlier`, saturating at zero.
    pub fn seconds_since(self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds().max(0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmissionRequest {
        SubmissionRequest::new(
            ClusterName::new("batch").unwrap(),
            TaskDefinition::new("nightly-report:7").unwrap(),
            ContainerName::new("report").unwrap(),
        )
    }

    #[test]
    fn request_defaults() {
        let req = request();
        assert_eq!(req.count, 1);
        assert_eq!(req.overrides.len(), 1);
        assert!(req.overrides[0].command.is_none());
        assert!(req.network.is_none());
        assert_eq!(req.target_container().unwrap().as_str(), "report");
    }

    #[test]
    fn command_override_targets_first_container() {
        let req = request().with_command(vec!["run".into(), "--fast".into()]);
        assert_eq!(
            req.overrides[0].command.as_deref(),
            Some(&["run".to_string(), "--fast".to_string()][..])
        );
    }

    #[test]
    fn failure_display_includes_detail() {
        let bare = SubmissionFailure {
            reason: "RESOURCE:CPU".into(),
            detail: None,
            arn: None,
        };
        assert_eq!(bare.to_string(), "RESOURCE:CPU");

        let detailed = SubmissionFailure {
            reason: "AGENT".into(),
            detail: Some("agent disconnected".into()),
            arn: None,
        };
        assert_eq!(detailed.to_string(), "AGENT (agent disconnected)");
    }
}
