//! The launch executor: drives submit → wait → describe → map.
//!
//! One executor invocation is one run. All state lives on the stack of
//! [`LaunchExecutor::run`]; nothing is shared across invocations.

use std::sync::Arc;

use tracing::{debug, error};

use task::{OrchestrationClient, ProcessOutcome, SubmissionRequest, TaskResult};

use crate::outcome;
use crate::poll::{CompletionPoller, PollConfig};
use crate::submit::{SubmissionRetryController, SubmitConfig};

/// Immutable configuration for one launch run.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    /// Submission retry budget and backoff.
    pub submit: SubmitConfig,

    /// Wait budget.
    pub poll: PollConfig,
}

/// Drives the full launch flow against an [`OrchestrationClient`].
pub struct LaunchExecutor {
    client: Arc<dyn OrchestrationClient>,
    config: LaunchConfig,
}

impl LaunchExecutor {
    /// Creates an executor over `client` with the given budgets.
    pub fn new(client: Arc<dyn OrchestrationClient>, config: LaunchConfig) -> Self {
        Self { client, config }
    }

    /// Runs the whole pipeline and returns the terminal [`ProcessOutcome`].
    ///
    /// There is no cancellation: if the enclosing process is terminated,
    /// in-flight waits are abandoned and the submitted task keeps running on
    /// the cluster. This is a known behavior gap, intentionally not handled.
    pub async fn run(&self, request: &SubmissionRequest) -> ProcessOutcome {
        let controller = SubmissionRetryController::new(self.config.submit.clone());
        let task = match controller.obtain_task(self.client.as_ref(), request).await {
            Ok(task) => task,
            Err(err) => {
                // No task was ever placed, so there is no log link to offer.
                error!(error = %err, "submission failed");
                return outcome::resolve_error(&err, None);
            }
        };

        let log_link = self.client.log_link(&task);
        debug!(task = %task.arn, log_link = log_link.as_deref().unwrap_or("-"), "observing task");

        let poller = CompletionPoller::new(self.config.poll.clone());
        match poller.await_completion(self.client.as_ref(), &task).await {
            Ok(result) => self.finish(result, log_link.as_deref()),
            Err(err) => {
                error!(error = %err, "wait failed");
                outcome::resolve_error(&err, log_link.as_deref())
            }
        }
    }

    fn finish(&self, result: TaskResult, log_link: Option<&str>) -> ProcessOutcome {
        let outcome = outcome::resolve(&result, log_link);
        if !outcome.is_success() {
            error!(
                task = %result.arn,
                exit_code = outcome.exit_code,
                "task did not succeed"
            );
        }
        outcome
    }
}
