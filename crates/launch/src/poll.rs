//! Bounded polling loop around the terminal-state waiter.
//!
//! A wait call ending in its own per-call timeout is an expected,
//! bounded-retry event — the task is still plausibly running. Any other wait
//! failure (permissions revoked, task vanished) is assumed non-recoverable
//! and fails fast. The two branches are kept strictly separate.

use std::time::Duration;

use tracing::{debug, info};

use task::{LaunchError, OrchestrationClient, TaskHandle, TaskResult, WaitOutcome};

/// Immutable configuration for the completion-polling loop.
///
/// The total wait budget is `per_call_timeout × max_wait_retries` (the
/// defaults give 12 × 10 minutes = 2 hours). Both factors are configured
/// independently so changing one never silently changes the other.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Upper bound for a single wait call.
    pub per_call_timeout: Duration,

    /// Number of wait windows to consume before giving up.
    pub max_wait_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            per_call_timeout: Duration::from_secs(600),
            max_wait_retries: 12,
        }
    }
}

/// Waits for a placed task to finish, then describes it.
pub struct CompletionPoller {
    config: PollConfig,
}

impl CompletionPoller {
    /// Creates a poller with the given wait budget.
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Polls until `task` reaches a terminal state, then returns its
    /// described result.
    ///
    /// Exhausting the wait budget surfaces [`LaunchError::WaiterExhausted`]
    /// without ever calling describe; a non-timeout wait failure surfaces
    /// [`LaunchError::WaitFailed`] immediately.
    pub async fn await_completion(
        &self,
        client: &dyn OrchestrationClient,
        task: &TaskHandle,
    ) -> Result<TaskResult, LaunchError> {
        let mut windows_used = 0u32;

        loop {
            match client
                .await_terminal(task, self.config.per_call_timeout)
                .await?
            {
                WaitOutcome::Terminal => {
                    info!(task = %task.arn, "task reached a terminal state");
                    break;
                }
                WaitOutcome::TimedOut => {
                    windows_used += 1;
                    if windows_used >= self.config.max_wait_retries {
                        return Err(LaunchError::WaiterExhausted {
                            task: task.clone(),
                            retries: windows_used,
                        });
                    }
                    debug!(
                        task = %task.arn,
                        window = windows_used,
                        max_windows = self.config.max_wait_retries,
                        "wait window elapsed; task still running"
                    );
                }
                WaitOutcome::Failed { code, message } => {
                    return Err(LaunchError::WaitFailed {
                        task: task.clone(),
                        code,
                        message,
                    });
                }
            }
        }

        client.describe(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{handle, task_result, ScriptedClient};

    fn poller() -> CompletionPoller {
        CompletionPoller::new(PollConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_on_first_window_describes_once() {
        let client = ScriptedClient::default()
            .wait_ok(WaitOutcome::Terminal)
            .describe_ok(task_result(Some(0)));

        let result = poller().await_completion(&client, &handle()).await.unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert_eq!(client.wait_calls(), 1);
        assert_eq!(client.describe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_within_budget_reissue_the_wait() {
        let client = ScriptedClient::default()
            .wait_ok(WaitOutcome::TimedOut)
            .wait_ok(WaitOutcome::TimedOut)
            .wait_ok(WaitOutcome::TimedOut)
            .wait_ok(WaitOutcome::Terminal)
            .describe_ok(task_result(Some(0)));

        let result = poller().await_completion(&client, &handle()).await.unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert_eq!(client.wait_calls(), 4);
        assert_eq!(client.describe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_never_describes() {
        let mut client = ScriptedClient::default();
        for _ in 0..12 {
            client = client.wait_ok(WaitOutcome::TimedOut);
        }

        let err = poller()
            .await_completion(&client, &handle())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LaunchError::WaiterExhausted { retries: 12, .. }
        ));
        assert_eq!(client.wait_calls(), 12);
        assert_eq!(client.describe_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_failure_is_fatal_and_never_describes() {
        let client = ScriptedClient::default().wait_ok(WaitOutcome::Failed {
            code: "AccessDeniedException".into(),
            message: "not authorized to perform ecs:DescribeTasks".into(),
        });

        let err = poller()
            .await_completion(&client, &handle())
            .await
            .unwrap_err();

        match err {
            LaunchError::WaitFailed { code, .. } => {
                assert_eq!(code, "AccessDeniedException");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.wait_calls(), 1);
        assert_eq!(client.describe_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_failure_after_timeouts_is_still_fatal() {
        let client = ScriptedClient::default()
            .wait_ok(WaitOutcome::TimedOut)
            .wait_ok(WaitOutcome::Failed {
                code: "ClusterNotFoundException".into(),
                message: "cluster gone".into(),
            });

        let err = poller()
            .await_completion(&client, &handle())
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::WaitFailed { .. }));
        assert_eq!(client.wait_calls(), 2);
        assert_eq!(client.describe_calls(), 0);
    }
}
