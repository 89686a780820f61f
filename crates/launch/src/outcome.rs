//! Translation of terminal task state into the process's own outcome.
//!
//! Both functions here are pure: the same inputs always produce the same
//! [`ProcessOutcome`], and mapping a result twice yields identical outcomes.
//! The exit-code scheme is preserved exactly for scripting compatibility —
//! including its documented collisions (a container exiting 253 or 255 is
//! indistinguishable from the corresponding infrastructure code).

use task::{LaunchError, ProcessOutcome, TaskResult};

/// The task's target container finished with exit code 0.
pub const EXIT_SUCCESS: i32 = 0;

/// Fatal submission rejection or unclassified wait failure. Collides with a
/// container exit code of 1 by design.
pub const EXIT_FAILURE: i32 = 1;

/// Submission retries exhausted on a retryable reason.
pub const EXIT_RETRIES_EXHAUSTED: i32 = 253;

/// Sentinel for a terminal task whose description carried no exit code for
/// the target container.
pub const EXIT_MISSING_EXIT_CODE: i32 = 254;

/// Wait-polling retries exhausted; the task never reached a terminal state
/// within the budget.
pub const EXIT_WAITER_EXHAUSTED: i32 = 255;

/// Maps a described terminal task to the process outcome.
///
/// - exit code 0 → success.
/// - nonzero exit code → failure; the code is propagated verbatim and the
///   message carries the raw task description.
/// - absent exit code → failure with [`EXIT_MISSING_EXIT_CODE`]; a terminal
///   task without a recoverable exit code is an anomaly, never success.
pub fn resolve(result: &TaskResult, log_link: Option<&str>) -> ProcessOutcome {
    match result.exit_code {
        Some(0) => ProcessOutcome {
            exit_code: EXIT_SUCCESS,
            message: with_link(
                format!("task {} finished with exit code 0", result.arn),
                log_link,
            ),
        },
        Some(code) => ProcessOutcome {
            exit_code: code,
            message: with_link(
                format!(
                    "task {} finished with exit code {code}\n{}",
                    result.arn, result.description
                ),
                log_link,
            ),
        },
        None => ProcessOutcome {
            exit_code: EXIT_MISSING_EXIT_CODE,
            message: with_link(
                format!(
                    "task {} stopped without reporting an exit code for the target \
                     container; treating the description as malformed\n{}",
                    result.arn, result.description
                ),
                log_link,
            ),
        },
    }
}

/// Maps a launch-terminating error to the process outcome.
///
/// `log_link` is included whenever the caller could build one (i.e. a task
/// ARN exists); submission-phase errors have none.
pub fn resolve_error(error: &LaunchError, log_link: Option<&str>) -> ProcessOutcome {
    let exit_code = match error {
        LaunchError::Transport { .. }
        | LaunchError::SubmissionRejected { .. }
        | LaunchError::WaitFailed { .. } => EXIT_FAILURE,
        LaunchError::RetriesExhausted { .. } => EXIT_RETRIES_EXHAUSTED,
        LaunchError::WaiterExhausted { .. } => EXIT_WAITER_EXHAUSTED,
        LaunchError::MalformedResult { .. } => EXIT_MISSING_EXIT_CODE,
    };

    ProcessOutcome {
        exit_code,
        message: with_link(error.to_string(), log_link),
    }
}

fn with_link(message: String, log_link: Option<&str>) -> String {
    match log_link {
        Some(link) => format!("{message}\nlogs: {link}"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task::{SubmissionFailure, TaskArn};

    fn result(exit_code: Option<i32>) -> TaskResult {
        TaskResult {
            arn: TaskArn::new("arn:aws:ecs:eu-west-1:123456789012:task/batch/abc123").unwrap(),
            exit_code,
            last_status: Some("STOPPED".into()),
            stop_reason: Some("Essential container in task exited".into()),
            description: "exitCode=?, stoppedReason=Essential container in task exited".into(),
        }
    }

    #[test]
    fn mapping_table() {
        // (container exit code, expected process exit code)
        let cases: &[(Option<i32>, i32)] = &[
            (Some(0), 0),
            (Some(1), 1),
            (Some(137), 137),
            (None, EXIT_MISSING_EXIT_CODE),
        ];

        for &(exit_code, expected) in cases {
            let outcome = resolve(&result(exit_code), None);
            assert_eq!(
                outcome.exit_code, expected,
                "container code {exit_code:?} mapped wrongly"
            );
            assert_eq!(outcome.is_success(), expected == 0);
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        for exit_code in [Some(0), Some(42), None] {
            let r = result(exit_code);
            assert_eq!(resolve(&r, Some("http://logs")), resolve(&r, Some("http://logs")));
        }
    }

    #[test]
    fn nonzero_message_carries_description() {
        let outcome = resolve(&result(Some(137)), None);
        assert!(outcome.message.contains("exit code 137"));
        assert!(outcome.message.contains("stoppedReason"));
    }

    #[test]
    fn log_link_is_appended_when_present() {
        let link = "https://eu-west-1.console.aws.amazon.com/cloudwatch/...";
        let outcome = resolve(&result(Some(0)), Some(link));
        assert!(outcome.message.ends_with(link));

        let without = resolve(&result(Some(0)), None);
        assert!(!without.message.contains("logs:"));
    }

    #[test]
    fn error_exit_codes() {
        let handle = task::TaskHandle {
            arn: TaskArn::new("arn:aws:ecs:eu-west-1:1:task/c/t").unwrap(),
            cluster: task::ClusterName::new("c").unwrap(),
        };

        let cases: Vec<(LaunchError, i32)> = vec![
            (
                LaunchError::Transport {
                    operation: "submit".into(),
                    code: None,
                    message: "dns failure".into(),
                },
                1,
            ),
            (
                LaunchError::SubmissionRejected {
                    failure: SubmissionFailure {
                        reason: "AGENT".into(),
                        detail: None,
                        arn: None,
                    },
                },
                1,
            ),
            (
                LaunchError::RetriesExhausted {
                    attempts: 5,
                    last_reason: "RESOURCE:CPU".into(),
                },
                253,
            ),
            (
                LaunchError::WaitFailed {
                    task: handle.clone(),
                    code: "AccessDenied".into(),
                    message: "denied".into(),
                },
                1,
            ),
            (
                LaunchError::WaiterExhausted {
                    task: handle.clone(),
                    retries: 12,
                },
                255,
            ),
            (
                LaunchError::MalformedResult {
                    task: handle,
                    detail: "no containers".into(),
                },
                254,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(resolve_error(&error, None).exit_code, expected);
        }
    }

    #[test]
    fn fatal_paths_include_log_link_when_available() {
        let handle = task::TaskHandle {
            arn: TaskArn::new("arn:aws:ecs:eu-west-1:1:task/c/t").unwrap(),
            cluster: task::ClusterName::new("c").unwrap(),
        };
        let err = LaunchError::WaiterExhausted {
            task: handle,
            retries: 12,
        };
        let outcome = resolve_error(&err, Some("http://logs"));
        assert!(outcome.message.contains("http://logs"));
    }
}
