//! The ECS implementation of [`task::OrchestrationClient`].
//!
//! Each trait operation is a direct call-through to the corresponding ECS
//! API (RunTask, the tasks-stopped waiter, DescribeTasks). No retry or
//! interpretation logic lives here; SDK responses are converted into domain
//! types at this edge and nowhere else. Raw responses are echoed as debug
//! events so verbose runs can inspect them.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_ecs::client::Waiters;
use aws_sdk_ecs::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types as ecs_types;
use aws_smithy_runtime_api::client::waiters::error::WaiterError;
use tracing::debug;

use task::{
    ContainerName, LaunchError, NetworkConfig, OrchestrationClient, SubmissionFailure,
    SubmissionOutcome, SubmissionRequest, TaskArn, TaskHandle, TaskResult, WaitOutcome,
};

use crate::logs::LogLinkBuilder;

/// Capability-restricted ECS facade.
///
/// Holds the container name whose exit code decides the process outcome;
/// describe responses are reduced to that container at this boundary.
pub struct EcsClient {
    client: aws_sdk_ecs::Client,
    container: ContainerName,
    log_links: Option<LogLinkBuilder>,
}

impl EcsClient {
    /// Creates a client from a resolved SDK configuration.
    pub fn new(
        config: &aws_config::SdkConfig,
        container: ContainerName,
        log_links: Option<LogLinkBuilder>,
    ) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(config),
            container,
            log_links,
        }
    }
}

#[async_trait]
impl OrchestrationClient for EcsClient {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionOutcome, LaunchError> {
        let mut call = self
            .client
            .run_task()
            .cluster(request.cluster.as_str())
            .task_definition(request.task_definition.as_str())
            .count(request.count as i32);

        if let Some(overrides) = task_override(&request.overrides) {
            call = call.overrides(overrides);
        }
        if let Some(network) = &request.network {
            call = call.network_configuration(network_configuration(network)?);
        }

        let output = call
            .send()
            .await
            .map_err(|err| transport_error("submit", err))?;
        debug!(response = ?output, "RunTask response");

        if let Some(placed) = output.tasks().first() {
            let arn = placed
                .task_arn()
                .and_then(TaskArn::new)
                .ok_or_else(|| LaunchError::Transport {
                    operation: "submit".into(),
                    code: None,
                    message: "RunTask response contained a task without an ARN".into(),
                })?;
            return Ok(SubmissionOutcome::Submitted {
                task: TaskHandle {
                    arn,
                    cluster: request.cluster.clone(),
                },
            });
        }

        // No task placed: surface whatever the API reported. An empty
        // failure list is passed through; the retry controller treats it as
        // fatal.
        Ok(SubmissionOutcome::Rejected {
            failures: output.failures().iter().map(submission_failure).collect(),
        })
    }

    async fn await_terminal(
        &self,
        task: &TaskHandle,
        per_call_timeout: Duration,
    ) -> Result<WaitOutcome, LaunchError> {
        let result = self
            .client
            .wait_until_tasks_stopped()
            .cluster(task.cluster.as_str())
            .tasks(task.arn.as_str())
            .wait(per_call_timeout)
            .await;

        match result {
            Ok(_) => Ok(WaitOutcome::Terminal),
            // The waiter's own budget elapsing is not a failure; the poller
            // decides whether to re-issue the wait.
            Err(WaiterError::ExceededMaxWait(_)) => Ok(WaitOutcome::TimedOut),
            Err(err) => Ok(WaitOutcome::Failed {
                code: wait_failure_code(&err).to_string(),
                message: format!("{err:?}"),
            }),
        }
    }

    async fn describe(&self, task: &TaskHandle) -> Result<TaskResult, LaunchError> {
        let output = self
            .client
            .describe_tasks()
            .cluster(task.cluster.as_str())
            .tasks(task.arn.as_str())
            .send()
            .await
            .map_err(|err| transport_error("describe", err))?;
        debug!(response = ?output, "DescribeTasks response");

        let Some(described) = output.tasks().first() else {
            let detail = match output.failures().first() {
                Some(failure) => format!(
                    "DescribeTasks reported {}",
                    submission_failure(failure)
                ),
                None => "DescribeTasks response contained no tasks".to_string(),
            };
            return Err(LaunchError::MalformedResult {
                task: task.clone(),
                detail,
            });
        };

        Ok(task_result(task, described, &self.container))
    }

    fn log_link(&self, task: &TaskHandle) -> Option<String> {
        self.log_links.as_ref()?.console_url(task)
    }
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

fn task_override(overrides: &[task::ContainerOverride]) -> Option<ecs_types::TaskOverride> {
    let entries: Vec<_> = overrides
        .iter()
        .filter_map(|entry| {
            entry.command.as_ref().map(|command| {
                ecs_types::ContainerOverride::builder()
                    .name(entry.name.as_str())
                    .set_command(Some(command.clone()))
                    .build()
            })
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(
            ecs_types::TaskOverride::builder()
                .set_container_overrides(Some(entries))
                .build(),
        )
    }
}

fn network_configuration(
    network: &NetworkConfig,
) -> Result<ecs_types::NetworkConfiguration, LaunchError> {
    let vpc = ecs_types::AwsVpcConfiguration::builder()
        .set_subnets(Some(network.subnets.clone()))
        .set_security_groups(if network.security_groups.is_empty() {
            None
        } else {
            Some(network.security_groups.clone())
        })
        .assign_public_ip(if network.assign_public_ip {
            ecs_types::AssignPublicIp::Enabled
        } else {
            ecs_types::AssignPublicIp::Disabled
        })
        .build()
        .map_err(|err| LaunchError::Transport {
            operation: "submit".into(),
            code: None,
            message: format!("invalid network configuration: {err}"),
        })?;

    Ok(ecs_types::NetworkConfiguration::builder()
        .awsvpc_configuration(vpc)
        .build())
}

// ---------------------------------------------------------------------------
// Response conversion
// ---------------------------------------------------------------------------

fn submission_failure(failure: &ecs_types::Failure) -> SubmissionFailure {
    SubmissionFailure {
        reason: failure.reason().unwrap_or("UNKNOWN").to_string(),
        detail: failure.detail().map(str::to_string),
        arn: failure.arn().map(str::to_string),
    }
}

fn task_result(
    handle: &TaskHandle,
    described: &ecs_types::Task,
    container: &ContainerName,
) -> TaskResult {
    let exit_code = described
        .containers()
        .iter()
        .find(|c| c.name() == Some(container.as_str()))
        .and_then(|c| c.exit_code());

    TaskResult {
        arn: handle.arn.clone(),
        exit_code,
        last_status: described.last_status().map(str::to_string),
        stop_reason: described.stopped_reason().map(str::to_string),
        description: render_description(described),
    }
}

/// Renders the parts of a task description an operator needs at failure
/// time, without requiring them to re-query the API.
fn render_description(described: &ecs_types::Task) -> String {
    let containers: Vec<serde_json::Value> = described
        .containers()
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name(),
                "exitCode": c.exit_code(),
                "reason": c.reason(),
            })
        })
        .collect();

    serde_json::json!({
        "taskArn": described.task_arn(),
        "lastStatus": described.last_status(),
        "stoppedReason": described.stopped_reason(),
        "containers": containers,
    })
    .to_string()
}

fn transport_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> LaunchError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    LaunchError::Transport {
        operation: operation.into(),
        code: err.code().map(str::to_string),
        message: match err.message() {
            Some(message) => message.to_string(),
            None => format!("{err:?}"),
        },
    }
}

fn wait_failure_code<O, E>(err: &WaiterError<O, E>) -> &'static str {
    match err {
        WaiterError::ExceededMaxWait(_) => "ExceededMaxWait",
        WaiterError::FailureState(_) => "FailureState",
        WaiterError::OperationFailed(_) => "OperationFailed",
        WaiterError::ConstructionFailure(_) => "ConstructionFailure",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task::ClusterName;

    fn handle() -> TaskHandle {
        TaskHandle {
            arn: TaskArn::new("arn:aws:ecs:eu-west-1:123456789012:task/batch/abc123").unwrap(),
            cluster: ClusterName::new("batch").unwrap(),
        }
    }

    #[test]
    fn failure_conversion_defaults_missing_reason() {
        let converted = submission_failure(
            &ecs_types::Failure::builder()
                .detail("no detail without a reason".to_string())
                .build(),
        );
        assert_eq!(converted.reason, "UNKNOWN");
        assert_eq!(
            converted.detail.as_deref(),
            Some("no detail without a reason")
        );
    }

    #[test]
    fn failure_conversion_carries_all_fields() {
        let converted = submission_failure(
            &ecs_types::Failure::builder()
                .reason("RESOURCE:CPU")
                .detail("insufficient CPU")
                .arn("arn:aws:ecs:eu-west-1:1:container-instance/i-1")
                .build(),
        );
        assert_eq!(converted.reason, "RESOURCE:CPU");
        assert_eq!(converted.detail.as_deref(), Some("insufficient CPU"));
        assert!(converted.arn.is_some());
    }

    #[test]
    fn result_extracts_target_container_exit_code() {
        let described = ecs_types::Task::builder()
            .task_arn(handle().arn.as_str())
            .last_status("STOPPED")
            .containers(
                ecs_types::Container::builder()
                    .name("sidecar")
                    .exit_code(0)
                    .build(),
            )
            .containers(
                ecs_types::Container::builder()
                    .name("report")
                    .exit_code(137)
                    .build(),
            )
            .build();

        let result = task_result(
            &handle(),
            &described,
            &ContainerName::new("report").unwrap(),
        );
        assert_eq!(result.exit_code, Some(137));
        assert_eq!(result.last_status.as_deref(), Some("STOPPED"));
    }

    #[test]
    fn result_has_no_exit_code_when_container_is_missing() {
        let described = ecs_types::Task::builder()
            .last_status("STOPPED")
            .containers(
                ecs_types::Container::builder()
                    .name("sidecar")
                    .exit_code(0)
                    .build(),
            )
            .build();

        let result = task_result(
            &handle(),
            &described,
            &ContainerName::new("report").unwrap(),
        );
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn description_is_compact_json() {
        let described = ecs_types::Task::builder()
            .last_status("STOPPED")
            .stopped_reason("Essential container in task exited")
            .containers(ecs_types::Container::builder().name("report").build())
            .build();

        let rendered = render_description(&described);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["lastStatus"], "STOPPED");
        assert_eq!(parsed["containers"][0]["name"], "report");
        // An absent exit code stays observably absent, not zero.
        assert!(parsed["containers"][0]["exitCode"].is_null());
    }

    #[test]
    fn command_override_only_sent_when_present() {
        let container = ContainerName::new("report").unwrap();
        let without = [task::ContainerOverride {
            name: container.clone(),
            command: None,
        }];
        assert!(task_override(&without).is_none());

        let with = [task::ContainerOverride {
            name: container,
            command: Some(vec!["run".into()]),
        }];
        let built = task_override(&with).unwrap();
        let entries = built.container_overrides();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), Some("report"));
        assert_eq!(entries[0].command(), ["run".to_string()]);
    }
}
