//! CloudWatch Logs console link construction.
//!
//! A formatting concern kept entirely at this edge: given the log group and
//! stream prefix the task definition logs to, build the console URL an
//! operator can click to see the target container's output. The awslogs
//! driver names streams `prefix/container-name/task-id`.

use task::{ContainerName, TaskHandle};

/// Builds console log links for launched tasks.
#[derive(Debug, Clone)]
pub struct LogLinkBuilder {
    region: String,
    log_group: String,
    stream_prefix: String,
    container: ContainerName,
}

impl LogLinkBuilder {
    /// Creates a builder for tasks logging to `log_group` with the awslogs
    /// `stream_prefix`, viewed in `region`.
    pub fn new(
        region: impl Into<String>,
        log_group: impl Into<String>,
        stream_prefix: impl Into<String>,
        container: ContainerName,
    ) -> Self {
        Self {
            region: region.into(),
            log_group: log_group.into(),
            stream_prefix: stream_prefix.into(),
            container,
        }
    }

    /// Returns the console URL for `task`'s target-container log stream, or
    /// `None` when the task ARN carries no extractable task id.
    pub fn console_url(&self, task: &TaskHandle) -> Option<String> {
        let task_id = task_id_from_arn(task.arn.as_str())?;
        let stream = format!("{}/{}/{}", self.stream_prefix, self.container, task_id);
        Some(format!(
            "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}\
             #logsV2:log-groups/log-group/{group}/log-events/{stream}",
            region = self.region,
            group = console_escape(&self.log_group),
            stream = console_escape(&stream),
        ))
    }
}

/// Extracts the task id (final path segment) from a task ARN.
///
/// ARNs look like `arn:aws:ecs:region:account:task/cluster/task-id`; older
/// single-segment forms (`...:task/task-id`) are handled the same way.
pub fn task_id_from_arn(arn: &str) -> Option<&str> {
    let id = arn.rsplit('/').next()?;
    if id.is_empty() || id == arn {
        None
    } else {
        Some(id)
    }
}

// The console double-encodes path separators inside the fragment.
fn console_escape(value: &str) -> String {
    value.replace('/', "$252F")
}
