//! Scripted in-memory [`OrchestrationClient`] for the loop tests.
//!
//! Each operation pops the next scripted response; running off the end of a
//! script panics, which keeps call-count assertions honest.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use task::{
    ClusterName, ContainerName, LaunchError, OrchestrationClient, SubmissionFailure,
    SubmissionOutcome, SubmissionRequest, TaskArn, TaskDefinition, TaskHandle, TaskResult,
    WaitOutcome,
};

pub fn handle() -> TaskHandle {
    TaskHandle {
        arn: TaskArn::new("arn:aws:ecs:eu-west-1:123456789012:task/batch/abc123").unwrap(),
        cluster: ClusterName::new("batch").unwrap(),
    }
}

pub fn submitted() -> SubmissionOutcome {
    SubmissionOutcome::Submitted { task: handle() }
}

pub fn rejected(reason: &str) -> SubmissionOutcome {
    rejected_many(&[reason])
}

pub fn rejected_many(reasons: &[&str]) -> SubmissionOutcome {
    SubmissionOutcome::Rejected {
        failures: reasons
            .iter()
            .map(|reason| SubmissionFailure {
                reason: (*reason).into(),
                detail: None,
                arn: None,
            })
            .collect(),
    }
}

pub fn task_result(exit_code: Option<i32>) -> TaskResult {
    TaskResult {
        arn: handle().arn,
        exit_code,
        last_status: Some("STOPPED".into()),
        stop_reason: Some("Essential container in task exited".into()),
        description: "lastStatus=STOPPED".into(),
    }
}

#[derive(Default)]
pub struct ScriptedClient {
    submits: Mutex<VecDeque<Result<SubmissionOutcome, LaunchError>>>,
    waits: Mutex<VecDeque<Result<WaitOutcome, LaunchError>>>,
    describes: Mutex<VecDeque<Result<TaskResult, LaunchError>>>,
    log_link: Option<String>,
    submit_count: AtomicU32,
    wait_count: AtomicU32,
    describe_count: AtomicU32,
}

impl ScriptedClient {
    pub fn submit_ok(self, outcome: SubmissionOutcome) -> Self {
        self.submits.lock().unwrap().push_back(Ok(outcome));
        self
    }

    pub fn submit_err(self, error: LaunchError) -> Self {
        self.submits.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn wait_ok(self, outcome: WaitOutcome) -> Self {
        self.waits.lock().unwrap().push_back(Ok(outcome));
        self
    }

    pub fn describe_ok(self, result: TaskResult) -> Self {
        self.describes.lock().unwrap().push_back(Ok(result));
        self
    }

    pub fn with_log_link(mut self, link: &str) -> Self {
        self.log_link = Some(link.into());
        self
    }

    /// A canonical request; the scripted client ignores its contents.
    pub fn request(&self) -> SubmissionRequest {
        SubmissionRequest::new(
            ClusterName::new("batch").unwrap(),
            TaskDefinition::new("nightly-report:7").unwrap(),
            ContainerName::new("report").unwrap(),
        )
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_count.load(Ordering::SeqCst)
    }

    pub fn wait_calls(&self) -> u32 {
        self.wait_count.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> u32 {
        self.describe_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrchestrationClient for ScriptedClient {
    async fn submit(
        &self,
        _request: &SubmissionRequest,
    ) -> Result<SubmissionOutcome, LaunchError> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .expect("submit called more often than scripted")
    }

    async fn await_terminal(
        &self,
        _task: &TaskHandle,
        _per_call_timeout: Duration,
    ) -> Result<WaitOutcome, LaunchError> {
        self.wait_count.fetch_add(1, Ordering::SeqCst);
        self.waits
            .lock()
            .unwrap()
            .pop_front()
            .expect("await_terminal called more often than scripted")
    }

    async fn describe(&self, _task: &TaskHandle) -> Result<TaskResult, LaunchError> {
        self.describe_count.fetch_add(1, Ordering::SeqCst);
        self.describes
            .lock()
            .unwrap()
            .pop_front()
            .expect("describe called more often than scripted")
    }

    fn log_link(&self, _task: &TaskHandle) -> Option<String> {
        self.log_link.clone()
    }
}
