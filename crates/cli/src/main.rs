//! OneShot CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse arguments** — validate identifiers and budgets up front so the
//!    launch flow only ever sees well-formed configuration.
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    env-filter layer writing to stderr; `--verbose` lowers the default
//!    filter to `debug`, which also echoes every raw API response logged by
//!    the `ecs` adapter. A fresh [`task::RunId`] is attached to the root span.
//! 3. **Construct infrastructure** — resolve the SDK configuration
//!    (region/profile → `aws-config` provider chain), build the `EcsClient`
//!    and optional log-link builder, and inject them into `LaunchExecutor`.
//! 4. **Terminate** — print the outcome's status line (stdout on success,
//!    stderr otherwise) and exit with the mapped code.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use ecs::{EcsClient, LogLinkBuilder};
use launch::{LaunchConfig, LaunchExecutor, PollConfig, SubmitConfig, EXIT_FAILURE};
use task::{
    ClusterName, ContainerName, NetworkConfig, ProcessOutcome, RunId, SubmissionRequest,
    TaskDefinition, Timestamp,
};

const EXIT_CODE_HELP: &str = "\
Exit codes:
  0    task completed with container exit code 0
  1    fatal submission rejection or unclassified wait failure
  253  submission retries exhausted on a retryable reason
  254  task stopped without reporting an exit code
  255  task never reached a terminal state within the wait budget
  N    any other container exit code, propagated verbatim";

/// Run a one-off containerized task on an ECS cluster, wait for it to stop,
/// and exit with the task's container exit code.
#[derive(Debug, Parser)]
#[command(name = "oneshot", version, after_help = EXIT_CODE_HELP)]
struct Args {
    /// Cluster to submit the task to (name or ARN).
    #[arg(long)]
    cluster: String,

    /// Task definition to launch (family, family:revision, or ARN).
    #[arg(long)]
    task_definition: String,

    /// Container whose exit code decides the process outcome.
    #[arg(long)]
    container: String,

    /// Replacement command for the target container, applied only for this
    /// run.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    command: Option<Vec<String>>,

    /// Number of task copies to start. Only the first task is observed.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Maximum submission attempts on retryable rejections.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    launch_retries: u32,

    /// Fixed delay between submission attempts, in seconds.
    #[arg(long, default_value_t = 60)]
    launch_backoff_secs: u64,

    /// Number of wait windows before giving up on the task stopping.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..))]
    wait_retries: u32,

    /// Length of a single wait window, in seconds. Total wait budget is
    /// this value times --wait-retries.
    #[arg(long, default_value_t = 600)]
    wait_timeout_secs: u64,

    /// Region override; defaults to the provider chain's resolution.
    #[arg(long)]
    region: Option<String>,

    /// Named credential profile; defaults to the provider chain's resolution.
    #[arg(long)]
    profile: Option<String>,

    /// Subnets for an awsvpc network configuration (comma-separated).
    #[arg(long, value_delimiter = ',')]
    subnets: Vec<String>,

    /// Security groups for the awsvpc network configuration (comma-separated).
    #[arg(long, value_delimiter = ',')]
    security_groups: Vec<String>,

    /// Assign a public IP to the task's network interface.
    #[arg(long)]
    assign_public_ip: bool,

    /// CloudWatch log group the task definition logs to; enables console
    /// log links in status messages.
    #[arg(long)]
    log_group: Option<String>,

    /// awslogs stream prefix configured on the task definition.
    #[arg(long, default_value = "ecs")]
    log_stream_prefix: String,

    /// Echo raw API responses and per-attempt detail.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let run_id = RunId::new_random();
    let span = info_span!("launch", run = %run_id);

    let outcome = match run(args).instrument(span).await {
        Ok(outcome) => outcome,
        // Configuration errors reach here before anything was submitted;
        // they share the generic failure code.
        Err(err) => ProcessOutcome {
            exit_code: EXIT_FAILURE,
            message: format!("{err:#}"),
        },
    };

    if outcome.is_success() {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    std::process::exit(outcome.exit_code);
}

async fn run(args: Args) -> Result<ProcessOutcome> {
    let cluster =
        ClusterName::new(&args.cluster).ok_or_else(|| anyhow!("--cluster must not be empty"))?;
    let task_definition = TaskDefinition::new(&args.task_definition)
        .ok_or_else(|| anyhow!("--task-definition must not be empty"))?;
    let container = ContainerName::new(&args.container)
        .ok_or_else(|| anyhow!("--container must not be empty"))?;

    let mut request = SubmissionRequest::new(cluster, task_definition, container.clone());
    if let Some(command) = args.command {
        request = request.with_command(command);
    }
    request = request.with_count(args.count);
    if !args.subnets.is_empty() {
        request = request.with_network(NetworkConfig {
            subnets: args.subnets,
            security_groups: args.security_groups,
            assign_public_ip: args.assign_public_ip,
        });
    }

    let sdk_config = ecs::load_sdk_config(args.region, args.profile).await;

    // Log links need both a resolved region and a configured log group;
    // without either, messages simply omit the link.
    let log_links = match (&args.log_group, ecs::resolved_region(&sdk_config)) {
        (Some(group), Some(region)) => Some(LogLinkBuilder::new(
            region,
            group.as_str(),
            args.log_stream_prefix.as_str(),
            container.clone(),
        )),
        _ => None,
    };

    let client = Arc::new(EcsClient::new(&sdk_config, container, log_links));
    let config = LaunchConfig {
        submit: SubmitConfig {
            max_attempts: args.launch_retries,
            backoff: Duration::from_secs(args.launch_backoff_secs),
        },
        poll: PollConfig {
            per_call_timeout: Duration::from_secs(args.wait_timeout_secs),
            max_wait_retries: args.wait_retries,
        },
    };

    info!(
        cluster = %request.cluster,
        task_definition = %request.task_definition,
        wait_budget_secs = config.poll.per_call_timeout.as_secs() * u64::from(config.poll.max_wait_retries),
        "launching task"
    );

    let started = Timestamp::now();
    let executor = LaunchExecutor::new(client, config);
    let outcome = executor.run(&request).await;

    info!(
        exit_code = outcome.exit_code,
        elapsed_secs = Timestamp::now().seconds_since(started),
        "run finished"
    );
    Ok(outcome)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Stderr keeps stdout clean for the final status line.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
