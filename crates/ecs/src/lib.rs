//! OneShot ECS infrastructure adapter.
//!
//! Implements the [`task::OrchestrationClient`] trait over the AWS SDK:
//! RunTask for submission, the tasks-stopped waiter for terminal-state
//! waiting, and DescribeTasks for the final result. Credential and region
//! resolution is delegated to `aws-config`'s default provider chain.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. All SDK
//! details (request builders, response accessors, waiter error shapes) are
//! handled here; the `launch` crate never sees them.

pub mod client;
pub mod config;
pub mod logs;

pub use client::EcsClient;
pub use config::{load_sdk_config, resolved_region};
pub use logs::{task_id_from_arn, LogLinkBuilder};
