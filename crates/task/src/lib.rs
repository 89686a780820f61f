//! Core launch domain for OneShot.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, and cross-cutting error type used throughout the launch flow, plus
//! the port trait infrastructure crates implement. Infrastructure crates
//! supply the *how*; this crate defines the *what* and has no I/O
//! dependencies.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** The `launch` crate drives the
//! retry/poll/map flow against [`OrchestrationClient`]; the `ecs` crate
//! implements that trait against the real service.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`ClusterName`, `TaskArn`, etc.) |
//! | [`types`] | Shared value types (`SubmissionRequest`, `WaitOutcome`, etc.) |
//! | [`errors`] | Error and retry-policy types |
//! | [`ports`] | The `OrchestrationClient` facade trait |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{LaunchError, RetryPolicy, RETRYABLE_SUBMISSION_REASONS};
pub use identifiers::{ClusterName, ContainerName, RunId, TaskArn, TaskDefinition};
pub use ports::OrchestrationClient;
pub use types::{
    ContainerOverride, NetworkConfig, ProcessOutcome, SubmissionFailure, SubmissionOutcome,
    SubmissionRequest, TaskHandle, TaskResult, Timestamp, WaitOutcome,
};
