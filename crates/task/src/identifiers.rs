//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging — for example —
//! a [`ClusterName`] with a [`TaskDefinition`] even though both are `String` under
//! the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (orchestration-service names and ARNs)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the cluster a task is submitted to.
    ///
    /// Either the short cluster name (e.g. `"batch"`) or the full cluster ARN;
    /// the orchestration API accepts both and OneShot passes the value through
    /// unmodified.
    ClusterName
}

string_id! {
    /// Identifies the task definition to launch.
    ///
    /// A `family`, `family:revision`, or full task-definition ARN. When the
    /// revision is omitted the orchestration service resolves the latest
    /// active revision.
    TaskDefinition
}

string_id! {
    /// Identifies one container within a task definition.
    ///
    /// Used both to target the command override and to select which
    /// container's exit code decides the process outcome.
    ContainerName
}

string_id! {
    /// The ARN assigned to a running task by the orchestration service.
    ///
    /// Opaque to OneShot: it is captured from the submission response and
    /// handed back verbatim to the wait and describe operations. The final
    /// path segment (the task id) is extracted only when building log links.
    TaskArn
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single launch run (one invocation of the CLI).
///
/// Generated fresh for every invocation; attached to the root tracing span so
/// all activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`RunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_rejected() {
        assert!(ClusterName::new("").is_none());
        assert!(TaskArn::new("").is_none());
    }

    #[test]
    fn identifier_roundtrip() {
        let cluster = ClusterName::new("batch").unwrap();
        assert_eq!(cluster.as_str(), "batch");
        assert_eq!(cluster.to_string(), "batch");
    }
}
