//! Simulation error types.
//!
//! Every error is programmer-facing: a misconfigured policy or a policy
//! that returned an illegal decision. None of them are transient, so the
//! driver never retries.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while building schedulers or running a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid workload: {}", summarize(.0))]
    InvalidWorkload(Vec<ValidationError>),

    #[error("task {task} assigned to resource {resource} but already placed on resource {previous}")]
    DoubleAssignment {
        task: usize,
        resource: usize,
        previous: usize,
    },

    #[error("scheduler '{policy}' returned no decision with {remaining} task(s) unassigned")]
    StalledScheduler { policy: String, remaining: usize },

    #[error("decision references task {task}, iteration space has {len} task(s)")]
    UnknownTask { task: usize, len: usize },

    #[error("mapping covers {mapping} task(s), workload has {tasks}")]
    MappingLength { mapping: usize, tasks: usize },

    #[error("decision targets resource {resource}, pool has {count} resource(s)")]
    UnknownResource { resource: usize, count: usize },

    #[error("scheduler '{policy}' returned an empty chunk for resource {resource}")]
    EmptyChunk { policy: String, resource: usize },
}

/// Result alias used across the crate.
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether this error was raised before any scheduling call happened.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_) | Self::InvalidWorkload(_)
        )
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}
