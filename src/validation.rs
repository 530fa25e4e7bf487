//! Input and run validation.
//!
//! Checks the structural integrity of a workload before simulation and of
//! a finished run afterwards. Detects:
//! - Non-positive (or NaN) iteration costs
//! - Tasks assigned twice, never assigned, or out of range
//! - Chunk costs that disagree with the iteration space
//! - Resource busy times that disagree with their chunk history
//!
//! All checks collect every problem instead of stopping at the first one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{sum_costs, AssignmentHistory, Cost, IterationSpace, ResourcePool};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// An iteration cost is zero, negative, or NaN.
    NonPositiveCost,
    /// A decision references a task index outside the iteration space.
    UnknownTask,
    /// A task appears in more than one chunk (or twice in one chunk).
    DuplicateTask,
    /// A task was never assigned.
    MissingTask,
    /// A decision references a resource outside the pool.
    UnknownResource,
    /// A chunk's recorded cost differs from the sum of its task costs.
    ChunkCostMismatch,
    /// A resource's busy time differs from the sum of its chunk costs.
    BusyTimeMismatch,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates iteration costs: every cost must be strictly positive.
pub fn validate_costs<C: Cost>(costs: &[C]) -> ValidationResult {
    let errors: Vec<ValidationError> = costs
        .iter()
        .enumerate()
        .filter(|(_, c)| !(**c > C::ZERO))
        .map(|(i, c)| {
            ValidationError::new(
                ValidationErrorKind::NonPositiveCost,
                format!("task {i} has non-positive cost {c:?}"),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a run against the iteration space it was produced from.
///
/// Checks:
/// 1. Every decision targets an existing resource
/// 2. Every task index is in range and appears exactly once
/// 3. Every chunk cost equals the sum of its task costs
/// 4. Every resource's busy time equals the sum of its chunk costs
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_run<C: Cost>(
    space: &IterationSpace<C>,
    pool: &ResourcePool<C>,
    history: &AssignmentHistory<C>,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = vec![false; space.len()];

    for a in history {
        if a.resource >= pool.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownResource,
                format!("call {} targets unknown resource {}", a.call, a.resource),
            ));
        }

        for &task in &a.chunk.tasks {
            match seen.get_mut(task) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTask,
                    format!("call {} references unknown task {task}", a.call),
                )),
                Some(true) => errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateTask,
                    format!("task {task} assigned more than once (call {})", a.call),
                )),
                Some(flag) => *flag = true,
            }
        }

        if let Some(expected) = space.chunk_cost(&a.chunk.tasks) {
            if expected != a.chunk.cost {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ChunkCostMismatch,
                    format!(
                        "call {} records chunk cost {:?}, tasks sum to {expected:?}",
                        a.call, a.chunk.cost
                    ),
                ));
            }
        }
    }

    for (task, _) in seen.iter().enumerate().filter(|(_, s)| !**s) {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingTask,
            format!("task {task} was never assigned"),
        ));
    }

    for r in pool.resources() {
        let expected = sum_costs(r.history.iter().map(|c| c.cost));
        if expected != r.busy_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::BusyTimeMismatch,
                format!(
                    "resource {} busy time {:?}, chunks sum to {expected:?}",
                    r.id, r.busy_time
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
