//! Loop scheduling policies.
//!
//! Every policy implements [`Scheduler`]: given a read-only snapshot of
//! the unassigned iterations and of the resource states, it returns the
//! next chunk and the resource that receives it. One call yields at most
//! one decision.
//!
//! # Policies
//!
//! | Policy | Chunking | Target resource | Calls |
//! |--------|----------|-----------------|-------|
//! | [`Static`] | fixed `chunk_size` | round-robin | `ceil(N / chunk_size)` |
//! | [`Static::compact`] | `N / P` blocks | block order | `min(N, P)` |
//! | [`Lpt`] | one task, largest first | least loaded | `N` |
//! | [`Dynamic`] | fixed `chunk_size` | least loaded | `ceil(N / chunk_size)` |
//! | [`Guided`] | `remaining / P`, floored at `min_chunk_size` | least loaded | varies |
//! | [`RecursiveBipartition`] | cost-balanced halves | leaf order | `<= P` |
//! | [`Nicol`] | optimal contiguous partition | part order | `<= P` |
//!
//! # References
//!
//! - OpenMP Architecture Review Board (2018), "OpenMP API 5.0", §2.9.2 (schedule clause)
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT)
//! - Nicol (1994), "Rectilinear Partitioning of Irregular Data Parallel Computations"
//! - Pinar & Aykanat (2004), "Fast optimal load balancing algorithms for 1D partitioning"

mod bipartition;
mod config;
mod dynamic;
mod guided;
mod lpt;
mod nicol;
mod static_chunk;

pub use bipartition::RecursiveBipartition;
pub use config::{Policy, SchedulerConfig};
pub use dynamic::Dynamic;
pub use guided::Guided;
pub use lpt::Lpt;
pub use nicol::Nicol;
pub use static_chunk::Static;

use std::collections::VecDeque;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::models::{least_loaded, Cost, Resource, Task};

/// Read-only snapshot handed to a scheduler on each call.
#[derive(Debug, Clone, Copy)]
pub struct SchedulingView<'a, C> {
    /// Unassigned tasks, in ascending index order.
    pub remaining: &'a [Task<C>],
    /// Resource states, ordered by id.
    pub resources: &'a [Resource<C>],
}

impl<'a, C: Cost> SchedulingView<'a, C> {
    /// Creates a view.
    pub fn new(remaining: &'a [Task<C>], resources: &'a [Resource<C>]) -> Self {
        Self {
            remaining,
            resources,
        }
    }

    /// Whether every task has been assigned.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Id of the least-loaded resource (ties: lowest id).
    pub fn least_loaded(&self) -> Option<usize> {
        least_loaded(self.resources)
    }

    /// Indices of the first `count` remaining tasks.
    pub fn leading_indices(&self, count: usize) -> Vec<usize> {
        self.remaining.iter().take(count).map(|t| t.index).collect()
    }
}

/// A scheduler's answer: which tasks go to which resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDecision {
    /// Target resource id.
    pub resource: usize,
    /// Task indices in execution order.
    pub tasks: Vec<usize>,
}

impl ChunkDecision {
    /// Creates a decision.
    pub fn new(resource: usize, tasks: Vec<usize>) -> Self {
        Self { resource, tasks }
    }
}

/// A loop scheduling policy.
///
/// Implementations must treat the view as a snapshot: it is rebuilt by the
/// driver after every applied decision.
///
/// # Contract
/// - Return `None` only when `view.remaining` is empty.
/// - Never return a task index that is not in `view.remaining`.
/// - Return exactly one decision per call.
pub trait Scheduler<C: Cost>: Debug {
    /// Policy name (e.g., "Static", "LPT").
    fn name(&self) -> &'static str;

    /// Number of resources this scheduler was configured for.
    fn resource_count(&self) -> usize;

    /// Produces the next decision, or `None` once nothing is left.
    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision>;
}

impl<C: Cost, S: Scheduler<C> + ?Sized> Scheduler<C> for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_count(&self) -> usize {
        (**self).resource_count()
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        (**self).next_chunk(view)
    }
}

/// Decisions computed up front and replayed one per call.
///
/// Built lazily from the first view so that construction only needs the
/// configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct Plan {
    decisions: Option<VecDeque<ChunkDecision>>,
}

impl Plan {
    /// Pops the next planned decision, building the plan on first use.
    ///
    /// Empty chunks are dropped while planning.
    pub(crate) fn next_or_build<F>(&mut self, build: F) -> Option<ChunkDecision>
    where
        F: FnOnce() -> Vec<ChunkDecision>,
    {
        self.decisions
            .get_or_insert_with(|| {
                build()
                    .into_iter()
                    .filter(|d| !d.tasks.is_empty())
                    .collect()
            })
            .pop_front()
    }
}

pub(crate) fn require_resources(resource_count: usize) -> SimResult<()> {
    if resource_count == 0 {
        return Err(SimError::config("resource_count must be positive"));
    }
    Ok(())
}

pub(crate) fn require_chunk(name: &str, value: usize) -> SimResult<()> {
    if value == 0 {
        return Err(SimError::config(format!("{name} must be positive")));
    }
    Ok(())
}
