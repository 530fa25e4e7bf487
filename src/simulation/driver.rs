//! Simulation driver.
//!
//! Runs one policy over one iteration space:
//!
//! 1. Build a view of the unassigned tasks and the resource states.
//! 2. Ask the scheduler for the next chunk.
//! 3. Validate the decision, charge the chunk cost to the target resource,
//!    and record it in the assignment history.
//!
//! The loop ends when the scheduler reports nothing left (`Finished`) or
//! when a decision is rejected (`Aborted`). An aborted run keeps its
//! partial history, flagged incomplete.
//!
//! # Rejected decisions
//!
//! | Decision | Error |
//! |----------|-------|
//! | `resource >= P` | [`SimError::UnknownResource`] |
//! | no tasks | [`SimError::EmptyChunk`] |
//! | index outside the space | [`SimError::UnknownTask`] |
//! | task already placed (or repeated in the chunk) | [`SimError::DoubleAssignment`] |
//! | `None` while tasks remain | [`SimError::StalledScheduler`] |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::kpi::RunKpi;
use crate::error::{SimError, SimResult};
use crate::models::{
    Assignment, AssignmentHistory, Chunk, Cost, IterationSpace, Resource, ResourcePool, Task,
};
use crate::scheduler::{ChunkDecision, Scheduler, SchedulerConfig, SchedulingView};

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimState {
    /// Created, no scheduler call made yet.
    Ready,
    /// At least one call made, tasks may remain.
    Running,
    /// Every task assigned; terminal.
    Finished,
    /// A decision was rejected; terminal.
    Aborted,
}

impl SimState {
    /// Whether no further step can change the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, SimState::Finished | SimState::Aborted)
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult<C> {
    /// Name of the policy that produced the run.
    pub policy: String,
    /// Run metrics.
    pub kpi: RunKpi<C>,
    /// Every decision, in call order.
    pub assignment_history: AssignmentHistory<C>,
    /// Resource id per task index.
    pub mapping: Vec<usize>,
    /// Final resource states, ordered by id.
    pub resources: Vec<Resource<C>>,
}

impl<C: Cost> SimulationResult<C> {
    /// Completion time of the last-finishing resource.
    pub fn makespan(&self) -> C {
        self.kpi.makespan
    }

    /// Number of resources in the run.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Tasks executed by `resource`, in execution order.
    pub fn tasks_of(&self, resource: usize) -> Vec<usize> {
        self.resources
            .get(resource)
            .map(|r| r.executed_tasks().collect())
            .unwrap_or_default()
    }
}

/// A single run of one scheduler over one iteration space.
///
/// # Example
/// ```
/// use u_loopsched::models::IterationSpace;
/// use u_loopsched::scheduler::Lpt;
/// use u_loopsched::simulation::{SimState, Simulation};
///
/// let space = IterationSpace::new(vec![5u64, 1, 3, 2, 4]).unwrap();
/// let mut sim = Simulation::new(space, Lpt::new(2).unwrap()).unwrap();
/// assert_eq!(sim.state(), SimState::Ready);
///
/// let result = sim.run().unwrap();
/// assert_eq!(sim.state(), SimState::Finished);
/// assert_eq!(result.kpi.resource_loads, vec![8, 7]);
/// ```
#[derive(Debug)]
pub struct Simulation<C, S> {
    space: IterationSpace<C>,
    scheduler: S,
    pool: ResourcePool<C>,
    remaining: Vec<Task<C>>,
    mapping: Vec<Option<usize>>,
    history: AssignmentHistory<C>,
    state: SimState,
    failure: Option<SimError>,
}

impl<C: Cost, S: Scheduler<C>> Simulation<C, S> {
    /// Prepares a run with one idle resource per configured scheduler resource.
    pub fn new(space: IterationSpace<C>, scheduler: S) -> SimResult<Self> {
        let resource_count = scheduler.resource_count();
        if resource_count == 0 {
            return Err(SimError::config("resource_count must be positive"));
        }

        Ok(Self {
            pool: ResourcePool::new(resource_count),
            remaining: space.tasks().to_vec(),
            mapping: vec![None; space.len()],
            history: AssignmentHistory::new(),
            state: SimState::Ready,
            failure: None,
            space,
            scheduler,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// The iteration space being scheduled.
    pub fn space(&self) -> &IterationSpace<C> {
        &self.space
    }

    /// The scheduler driving the run.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Resource states so far.
    pub fn pool(&self) -> &ResourcePool<C> {
        &self.pool
    }

    /// Decisions so far. Incomplete unless the run finished.
    pub fn history(&self) -> &AssignmentHistory<C> {
        &self.history
    }

    /// Tasks not yet assigned, in index order.
    pub fn remaining(&self) -> &[Task<C>] {
        &self.remaining
    }

    /// Resource per task index, `None` while unassigned.
    pub fn mapping(&self) -> &[Option<usize>] {
        &self.mapping
    }

    /// The error that aborted the run, if any.
    pub fn failure(&self) -> Option<&SimError> {
        self.failure.as_ref()
    }

    /// Scheduler calls that produced a chunk.
    pub fn scheduler_calls(&self) -> usize {
        self.history.len()
    }

    /// Performs one scheduler call and applies its decision.
    ///
    /// Returns the state after the call. Once finished, `step` is a no-op
    /// returning `Finished`; once aborted, it repeats the aborting error.
    pub fn step(&mut self) -> SimResult<SimState> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        if self.state == SimState::Finished {
            return Ok(self.state);
        }
        self.state = SimState::Running;

        let view = SchedulingView::new(&self.remaining, self.pool.resources());
        let decision = self.scheduler.next_chunk(&view);

        let outcome = match decision {
            Some(decision) => self.apply(decision),
            None if self.remaining.is_empty() => {
                self.finish();
                Ok(())
            }
            None => Err(SimError::StalledScheduler {
                policy: self.scheduler.name().to_string(),
                remaining: self.remaining.len(),
            }),
        };

        match outcome {
            Ok(()) => Ok(self.state),
            Err(e) => {
                self.state = SimState::Aborted;
                warn!(
                    policy = self.scheduler.name(),
                    calls = self.history.len(),
                    remaining = self.remaining.len(),
                    error = %e,
                    "simulation aborted"
                );
                self.failure = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Steps until the run finishes, then reports the result.
    ///
    /// On error the run is left `Aborted` and [`Simulation::history`]
    /// still exposes the decisions applied before the failure.
    pub fn run(&mut self) -> SimResult<SimulationResult<C>> {
        while self.step()? != SimState::Finished {}
        Ok(self.result())
    }

    fn apply(&mut self, decision: ChunkDecision) -> SimResult<()> {
        let policy = self.scheduler.name();
        let ChunkDecision { resource, tasks } = decision;

        if resource >= self.pool.len() {
            return Err(SimError::UnknownResource {
                resource,
                count: self.pool.len(),
            });
        }
        if tasks.is_empty() {
            return Err(SimError::EmptyChunk {
                policy: policy.to_string(),
                resource,
            });
        }

        let mut seen = HashSet::with_capacity(tasks.len());
        for &task in &tasks {
            let slot = self.mapping.get(task).ok_or(SimError::UnknownTask {
                task,
                len: self.space.len(),
            })?;
            if let Some(previous) = *slot {
                return Err(SimError::DoubleAssignment {
                    task,
                    resource,
                    previous,
                });
            }
            if !seen.insert(task) {
                return Err(SimError::DoubleAssignment {
                    task,
                    resource,
                    previous: resource,
                });
            }
        }

        let cost = self
            .space
            .chunk_cost(&tasks)
            .ok_or(SimError::UnknownTask {
                task: tasks.iter().copied().max().unwrap_or_default(),
                len: self.space.len(),
            })?;
        let chunk = Chunk::new(tasks, cost);
        let (start, end) = self
            .pool
            .apply(resource, chunk.clone())
            .ok_or(SimError::UnknownResource {
                resource,
                count: self.pool.len(),
            })?;

        for &task in &chunk.tasks {
            self.mapping[task] = Some(resource);
        }
        self.remaining.retain(|t| !seen.contains(&t.index));

        let call = self.history.len() + 1;
        debug!(
            policy,
            call,
            resource,
            size = chunk.len(),
            ?start,
            ?end,
            remaining = self.remaining.len(),
            "chunk assigned"
        );
        self.history.push(Assignment {
            call,
            resource,
            chunk,
            start,
            end,
        });
        Ok(())
    }

    fn finish(&mut self) {
        self.history.finalize();
        self.state = SimState::Finished;
        info!(
            policy = self.scheduler.name(),
            tasks = self.space.len(),
            resources = self.pool.len(),
            calls = self.history.len(),
            makespan = ?self.pool.makespan(),
            "simulation finished"
        );
    }

    fn result(&self) -> SimulationResult<C> {
        let mapping: Vec<usize> = self.mapping.iter().flatten().copied().collect();
        SimulationResult {
            policy: self.scheduler.name().to_string(),
            kpi: RunKpi::calculate(&self.pool, &self.history, &mapping),
            assignment_history: self.history.clone(),
            mapping,
            resources: self.pool.resources().to_vec(),
        }
    }
}

/// Runs `scheduler` over `costs` and returns the finished result.
///
/// # Example
/// ```
/// use u_loopsched::scheduler::Dynamic;
/// use u_loopsched::simulation::simulate;
///
/// let result = simulate(vec![2u64, 4, 6, 8, 5, 3, 9, 2, 4, 6], Dynamic::new(3, 1).unwrap()).unwrap();
/// assert_eq!(result.kpi.scheduler_calls, 10);
/// assert_eq!(result.makespan(), 18);
/// ```
pub fn simulate<C: Cost, S: Scheduler<C>>(
    costs: impl Into<Vec<C>>,
    scheduler: S,
) -> SimResult<SimulationResult<C>> {
    let space = IterationSpace::new(costs)?;
    Simulation::new(space, scheduler)?.run()
}

/// Builds the scheduler described by `config` and runs it over `costs`.
pub fn simulate_config<C: Cost>(
    costs: impl Into<Vec<C>>,
    config: &SchedulerConfig,
) -> SimResult<SimulationResult<C>> {
    let scheduler = config.build::<C>()?;
    simulate(costs, scheduler)
}
