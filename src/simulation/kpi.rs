//! Run quality metrics (KPIs).
//!
//! Computes performance indicators from a finished run: the resource pool,
//! the assignment history, and the task -> resource mapping.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Largest resource busy time |
//! | Scheduler calls | Decisions in the assignment history |
//! | Locality score | Index-adjacent fraction of same-resource consecutive tasks |
//! | Resource changes | Index-adjacent task pairs placed on different resources |
//! | Lower bound | Total cost / resource count |
//! | Imbalance | Makespan / mean resource load |
//!
//! # Locality score
//!
//! For every resource, take the tasks it executed in assignment order and
//! look at each consecutive pair `(a, b)`. The pair is local when
//! `b == a + 1`. The score is local pairs over all pairs, across resources:
//! `1.0` for one contiguous block per resource, `0.0` when no resource ever
//! runs two neighbouring iterations back to back (round-robin of single
//! iterations). A run without any pair (every resource ran at most one
//! iteration) scores `1.0`.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::models::{sum_costs, AssignmentHistory, Cost, Resource, ResourcePool};

/// Run performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunKpi<C> {
    /// Completion time of the last-finishing resource.
    pub makespan: C,
    /// Scheduler calls that returned a chunk.
    pub scheduler_calls: usize,
    /// Data locality in `0.0..=1.0` (see module docs).
    pub locality_score: f64,
    /// Adjacent iterations split across resources.
    pub resource_changes: usize,
    /// Busy time per resource, ordered by id.
    pub resource_loads: Vec<C>,
    /// Sum of all iteration costs.
    pub total_cost: C,
    /// `total_cost / resource_count`; no schedule can beat it.
    pub lower_bound: f64,
    /// `makespan / lower_bound` (1.0 = perfect balance).
    pub imbalance: f64,
}

impl<C: Cost> RunKpi<C> {
    /// Computes KPIs from a run's final state.
    ///
    /// # Arguments
    /// * `pool` - Resources with their chunk histories.
    /// * `history` - Every decision of the run.
    /// * `mapping` - Resource id per task index.
    pub fn calculate(pool: &ResourcePool<C>, history: &AssignmentHistory<C>, mapping: &[usize]) -> Self {
        let makespan = pool.makespan();
        let resource_loads = pool.loads();
        let total_cost = sum_costs(resource_loads.iter().copied());

        let lower_bound = if pool.is_empty() {
            0.0
        } else {
            total_cost.to_f64() / pool.len() as f64
        };
        let imbalance = if lower_bound > 0.0 {
            makespan.to_f64() / lower_bound
        } else {
            1.0
        };

        Self {
            makespan,
            scheduler_calls: history.len(),
            locality_score: locality_score(pool.resources()),
            resource_changes: resource_changes(mapping),
            resource_loads,
            total_cost,
            lower_bound,
            imbalance,
        }
    }

    /// Whether the run stays within the given quality thresholds.
    pub fn meets_thresholds(&self, max_imbalance: f64, min_locality: f64) -> bool {
        self.imbalance <= max_imbalance && self.locality_score >= min_locality
    }
}

/// Fraction of same-resource consecutive task pairs that are index-adjacent.
pub fn locality_score<C: Cost>(resources: &[Resource<C>]) -> f64 {
    let mut pairs = 0usize;
    let mut local = 0usize;

    for r in resources {
        let mut previous: Option<usize> = None;
        for task in r.executed_tasks() {
            if let Some(p) = previous {
                pairs += 1;
                if task == p + 1 {
                    local += 1;
                }
            }
            previous = Some(task);
        }
    }

    if pairs == 0 {
        1.0
    } else {
        local as f64 / pairs as f64
    }
}

/// Number of index-adjacent task pairs mapped to different resources.
pub fn resource_changes(mapping: &[usize]) -> usize {
    mapping.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Per-resource loads from a task -> resource mapping.
///
/// Resources with no task report `ZERO`.
pub fn loads_from_mapping<C: Cost>(
    costs: &[C],
    mapping: &[usize],
    resource_count: usize,
) -> SimResult<Vec<C>> {
    if costs.len() != mapping.len() {
        return Err(SimError::MappingLength {
            mapping: mapping.len(),
            tasks: costs.len(),
        });
    }

    let mut loads = vec![C::ZERO; resource_count];
    for (&cost, &resource) in costs.iter().zip(mapping) {
        let slot = loads.get_mut(resource).ok_or(SimError::UnknownResource {
            resource,
            count: resource_count,
        })?;
        *slot = *slot + cost;
    }
    Ok(loads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Chunk};

    fn pool_with(chunks: &[(usize, Vec<usize>, u64)], count: usize) -> ResourcePool<u64> {
        let mut pool = ResourcePool::new(count);
        for (resource, tasks, cost) in chunks {
            pool.apply(*resource, Chunk::new(tasks.clone(), *cost)).unwrap();
        }
        pool
    }

    #[test]
    fn test_locality_contiguous_blocks() {
        let pool = pool_with(&[(0, vec![0, 1, 2], 3), (1, vec![3, 4, 5], 3)], 2);
        assert!((locality_score(pool.resources()) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_locality_round_robin_singletons() {
        let chunks: Vec<(usize, Vec<usize>, u64)> =
            (0..6).map(|i| (i % 2, vec![i], 1)).collect();
        let pool = pool_with(&chunks, 2);
        assert!((locality_score(pool.resources()) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_locality_partial() {
        // R0 runs 0,1 then 4,5: pairs (0,1) (1,4) (4,5) -> 2/3
        let pool = pool_with(&[(0, vec![0, 1], 2), (1, vec![2, 3], 2), (0, vec![4, 5], 2)], 2);
        assert!((locality_score(pool.resources()) - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_locality_no_pairs() {
        let pool = pool_with(&[(0, vec![0], 1), (1, vec![1], 1)], 3);
        assert!((locality_score(pool.resources()) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_resource_changes() {
        assert_eq!(resource_changes(&[0, 1, 2, 0, 1, 2, 1, 2, 0, 2]), 9);
        assert_eq!(resource_changes(&[0, 0, 1, 1, 2, 2, 0, 0, 2, 2]), 4);
        assert_eq!(resource_changes(&[]), 0);
    }

    #[test]
    fn test_loads_from_mapping() {
        let costs: Vec<u64> = (1..=10).collect();
        let mapping = [0, 0, 0, 0, 1, 1, 1, 1, 3, 3];
        let loads = loads_from_mapping(&costs, &mapping, 5).unwrap();
        assert_eq!(loads, vec![10, 26, 0, 19, 0]);
    }

    #[test]
    fn test_loads_from_mapping_errors() {
        let err = loads_from_mapping(&[1u64, 2], &[0], 2).unwrap_err();
        assert_eq!(err, SimError::MappingLength { mapping: 1, tasks: 2 });
        assert!(!err.is_configuration());
        assert_eq!(
            loads_from_mapping(&[1u64], &[4], 2),
            Err(SimError::UnknownResource {
                resource: 4,
                count: 2
            })
        );
    }

    #[test]
    fn test_kpi_calculate() {
        let pool = pool_with(&[(0, vec![0, 1], 6), (1, vec![2], 2), (1, vec![3], 2)], 2);
        let mut history = AssignmentHistory::new();
        for (call, (resource, tasks, start, end)) in
            [(0, vec![0, 1], 0, 6), (1, vec![2], 0, 2), (1, vec![3], 2, 4)]
                .into_iter()
                .enumerate()
        {
            history.push(Assignment {
                call: call + 1,
                resource,
                chunk: Chunk::new(tasks, end - start),
                start,
                end,
            });
        }

        let kpi = RunKpi::calculate(&pool, &history, &[0, 0, 1, 1]);
        assert_eq!(kpi.makespan, 6);
        assert_eq!(kpi.scheduler_calls, 3);
        assert_eq!(kpi.total_cost, 10);
        assert_eq!(kpi.resource_changes, 1);
        assert!((kpi.lower_bound - 5.0).abs() < 1e-10);
        assert!((kpi.imbalance - 1.2).abs() < 1e-10);
        assert!((kpi.locality_score - 1.0).abs() < 1e-10);
        assert!(kpi.meets_thresholds(1.2, 1.0));
        assert!(!kpi.meets_thresholds(1.1, 0.0));
    }

    #[test]
    fn test_kpi_empty_run() {
        let pool = ResourcePool::<u64>::new(3);
        let kpi = RunKpi::calculate(&pool, &AssignmentHistory::new(), &[]);
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.scheduler_calls, 0);
        assert!((kpi.imbalance - 1.0).abs() < 1e-10);
        assert!((kpi.locality_score - 1.0).abs() < 1e-10);
    }
}
