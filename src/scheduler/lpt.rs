//! Largest Processing Time first (list scheduling).
//!
//! # Algorithm
//!
//! On every call, pick the most expensive remaining iteration (ties: lowest
//! index) and place it alone on the least-loaded resource (ties: lowest id).
//!
//! # Complexity
//! O(N + P) per call, O(N * (N + P)) per run.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies":
//! makespan <= (4/3 - 1/(3P)) * optimal.

use super::{require_resources, ChunkDecision, Scheduler, SchedulingView};
use crate::error::SimResult;
use crate::models::{Cost, Task};

/// Greedy LPT list scheduler, one iteration per call.
#[derive(Debug, Clone)]
pub struct Lpt {
    resource_count: usize,
}

impl Lpt {
    /// Creates an LPT scheduler for `resource_count` resources.
    pub fn new(resource_count: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        Ok(Self { resource_count })
    }
}

/// Largest task; equal costs go to the lowest index.
fn largest<C: Cost>(tasks: &[Task<C>]) -> Option<&Task<C>> {
    tasks.iter().min_by(|a, b| {
        b.cost
            .compare(&a.cost)
            .then_with(|| a.index.cmp(&b.index))
    })
}

impl<C: Cost> Scheduler<C> for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        let task = largest(view.remaining)?;
        let resource = view.least_loaded()?;
        Some(ChunkDecision::new(resource, vec![task.index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::drive;

    #[test]
    fn test_lpt_order_and_placement() {
        let mut lpt = Lpt::new(2).unwrap();
        let (decisions, loads) = drive(vec![5u64, 1, 3, 2, 4], &mut lpt);

        assert_eq!(
            decisions,
            vec![
                ChunkDecision::new(0, vec![0]), // 5 -> R0 (5)
                ChunkDecision::new(1, vec![4]), // 4 -> R1 (4)
                ChunkDecision::new(1, vec![2]), // 3 -> R1 (7)
                ChunkDecision::new(0, vec![3]), // 2 -> R0 (7)
                ChunkDecision::new(0, vec![1]), // 1 -> tie, lowest id
            ]
        );
        assert_eq!(loads, vec![8, 7]);
    }

    #[test]
    fn test_equal_costs_break_by_index() {
        let tasks = vec![Task::new(4, 3u64), Task::new(1, 3), Task::new(2, 1)];
        assert_eq!(largest(&tasks).map(|t| t.index), Some(1));

        let tasks = vec![Task::new(9, 2u64), Task::new(6, 5), Task::new(3, 5)];
        assert_eq!(largest(&tasks).map(|t| t.index), Some(3));

        let mut lpt = Lpt::new(3).unwrap();
        let (decisions, _) = drive(vec![2u64, 2, 2], &mut lpt);
        let order: Vec<(usize, usize)> = decisions
            .iter()
            .map(|d| (d.tasks[0], d.resource))
            .collect();
        assert_eq!(order, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_float_costs() {
        let mut lpt = Lpt::new(2).unwrap();
        let (_, loads) = drive(vec![0.5f64, 2.5, 1.0, 1.5], &mut lpt);
        // 2.5 -> R0, 1.5 -> R1, 1.0 -> R1 (2.5), 0.5 -> R0 (3.0)
        assert!((loads[0] - 3.0).abs() < 1e-10);
        assert!((loads[1] - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_zero_resources_rejected() {
        assert!(Lpt::new(0).is_err());
    }
}
