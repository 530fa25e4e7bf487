//! Loop iteration (task) and iteration space models.
//!
//! An iteration space is the ordered set of loop iterations to schedule.
//! Each iteration's identity is its index; the index doubles as the
//! locality key (neighbouring indices touch neighbouring data).

use serde::{Deserialize, Serialize};

use super::{sum_costs, Cost};
use crate::error::{SimError, SimResult};
use crate::validation::validate_costs;

/// One loop iteration.
///
/// Immutable once created: neither index nor cost changes during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Task<C> {
    /// Position in the iteration space (0-based).
    pub index: usize,
    /// Execution time of this iteration.
    pub cost: C,
}

impl<C: Cost> Task<C> {
    /// Creates a task.
    pub fn new(index: usize, cost: C) -> Self {
        Self { index, cost }
    }

    /// Whether `other` immediately follows this task in the iteration space.
    #[inline]
    pub fn precedes(&self, other: &Task<C>) -> bool {
        other.index == self.index + 1
    }
}

/// The ordered, read-only collection of loop iterations for one run.
///
/// # Example
/// ```
/// use u_loopsched::models::IterationSpace;
///
/// let space = IterationSpace::new(vec![5u64, 1, 3, 2, 4]).unwrap();
/// assert_eq!(space.len(), 5);
/// assert_eq!(space.total_cost(), 15);
/// assert_eq!(space.chunk_cost(&[0, 2]), Some(8));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct IterationSpace<C> {
    tasks: Vec<Task<C>>,
    prefix: Vec<C>,
}

impl<C: Cost> IterationSpace<C> {
    /// Builds an iteration space from per-iteration costs.
    ///
    /// Fails with [`SimError::InvalidWorkload`] if any cost is not strictly
    /// positive (NaN included).
    pub fn new(costs: impl Into<Vec<C>>) -> SimResult<Self> {
        let costs = costs.into();
        validate_costs(&costs).map_err(SimError::InvalidWorkload)?;

        let mut prefix = Vec::with_capacity(costs.len() + 1);
        let mut acc = C::ZERO;
        prefix.push(acc);
        for &c in &costs {
            acc = acc + c;
            prefix.push(acc);
        }

        let tasks = costs
            .into_iter()
            .enumerate()
            .map(|(index, cost)| Task::new(index, cost))
            .collect();

        Ok(Self { tasks, prefix })
    }

    /// Number of iterations.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the loop has no iterations.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in index order.
    pub fn tasks(&self) -> &[Task<C>] {
        &self.tasks
    }

    /// The task at `index`.
    pub fn get(&self, index: usize) -> Option<&Task<C>> {
        self.tasks.get(index)
    }

    /// Cost of the task at `index`.
    pub fn cost_of(&self, index: usize) -> Option<C> {
        self.tasks.get(index).map(|t| t.cost)
    }

    /// Sum of all iteration costs.
    pub fn total_cost(&self) -> C {
        self.prefix.last().copied().unwrap_or(C::ZERO)
    }

    /// Sum of the costs of the given indices, `None` if any is out of range.
    pub fn chunk_cost(&self, indices: &[usize]) -> Option<C> {
        indices
            .iter()
            .map(|&i| self.cost_of(i))
            .try_fold(C::ZERO, |acc, c| c.map(|c| acc + c))
    }

    /// Prefix sums: `prefix_sums()[k]` is the cost of tasks `0..k`.
    pub fn prefix_sums(&self) -> &[C] {
        &self.prefix
    }

    /// Lower bound on any makespan: `total / resource_count`.
    pub fn ideal_load(&self, resource_count: usize) -> f64 {
        if resource_count == 0 {
            return 0.0;
        }
        self.total_cost().to_f64() / resource_count as f64
    }

    /// Costs in index order.
    pub fn costs(&self) -> Vec<C> {
        self.tasks.iter().map(|t| t.cost).collect()
    }

    /// Sum of the costs of a task slice.
    pub fn sum_of(tasks: &[Task<C>]) -> C {
        sum_costs(tasks.iter().map(|t| t.cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_basics() {
        let space = IterationSpace::new(vec![2u64, 4, 6]).unwrap();
        assert_eq!(space.len(), 3);
        assert!(!space.is_empty());
        assert_eq!(space.total_cost(), 12);
        assert_eq!(space.prefix_sums(), &[0, 2, 6, 12]);
        assert_eq!(space.get(1), Some(&Task::new(1, 4)));
        assert_eq!(space.cost_of(3), None);
    }

    #[test]
    fn test_chunk_cost() {
        let space = IterationSpace::new(vec![1u32, 2, 3, 4]).unwrap();
        assert_eq!(space.chunk_cost(&[3, 0]), Some(5));
        assert_eq!(space.chunk_cost(&[]), Some(0));
        assert_eq!(space.chunk_cost(&[0, 9]), None);
    }

    #[test]
    fn test_empty_space() {
        let space = IterationSpace::<u64>::new(Vec::new()).unwrap();
        assert!(space.is_empty());
        assert_eq!(space.total_cost(), 0);
        assert!((space.ideal_load(4) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_non_positive_costs() {
        let err = IterationSpace::new(vec![3i64, 0, -2]).unwrap_err();
        match err {
            SimError::InvalidWorkload(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(IterationSpace::new(vec![1.0f64, f64::NAN]).is_err());
    }

    #[test]
    fn test_float_costs() {
        let space = IterationSpace::new(vec![0.5f64, 1.5, 2.0]).unwrap();
        assert!((space.total_cost() - 4.0).abs() < 1e-10);
        assert!((space.ideal_load(2) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_task_precedes() {
        let a = Task::new(3, 1u64);
        let b = Task::new(4, 1u64);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));
    }
}
