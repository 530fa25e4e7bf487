//! Chunks, scheduling decisions, and the assignment history.
//!
//! The assignment history is the append-only log of every decision made
//! during a run and the sole input of the KPI computation.

use serde::{Deserialize, Serialize};

use super::Cost;

/// Group of iterations handed to a resource in one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk<C> {
    /// Task indices in execution order.
    pub tasks: Vec<usize>,
    /// Sum of the tasks' costs.
    pub cost: C,
}

impl<C: Cost> Chunk<C> {
    /// Creates a chunk with a precomputed cost.
    pub fn new(tasks: Vec<usize>, cost: C) -> Self {
        Self { tasks, cost }
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the chunk holds no task.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// First task index.
    pub fn first(&self) -> Option<usize> {
        self.tasks.first().copied()
    }

    /// Last task index.
    pub fn last(&self) -> Option<usize> {
        self.tasks.last().copied()
    }

    /// Whether the tasks form an ascending run of consecutive indices.
    pub fn is_contiguous(&self) -> bool {
        self.tasks.windows(2).all(|w| w[1] == w[0] + 1)
    }
}

/// One scheduling decision: a chunk placed on a resource.
///
/// `start` and `end` are the resource's busy time before and after the
/// chunk, i.e. the logical interval during which the chunk executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment<C> {
    /// 1-based scheduler call that produced this decision.
    pub call: usize,
    /// Target resource id.
    pub resource: usize,
    /// Assigned chunk.
    pub chunk: Chunk<C>,
    /// Logical start time.
    pub start: C,
    /// Logical end time.
    pub end: C,
}

impl<C: Cost> Assignment<C> {
    /// Chunk execution time (`end - start`).
    #[inline]
    pub fn duration(&self) -> C {
        self.end - self.start
    }
}

/// Append-only, time-ordered log of scheduling decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentHistory<C> {
    assignments: Vec<Assignment<C>>,
    complete: bool,
}

impl<C> Default for AssignmentHistory<C> {
    fn default() -> Self {
        Self {
            assignments: Vec::new(),
            complete: false,
        }
    }
}

impl<C: Cost> AssignmentHistory<C> {
    /// Creates an empty, incomplete history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, assignment: Assignment<C>) {
        self.assignments.push(assignment);
    }

    pub(crate) fn finalize(&mut self) {
        self.complete = true;
    }

    /// Whether the run that produced this history finished normally.
    ///
    /// An aborted run leaves a partial, incomplete history behind.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of decisions.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no decision was made.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Decisions in the order they were made.
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment<C>> {
        self.assignments.iter()
    }

    /// Decisions as a slice.
    pub fn as_slice(&self) -> &[Assignment<C>] {
        &self.assignments
    }

    /// Decisions targeting one resource.
    pub fn for_resource(&self, resource: usize) -> Vec<&Assignment<C>> {
        self.assignments
            .iter()
            .filter(|a| a.resource == resource)
            .collect()
    }

    /// Chunk sizes in decision order.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.chunk.len()).collect()
    }

    /// Latest end time across decisions.
    pub fn makespan(&self) -> C {
        self.assignments
            .iter()
            .map(|a| a.end)
            .fold(C::ZERO, |max, t| if t > max { t } else { max })
    }
}

impl<'a, C> IntoIterator for &'a AssignmentHistory<C> {
    type Item = &'a Assignment<C>;
    type IntoIter = std::slice::Iter<'a, Assignment<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> AssignmentHistory<u64> {
        let mut h = AssignmentHistory::new();
        h.push(Assignment {
            call: 1,
            resource: 0,
            chunk: Chunk::new(vec![0, 1], 6),
            start: 0,
            end: 6,
        });
        h.push(Assignment {
            call: 2,
            resource: 1,
            chunk: Chunk::new(vec![2], 6),
            start: 0,
            end: 6,
        });
        h.push(Assignment {
            call: 3,
            resource: 0,
            chunk: Chunk::new(vec![3], 8),
            start: 6,
            end: 14,
        });
        h
    }

    #[test]
    fn test_chunk_contiguity() {
        assert!(Chunk::new(vec![4, 5, 6], 3u64).is_contiguous());
        assert!(Chunk::new(vec![4], 1u64).is_contiguous());
        assert!(!Chunk::new(vec![4, 6], 2u64).is_contiguous());
        assert!(!Chunk::new(vec![5, 4], 2u64).is_contiguous());
    }

    #[test]
    fn test_chunk_bounds() {
        let c = Chunk::new(vec![7, 8, 9], 3u64);
        assert_eq!(c.len(), 3);
        assert_eq!(c.first(), Some(7));
        assert_eq!(c.last(), Some(9));
        assert!(Chunk::<u64>::new(vec![], 0).is_empty());
    }

    #[test]
    fn test_history_queries() {
        let h = sample_history();
        assert_eq!(h.len(), 3);
        assert_eq!(h.for_resource(0).len(), 2);
        assert_eq!(h.chunk_sizes(), vec![2, 1, 1]);
        assert_eq!(h.makespan(), 14);
        assert_eq!(h.as_slice()[2].duration(), 8);
        assert_eq!((&h).into_iter().count(), 3);
    }

    #[test]
    fn test_history_completion_flag() {
        let mut h = sample_history();
        assert!(!h.is_complete());
        h.finalize();
        assert!(h.is_complete());
    }
}
