//! Resource (worker) and resource pool models.
//!
//! Resources are identical workers executing chunks of loop iterations.
//! Time is logical: a resource's busy time is the sum of the costs of
//! every chunk it has received.

use serde::{Deserialize, Serialize};

use super::{Chunk, Cost};

/// A worker that executes chunks.
///
/// Owned by a [`ResourcePool`]; only the simulation driver mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<C> {
    /// Resource identifier (0-based, dense).
    pub id: usize,
    /// Sum of the costs of all chunks received so far.
    pub busy_time: C,
    /// Chunks in the order they were assigned.
    pub history: Vec<Chunk<C>>,
}

impl<C: Cost> Resource<C> {
    /// Creates an idle resource.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            busy_time: C::ZERO,
            history: Vec::new(),
        }
    }

    /// Number of chunks received.
    pub fn chunk_count(&self) -> usize {
        self.history.len()
    }

    /// Number of iterations executed.
    pub fn task_count(&self) -> usize {
        self.history.iter().map(Chunk::len).sum()
    }

    /// Whether the resource never received work.
    pub fn is_idle(&self) -> bool {
        self.history.is_empty()
    }

    /// Task indices in execution order.
    pub fn executed_tasks(&self) -> impl Iterator<Item = usize> + '_ {
        self.history.iter().flat_map(|c| c.tasks.iter().copied())
    }

    fn push(&mut self, chunk: Chunk<C>) {
        self.busy_time = self.busy_time + chunk.cost;
        self.history.push(chunk);
    }
}

/// Fixed-size set of identical resources.
///
/// # Example
/// ```
/// use u_loopsched::models::ResourcePool;
///
/// let pool = ResourcePool::<u64>::new(3);
/// assert_eq!(pool.len(), 3);
/// assert_eq!(pool.least_loaded(), Some(0));
/// assert_eq!(pool.makespan(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool<C> {
    resources: Vec<Resource<C>>,
}

impl<C: Cost> ResourcePool<C> {
    /// Creates `count` idle resources with ids `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            resources: (0..count).map(Resource::new).collect(),
        }
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the pool has no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The resource with the given id.
    pub fn get(&self, id: usize) -> Option<&Resource<C>> {
        self.resources.get(id)
    }

    /// All resources ordered by id.
    pub fn resources(&self) -> &[Resource<C>] {
        &self.resources
    }

    /// Consumes the pool, returning its resources.
    pub fn into_resources(self) -> Vec<Resource<C>> {
        self.resources
    }

    /// Id of the resource with the smallest busy time (ties: lowest id).
    pub fn least_loaded(&self) -> Option<usize> {
        least_loaded(&self.resources)
    }

    /// Largest busy time across resources.
    pub fn makespan(&self) -> C {
        self.resources
            .iter()
            .map(|r| r.busy_time)
            .fold(C::ZERO, |max, t| if t > max { t } else { max })
    }

    /// Busy time per resource, ordered by id.
    pub fn loads(&self) -> Vec<C> {
        self.resources.iter().map(|r| r.busy_time).collect()
    }

    /// Appends `chunk` to resource `id`, returning its busy time before and after.
    pub(crate) fn apply(&mut self, id: usize, chunk: Chunk<C>) -> Option<(C, C)> {
        let resource = self.resources.get_mut(id)?;
        let start = resource.busy_time;
        resource.push(chunk);
        Some((start, resource.busy_time))
    }
}

/// Id of the least-loaded resource in a slice (ties: lowest id).
pub fn least_loaded<C: Cost>(resources: &[Resource<C>]) -> Option<usize> {
    let mut best: Option<&Resource<C>> = None;
    for r in resources {
        match best {
            Some(b) if r.busy_time >= b.busy_time => {}
            _ => best = Some(r),
        }
    }
    best.map(|r| r.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tasks: Vec<usize>, cost: u64) -> Chunk<u64> {
        Chunk::new(tasks, cost)
    }

    #[test]
    fn test_apply_accumulates_busy_time() {
        let mut pool = ResourcePool::<u64>::new(2);
        assert_eq!(pool.apply(1, chunk(vec![0, 1], 5)), Some((0, 5)));
        assert_eq!(pool.apply(1, chunk(vec![2], 3)), Some((5, 8)));

        let r1 = pool.get(1).unwrap();
        assert_eq!(r1.busy_time, 8);
        assert_eq!(r1.chunk_count(), 2);
        assert_eq!(r1.task_count(), 3);
        assert_eq!(r1.executed_tasks().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(pool.get(0).unwrap().is_idle());
        assert_eq!(pool.loads(), vec![0, 8]);
        assert_eq!(pool.makespan(), 8);
    }

    #[test]
    fn test_apply_unknown_resource() {
        let mut pool = ResourcePool::<u64>::new(1);
        assert_eq!(pool.apply(3, chunk(vec![0], 1)), None);
    }

    #[test]
    fn test_least_loaded_ties_lowest_id() {
        let mut pool = ResourcePool::<u64>::new(3);
        pool.apply(0, chunk(vec![0], 4));
        assert_eq!(pool.least_loaded(), Some(1));

        pool.apply(1, chunk(vec![1], 2));
        pool.apply(2, chunk(vec![2], 2));
        assert_eq!(pool.least_loaded(), Some(1));
    }

    #[test]
    fn test_empty_pool() {
        let pool = ResourcePool::<f64>::new(0);
        assert!(pool.is_empty());
        assert_eq!(pool.least_loaded(), None);
        assert!((pool.makespan() - 0.0).abs() < 1e-10);
    }
}
