//! Nicol's optimal chains-on-chains partitioning.
//!
//! # Algorithm
//!
//! Splits the iterations into at most `P` contiguous parts minimizing the
//! heaviest part (the bottleneck `B*`).
//!
//! - `probe(B)`: greedily fill each part as far as possible without
//!   exceeding `B`; feasible if `P` parts cover every iteration.
//! - For each of the first `P - 1` parts starting at `s`, binary search the
//!   smallest end `e` such that `probe(cost(s..=e))` holds. That cost is a
//!   feasible bottleneck candidate. If `B*` is smaller, the part must stop
//!   before `e`, so the next part starts at `e`.
//! - The load left for the last part is the final candidate; `B*` is the
//!   smallest candidate.
//!
//! The plan is the greedy partition at `B*`, one part per resource in order.
//! Parts left empty produce no chunk.
//!
//! # Complexity
//! O(P² log² N) probes on prefix sums, independent of cost magnitudes.
//!
//! # Reference
//! - Nicol (1994), "Rectilinear Partitioning of Irregular Data Parallel Computations"
//! - Pinar & Aykanat (2004), "Fast optimal load balancing algorithms for 1D partitioning"

use super::{require_resources, ChunkDecision, Plan, Scheduler, SchedulingView};
use crate::error::SimResult;
use crate::models::{Cost, Task};

/// Exact contiguous load balancer.
#[derive(Debug, Clone)]
pub struct Nicol {
    resource_count: usize,
    plan: Plan,
}

impl Nicol {
    /// Creates a Nicol partitioner for `resource_count` resources.
    pub fn new(resource_count: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        Ok(Self {
            resource_count,
            plan: Plan::default(),
        })
    }
}

impl<C: Cost> Scheduler<C> for Nicol {
    fn name(&self) -> &'static str {
        "Nicol"
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        let resource_count = self.resource_count;
        self.plan
            .next_or_build(|| Chains::new(view.remaining).plan(resource_count))
    }
}

/// Prefix-sum view over a chain of tasks.
struct Chains<'a, C> {
    tasks: &'a [Task<C>],
    prefix: Vec<C>,
}

impl<'a, C: Cost> Chains<'a, C> {
    fn new(tasks: &'a [Task<C>]) -> Self {
        let mut prefix = Vec::with_capacity(tasks.len() + 1);
        let mut acc = C::ZERO;
        prefix.push(acc);
        for t in tasks {
            acc = acc + t.cost;
            prefix.push(acc);
        }
        Self { tasks, prefix }
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Cost of positions `from..to`.
    fn load(&self, from: usize, to: usize) -> C {
        self.prefix[to] - self.prefix[from]
    }

    /// Largest `to` such that `load(from, to) <= bound`.
    fn reach(&self, from: usize, bound: C) -> usize {
        let ahead = &self.prefix[from + 1..];
        from + ahead.partition_point(|&p| p - self.prefix[from] <= bound)
    }

    /// Greedy part boundaries under `bound`, `None` if more than `parts` are needed.
    fn greedy(&self, bound: C, parts: usize) -> Option<Vec<usize>> {
        let mut ends = Vec::with_capacity(parts);
        let mut start = 0;
        while start < self.len() {
            if ends.len() == parts {
                return None;
            }
            let end = self.reach(start, bound);
            if end == start {
                return None;
            }
            ends.push(end);
            start = end;
        }
        Some(ends)
    }

    fn probe(&self, bound: C, parts: usize) -> bool {
        self.greedy(bound, parts).is_some()
    }

    /// Smallest feasible bottleneck.
    fn bottleneck(&self, parts: usize) -> C {
        let n = self.len();
        let mut best = self.load(0, n);
        let mut start = 0;

        for _ in 1..parts {
            if start >= n {
                break;
            }
            // Smallest e in start..n with probe(load(start, e + 1)).
            let (mut lo, mut hi) = (start, n);
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.probe(self.load(start, mid + 1), parts) {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            if lo == n {
                break;
            }
            let candidate = self.load(start, lo + 1);
            if candidate < best {
                best = candidate;
            }
            start = lo;
        }

        let tail = self.load(start.min(n), n);
        if tail < best && self.probe(tail, parts) {
            best = tail;
        }
        best
    }

    fn plan(&self, parts: usize) -> Vec<ChunkDecision> {
        if self.len() == 0 {
            return Vec::new();
        }
        // bottleneck() only returns bounds that pass probe(), so greedy()
        // succeeds. An empty plan would surface as a stalled run.
        let bound = self.bottleneck(parts);
        let Some(ends) = self.greedy(bound, parts) else {
            return Vec::new();
        };

        let mut start = 0;
        ends.into_iter()
            .enumerate()
            .map(|(resource, end)| {
                let chunk = self.tasks[start..end].iter().map(|t| t.index).collect();
                start = end;
                ChunkDecision::new(resource, chunk)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::{drive, mapping};

    fn tasks() -> Vec<u64> {
        vec![2, 4, 6, 8, 5, 3, 9, 1, 11, 7]
    }

    fn chains(costs: &[u64]) -> Vec<Task<u64>> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Task::new(i, c))
            .collect()
    }

    /// Exhaustive optimum over all contiguous partitions (small inputs only).
    fn brute_force(costs: &[u64], parts: usize) -> u64 {
        fn go(costs: &[u64], parts: usize) -> u64 {
            if parts == 1 || costs.len() <= 1 {
                return costs.iter().sum();
            }
            (0..=costs.len())
                .map(|k| {
                    let head: u64 = costs[..k].iter().sum();
                    head.max(go(&costs[k..], parts - 1))
                })
                .min()
                .unwrap_or(0)
        }
        go(costs, parts)
    }

    #[test]
    fn test_three_resources() {
        let mut nicol = Nicol::new(3).unwrap();
        let (decisions, loads) = drive(tasks(), &mut nicol);
        assert_eq!(decisions.len(), 3);
        assert_eq!(mapping(&decisions, 10), vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
        assert_eq!(loads, vec![20, 18, 18]);
    }

    #[test]
    fn test_bottleneck_matches_brute_force() {
        let cases: Vec<(Vec<u64>, usize)> = vec![
            (tasks(), 2),
            (tasks(), 3),
            (tasks(), 4),
            (vec![9, 1, 1, 1, 1, 1, 1, 9], 3),
            (vec![1, 2, 3, 4, 5, 6, 7, 8, 9], 4),
            (vec![5, 5, 5], 5),
            (vec![100, 1, 1, 1], 2),
        ];
        for (costs, parts) in cases {
            let t = chains(&costs);
            let c = Chains::new(&t);
            let bound = c.bottleneck(parts);
            assert_eq!(bound, brute_force(&costs, parts), "costs {costs:?}, parts {parts}");
            assert!(c.greedy(bound, parts).is_some(), "costs {costs:?}, parts {parts}");
            assert_eq!(c.plan(parts).iter().map(|d| d.tasks.len()).sum::<usize>(), costs.len());
        }
    }

    #[test]
    fn test_probe() {
        let t = chains(&tasks());
        let c = Chains::new(&t);
        assert!(c.probe(20, 3));
        assert!(!c.probe(19, 3));
        assert_eq!(c.greedy(20, 3), Some(vec![4, 8, 10]));
    }

    #[test]
    fn test_single_resource() {
        let mut nicol = Nicol::new(1).unwrap();
        let (decisions, loads) = drive(tasks(), &mut nicol);
        assert_eq!(decisions.len(), 1);
        assert_eq!(loads, vec![56]);
    }

    #[test]
    fn test_more_resources_than_tasks() {
        let mut nicol = Nicol::new(6).unwrap();
        let (decisions, loads) = drive(vec![4u64, 7], &mut nicol);
        assert_eq!(decisions.len(), 2);
        assert_eq!(loads.iter().max(), Some(&7));
    }

    #[test]
    fn test_rejects_zero_resources() {
        assert!(Nicol::new(0).is_err());
    }
}
