//! Recursive bipartition.
//!
//! # Algorithm
//!
//! 1. Split the remaining iterations at the index that best balances cost
//!    between the two halves (prefix sums + binary search).
//! 2. Give the left half to the first half of the resources and the right
//!    half to the rest; recurse on both sides.
//! 3. When a side owns a single resource, the whole side becomes one chunk.
//!
//! The standard variant requires a power-of-two resource count. The
//! proportional variant accepts any count: a side with `L` of `P` resources
//! (`L = floor(P / 2)`) targets an `L / P` share of the cost, e.g. 2/5 vs
//! 3/5 for five resources.
//!
//! Split ties go to the smaller left side. Sides with no iterations (more
//! resources than iterations) produce no chunk, so a run makes at most
//! `P` scheduler calls.
//!
//! # Complexity
//! O(N + P log N): one prefix-sum pass, one binary search per split.

use super::{require_resources, ChunkDecision, Plan, Scheduler, SchedulingView};
use crate::error::{SimError, SimResult};
use crate::models::{Cost, Task};

/// Cost-balanced divide-and-conquer partitioner.
#[derive(Debug, Clone)]
pub struct RecursiveBipartition {
    resource_count: usize,
    proportional: bool,
    plan: Plan,
}

impl RecursiveBipartition {
    /// Creates a bipartitioner; `resource_count` must be a power of two.
    pub fn new(resource_count: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        if !resource_count.is_power_of_two() {
            return Err(SimError::config(format!(
                "recursive bipartition needs a power-of-two resource count, got {resource_count}"
            )));
        }
        Ok(Self {
            resource_count,
            proportional: false,
            plan: Plan::default(),
        })
    }

    /// Creates a bipartitioner accepting any positive resource count.
    pub fn proportional(resource_count: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        Ok(Self {
            resource_count,
            proportional: true,
            plan: Plan::default(),
        })
    }

    /// Whether uneven resource splits are allowed.
    pub fn is_proportional(&self) -> bool {
        self.proportional
    }
}

impl<C: Cost> Scheduler<C> for RecursiveBipartition {
    fn name(&self) -> &'static str {
        "RecursiveBipartition"
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        let resource_count = self.resource_count;
        self.plan
            .next_or_build(|| partition(view.remaining, resource_count))
    }
}

/// Builds one decision per resource, in resource order.
fn partition<C: Cost>(tasks: &[Task<C>], resource_count: usize) -> Vec<ChunkDecision> {
    let mut prefix = Vec::with_capacity(tasks.len() + 1);
    let mut acc = C::ZERO;
    prefix.push(acc);
    for t in tasks {
        acc = acc + t.cost;
        prefix.push(acc);
    }

    let mut out = Vec::with_capacity(resource_count);
    split(tasks, &prefix, 0, tasks.len(), 0, resource_count, &mut out);
    out
}

fn split<C: Cost>(
    tasks: &[Task<C>],
    prefix: &[C],
    lo: usize,
    hi: usize,
    first_resource: usize,
    count: usize,
    out: &mut Vec<ChunkDecision>,
) {
    if count == 1 {
        let chunk = tasks[lo..hi].iter().map(|t| t.index).collect();
        out.push(ChunkDecision::new(first_resource, chunk));
        return;
    }

    let left_count = count / 2;
    let right_count = count - left_count;
    let mid = balance_point(prefix, lo, hi, left_count, right_count);

    split(tasks, prefix, lo, mid, first_resource, left_count, out);
    split(tasks, prefix, mid, hi, first_resource + left_count, right_count, out);
}

/// Split index `k` in `lo..=hi` minimizing `|left * right_share - right * left_share|`
/// where `left` covers `lo..k` and `right` covers `k..hi`.
///
/// Shares are reduced by their gcd first. Equal shares compare the two
/// sides exactly in `C`; uneven shares compare them in `f64`, so the
/// weighting never overflows narrow cost types.
///
/// Ties resolve to the smaller `k`.
fn balance_point<C: Cost>(
    prefix: &[C],
    lo: usize,
    hi: usize,
    left_share: usize,
    right_share: usize,
) -> usize {
    let g = gcd(left_share, right_share).max(1);
    let (left_share, right_share) = (left_share / g, right_share / g);
    let sides = |k: usize| (prefix[k] - prefix[lo], prefix[hi] - prefix[k]);

    if left_share == right_share {
        closest_split(lo, hi, sides)
    } else {
        let (ls, rs) = (left_share as f64, right_share as f64);
        closest_split(lo, hi, |k| {
            let (left, right) = sides(k);
            (left.to_f64() * rs, right.to_f64() * ls)
        })
    }
}

/// Smallest `k` in `lo..=hi` minimizing the gap between the two weighted sides.
///
/// `weighted(k)` must be non-decreasing on the left side and non-increasing
/// on the right side as `k` grows.
fn closest_split<W: Cost>(lo: usize, hi: usize, weighted: impl Fn(usize) -> (W, W)) -> usize {
    // First k whose weighted left side reaches the weighted right side.
    let (mut a, mut b) = (lo, hi + 1);
    while a < b {
        let m = a + (b - a) / 2;
        let (l, r) = weighted(m);
        if l < r {
            a = m + 1;
        } else {
            b = m;
        }
    }

    let mut best = a.min(hi);
    if a > lo {
        let (l_prev, r_prev) = weighted(a - 1);
        let prev_gap = l_prev.distance(r_prev);
        let keep = if a <= hi {
            let (l, r) = weighted(a);
            l.distance(r) < prev_gap
        } else {
            false
        };
        if !keep {
            best = a - 1;
        }
    }
    best
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
