//! Synthetic iteration cost generators.
//!
//! Every generator returns strictly positive `u64` costs, ready for
//! [`IterationSpace::new`](crate::models::IterationSpace::new).
//!
//! | Generator | Shape |
//! |-----------|-------|
//! | [`uniform`] | i.i.d. in `min..=max`, seeded |
//! | [`increasing`] | `1, 2, ..., n` |
//! | [`decreasing`] | `n, ..., 2, 1` |
//! | [`constant`] | `c, c, ..., c` |
//! | [`spike`] | flat loop with one heavy iteration |
//!
//! Increasing and decreasing loops are the textbook adversaries of static
//! chunking; a spike defeats any policy that commits work before seeing it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{SimError, SimResult};

/// `count` costs drawn uniformly from `min..=max` with a seeded [`StdRng`].
///
/// The same seed always yields the same loop.
///
/// # Example
/// ```
/// use u_loopsched::workload::uniform;
///
/// let a = uniform(10, 1, 10, 7).unwrap();
/// assert_eq!(a, uniform(10, 1, 10, 7).unwrap());
/// assert!(a.iter().all(|&c| (1..=10).contains(&c)));
/// ```
pub fn uniform(count: usize, min: u64, max: u64, seed: u64) -> SimResult<Vec<u64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    uniform_with(count, min, max, &mut rng)
}

/// Like [`uniform`], drawing from a caller-supplied generator.
pub fn uniform_with<R: Rng>(count: usize, min: u64, max: u64, rng: &mut R) -> SimResult<Vec<u64>> {
    if min == 0 {
        return Err(SimError::config("uniform costs need min >= 1"));
    }
    if min > max {
        return Err(SimError::config(format!(
            "uniform cost range is empty: min {min} > max {max}"
        )));
    }
    Ok((0..count).map(|_| rng.random_range(min..=max)).collect())
}

/// `1, 2, ..., count`.
pub fn increasing(count: usize) -> Vec<u64> {
    (1..=count as u64).collect()
}

/// `count, ..., 2, 1`.
pub fn decreasing(count: usize) -> Vec<u64> {
    (1..=count as u64).rev().collect()
}

/// `count` iterations of cost `cost`.
pub fn constant(count: usize, cost: u64) -> SimResult<Vec<u64>> {
    if cost == 0 {
        return Err(SimError::config("constant cost must be positive"));
    }
    Ok(vec![cost; count])
}

/// `count` unit-cost iterations, except `at` which costs `height`.
pub fn spike(count: usize, at: usize, height: u64) -> SimResult<Vec<u64>> {
    if at >= count {
        return Err(SimError::config(format!(
            "spike position {at} outside a loop of {count} iteration(s)"
        )));
    }
    if height == 0 {
        return Err(SimError::config("spike height must be positive"));
    }
    let mut costs = vec![1; count];
    costs[at] = height;
    Ok(costs)
}
