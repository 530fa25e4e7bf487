//! OpenMP `schedule(static)` policy.
//!
//! # Algorithm
//!
//! **Chunked** (`schedule(static, chunk_size)`): split the iteration space
//! into contiguous chunks of `chunk_size` iterations (the last one may be
//! shorter) and deal them to resources round-robin, ignoring load.
//!
//! **Compact** (`schedule(static)` without a chunk size): one contiguous
//! block per resource. Block sizes differ by at most one; the first
//! `N mod P` resources receive the larger blocks.
//!
//! Both modes are computed up front from the first view and replayed one
//! chunk per call.

use super::{require_chunk, require_resources, ChunkDecision, Plan, Scheduler, SchedulingView};
use crate::error::SimResult;
use crate::models::{Cost, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Chunked(usize),
    Compact,
}

/// Static round-robin (or compact) chunk scheduler.
///
/// # Example
/// ```
/// use u_loopsched::scheduler::Static;
/// use u_loopsched::simulation::simulate;
///
/// let result = simulate(vec![1u64; 10], Static::new(3, 2).unwrap()).unwrap();
/// assert_eq!(result.kpi.scheduler_calls, 5);
/// assert_eq!(result.mapping, vec![0, 0, 1, 1, 2, 2, 0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Static {
    resource_count: usize,
    mode: Mode,
    plan: Plan,
}

impl Static {
    /// Round-robin chunks of `chunk_size` iterations.
    pub fn new(resource_count: usize, chunk_size: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        require_chunk("chunk_size", chunk_size)?;
        Ok(Self {
            resource_count,
            mode: Mode::Chunked(chunk_size),
            plan: Plan::default(),
        })
    }

    /// One contiguous, size-balanced block per resource.
    pub fn compact(resource_count: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        Ok(Self {
            resource_count,
            mode: Mode::Compact,
            plan: Plan::default(),
        })
    }

    /// Configured chunk size (`None` in compact mode).
    pub fn chunk_size(&self) -> Option<usize> {
        match self.mode {
            Mode::Chunked(size) => Some(size),
            Mode::Compact => None,
        }
    }
}

impl<C: Cost> Scheduler<C> for Static {
    fn name(&self) -> &'static str {
        match self.mode {
            Mode::Chunked(_) => "Static",
            Mode::Compact => "StaticCompact",
        }
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        let (mode, resource_count) = (self.mode, self.resource_count);
        self.plan
            .next_or_build(|| build(mode, resource_count, view.remaining))
    }
}

fn build<C: Cost>(mode: Mode, resource_count: usize, tasks: &[Task<C>]) -> Vec<ChunkDecision> {
    let indices: Vec<usize> = tasks.iter().map(|t| t.index).collect();
    match mode {
        Mode::Chunked(size) => indices
            .chunks(size)
            .enumerate()
            .map(|(k, chunk)| ChunkDecision::new(k % resource_count, chunk.to_vec()))
            .collect(),
        Mode::Compact => {
            let base = indices.len() / resource_count;
            let leftover = indices.len() % resource_count;
            let mut start = 0;
            (0..resource_count)
                .map(|resource| {
                    let size = base + usize::from(resource < leftover);
                    let block = indices[start..start + size].to_vec();
                    start += size;
                    ChunkDecision::new(resource, block)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::scheduler::testing::{drive, mapping};

    #[test]
    fn test_round_robin_chunks() {
        let mut s = Static::new(3, 1).unwrap();
        let (decisions, loads) = drive((1..=10u64).collect(), &mut s);
        assert_eq!(decisions.len(), 10);
        assert_eq!(
            mapping(&decisions, 10),
            vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0]
        );
        // R0: 1+4+7+10, R1: 2+5+8, R2: 3+6+9
        assert_eq!(loads, vec![22, 15, 18]);
    }

    #[test]
    fn test_last_chunk_shorter() {
        let mut s = Static::new(2, 4).unwrap();
        let (decisions, _) = drive(vec![1u64; 10], &mut s);
        let sizes: Vec<usize> = decisions.iter().map(|d| d.tasks.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(decisions[2].resource, 0);
    }

    #[test]
    fn test_single_chunk_goes_to_resource_zero() {
        let mut s = Static::new(4, 7).unwrap();
        let (decisions, loads) = drive(vec![3u64; 7], &mut s);
        assert_eq!(decisions, vec![ChunkDecision::new(0, (0..7).collect())]);
        assert_eq!(loads, vec![21, 0, 0, 0]);
    }

    #[test]
    fn test_compact_blocks() {
        let mut s = Static::compact(3).unwrap();
        let (decisions, loads) = drive((1..=10u64).collect(), &mut s);
        assert_eq!(decisions.len(), 3);
        assert_eq!(
            mapping(&decisions, 10),
            vec![0, 0, 0, 0, 1, 1, 1, 2, 2, 2]
        );
        assert_eq!(loads, vec![10, 18, 27]);
    }

    #[test]
    fn test_compact_fewer_tasks_than_resources() {
        let mut s = Static::compact(4).unwrap();
        let (decisions, _) = drive(vec![5u64, 6], &mut s);
        assert_eq!(
            decisions,
            vec![ChunkDecision::new(0, vec![0]), ChunkDecision::new(1, vec![1])]
        );
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            Static::new(0, 2),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Static::new(2, 0),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(Static::compact(0).is_err());
    }

    #[test]
    fn test_empty_loop() {
        let mut s = Static::new(2, 3).unwrap();
        let (decisions, _) = drive(Vec::<u64>::new(), &mut s);
        assert!(decisions.is_empty());
    }
}
