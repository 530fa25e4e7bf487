//! OpenMP `schedule(dynamic, chunk_size)` policy.
//!
//! In a real runtime, idle threads pull the next `chunk_size` iterations
//! from a shared counter. The simulation serializes those pulls: the
//! resource that becomes idle first is the least-loaded one (ties: lowest
//! id), and it receives the next contiguous chunk of remaining iterations.

use super::{require_chunk, require_resources, ChunkDecision, Scheduler, SchedulingView};
use crate::error::SimResult;
use crate::models::Cost;

/// Pull-based fixed-size chunk scheduler.
#[derive(Debug, Clone)]
pub struct Dynamic {
    resource_count: usize,
    chunk_size: usize,
}

impl Dynamic {
    /// Creates a dynamic scheduler handing out `chunk_size` iterations per call.
    pub fn new(resource_count: usize, chunk_size: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        require_chunk("chunk_size", chunk_size)?;
        Ok(Self {
            resource_count,
            chunk_size,
        })
    }

    /// Configured chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<C: Cost> Scheduler<C> for Dynamic {
    fn name(&self) -> &'static str {
        "Dynamic"
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        if view.is_exhausted() {
            return None;
        }
        let resource = view.least_loaded()?;
        Some(ChunkDecision::new(
            resource,
            view.leading_indices(self.chunk_size),
        ))
    }
}
