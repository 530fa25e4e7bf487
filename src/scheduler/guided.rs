//! OpenMP `schedule(guided, min_chunk_size)` policy.
//!
//! # Algorithm
//!
//! Each call hands the least-loaded resource the next contiguous chunk of
//! `max(min_chunk_size, floor(remaining / P))` iterations, capped at the
//! number remaining. Chunk sizes shrink as iterations are consumed, so the
//! sequence is non-increasing and only the final remainder can fall below
//! `min_chunk_size`.

use super::{require_chunk, require_resources, ChunkDecision, Scheduler, SchedulingView};
use crate::error::SimResult;
use crate::models::Cost;

/// Pull-based scheduler with geometrically shrinking chunks.
#[derive(Debug, Clone)]
pub struct Guided {
    resource_count: usize,
    min_chunk_size: usize,
}

impl Guided {
    /// Creates a guided scheduler never emitting chunks below `min_chunk_size`
    /// (except the final remainder).
    pub fn new(resource_count: usize, min_chunk_size: usize) -> SimResult<Self> {
        require_resources(resource_count)?;
        require_chunk("min_chunk_size", min_chunk_size)?;
        Ok(Self {
            resource_count,
            min_chunk_size,
        })
    }

    /// Configured minimum chunk size.
    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Chunk size for `remaining` unassigned iterations.
    pub fn chunk_size_for(&self, remaining: usize) -> usize {
        let share = remaining / self.resource_count;
        share.max(self.min_chunk_size).min(remaining)
    }
}

impl<C: Cost> Scheduler<C> for Guided {
    fn name(&self) -> &'static str {
        "Guided"
    }

    fn resource_count(&self) -> usize {
        self.resource_count
    }

    fn next_chunk(&mut self, view: &SchedulingView<'_, C>) -> Option<ChunkDecision> {
        if view.is_exhausted() {
            return None;
        }
        let resource = view.least_loaded()?;
        let size = self.chunk_size_for(view.remaining.len());
        Some(ChunkDecision::new(resource, view.leading_indices(size)))
    }
}
