//! Simulation domain models.
//!
//! Provides the data types shared by schedulers, the simulation driver,
//! and the KPI computation.
//!
//! # Domain Mappings
//!
//! | u-loopsched | OpenMP | MPI / distributed |
//! |-------------|--------|-------------------|
//! | Task | Loop iteration | Work item |
//! | Chunk | Chunk | Message batch |
//! | Resource | Thread | Rank |
//! | AssignmentHistory | Runtime trace | Assignment log |

mod cost;
mod resource;
mod schedule;
mod task;

pub use cost::{sum_costs, Cost};
pub use resource::{least_loaded, Resource, ResourcePool};
pub use schedule::{Assignment, AssignmentHistory, Chunk};
pub use task::{IterationSpace, Task};
