//! Simulation of loop scheduling runs.
//!
//! - **`driver`**: the step loop feeding a [`Scheduler`](crate::scheduler::Scheduler)
//!   views of the run and applying its decisions.
//! - **`kpi`**: metrics computed from a finished run.

mod driver;
mod kpi;

pub use driver::{simulate, simulate_config, SimState, Simulation, SimulationResult};
pub use kpi::{loads_from_mapping, locality_score, resource_changes, RunKpi};
