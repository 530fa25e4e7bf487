//! Loop-iteration scheduling simulator.
//!
//! Simulates how parallel-loop scheduling policies distribute a loop of
//! independently costed iterations over a fixed set of identical resources,
//! in logical time, and compares them by makespan, number of scheduling
//! decisions, and data locality.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Cost`, `Task`, `IterationSpace`, `Chunk`,
//!   `Resource`, `ResourcePool`, `Assignment`, `AssignmentHistory`
//! - **`scheduler`**: The `Scheduler` trait and its policies: Static, LPT,
//!   OpenMP dynamic/guided, recursive bipartition, Nicol; `SchedulerConfig`
//! - **`simulation`**: The driver loop and run metrics (`RunKpi`)
//! - **`validation`**: Workload and run integrity checks
//! - **`workload`**: Synthetic cost generators
//! - **`error`**: `SimError`
//!
//! # Example
//!
//! ```
//! use u_loopsched::scheduler::{Policy, SchedulerConfig};
//! use u_loopsched::simulation::simulate_config;
//! use u_loopsched::workload::increasing;
//!
//! let costs = increasing(12);
//! let static_rr = simulate_config(costs.clone(), &SchedulerConfig::new(Policy::Static, 3).with_chunk_size(1)).unwrap();
//! let nicol = simulate_config(costs, &SchedulerConfig::new(Policy::Nicol, 3)).unwrap();
//!
//! assert!(nicol.kpi.scheduler_calls < static_rr.kpi.scheduler_calls);
//! assert!(nicol.kpi.locality_score > static_rr.kpi.locality_score);
//! ```
//!
//! # References
//!
//! - OpenMP Architecture Review Board (2018), "OpenMP API 5.0"
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Pinar & Aykanat (2004), "Fast optimal load balancing algorithms for 1D partitioning"

pub mod error;
pub mod models;
pub mod scheduler;
pub mod simulation;
pub mod validation;
pub mod workload;
