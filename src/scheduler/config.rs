//! Scheduler configuration.
//!
//! A serializable description of a policy and its options, so that
//! experiments can be declared in JSON (or any serde format) and turned
//! into schedulers at run time.
//!
//! | Policy | `chunk_size` | `min_chunk_size` | `resource_count` |
//! |--------|--------------|------------------|------------------|
//! | `static` | required | - | any |
//! | `static_compact` | - | - | any |
//! | `lpt` | - | - | any |
//! | `dynamic` | required | - | any |
//! | `guided` | - | required | any |
//! | `recursive_bipartition` | - | - | power of two |
//! | `recursive_bipartition_proportional` | - | - | any |
//! | `nicol` | - | - | any |
//!
//! Options outside a policy's column are rejected rather than ignored.

use serde::{Deserialize, Serialize};

use super::{Dynamic, Guided, Lpt, Nicol, RecursiveBipartition, Scheduler, Static};
use crate::error::{SimError, SimResult};
use crate::models::Cost;

/// Scheduling policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Round-robin fixed-size chunks.
    Static,
    /// One contiguous block per resource.
    StaticCompact,
    /// Largest Processing Time first.
    Lpt,
    /// Pull-based fixed-size chunks.
    Dynamic,
    /// Pull-based shrinking chunks.
    Guided,
    /// Cost-balanced halving (power-of-two resources).
    RecursiveBipartition,
    /// Cost-balanced splitting for any resource count.
    RecursiveBipartitionProportional,
    /// Optimal contiguous partitioning.
    Nicol,
}

impl Policy {
    /// All policies, in documentation order.
    pub const ALL: [Policy; 8] = [
        Policy::Static,
        Policy::StaticCompact,
        Policy::Lpt,
        Policy::Dynamic,
        Policy::Guided,
        Policy::RecursiveBipartition,
        Policy::RecursiveBipartitionProportional,
        Policy::Nicol,
    ];

    fn accepts_chunk_size(self) -> bool {
        matches!(self, Policy::Static | Policy::Dynamic)
    }

    fn accepts_min_chunk_size(self) -> bool {
        matches!(self, Policy::Guided)
    }
}

/// Declarative scheduler configuration.
///
/// # Example
/// ```
/// use u_loopsched::scheduler::{Policy, SchedulerConfig};
///
/// let config = SchedulerConfig::new(Policy::Dynamic, 4).with_chunk_size(2);
/// let scheduler = config.build::<u64>().unwrap();
/// assert_eq!(scheduler.name(), "Dynamic");
/// assert_eq!(scheduler.resource_count(), 4);
///
/// // Guided needs min_chunk_size, not chunk_size.
/// assert!(SchedulerConfig::new(Policy::Guided, 4)
///     .with_chunk_size(2)
///     .build::<u64>()
///     .is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Policy to instantiate.
    pub policy: Policy,
    /// Number of identical resources.
    pub resource_count: usize,
    /// Chunk size (`static`, `dynamic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    /// Minimum chunk size (`guided`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chunk_size: Option<usize>,
}

impl SchedulerConfig {
    /// Creates a configuration with no optional settings.
    pub fn new(policy: Policy, resource_count: usize) -> Self {
        Self {
            policy,
            resource_count,
            chunk_size: None,
            min_chunk_size: None,
        }
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Sets the minimum chunk size.
    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = Some(min_chunk_size);
        self
    }

    /// Checks option combinations without building anything.
    pub fn validate(&self) -> SimResult<()> {
        if self.chunk_size.is_some() && !self.policy.accepts_chunk_size() {
            return Err(SimError::config(format!(
                "{:?} does not take chunk_size",
                self.policy
            )));
        }
        if self.min_chunk_size.is_some() && !self.policy.accepts_min_chunk_size() {
            return Err(SimError::config(format!(
                "{:?} does not take min_chunk_size",
                self.policy
            )));
        }
        Ok(())
    }

    /// Instantiates the configured scheduler.
    ///
    /// Fails with [`SimError::InvalidConfiguration`] if a required option is
    /// missing, zero, unsupported by the policy, or if the resource count is
    /// structurally impossible for it.
    pub fn build<C: Cost>(&self) -> SimResult<Box<dyn Scheduler<C>>> {
        self.validate()?;
        let p = self.resource_count;
        let scheduler: Box<dyn Scheduler<C>> = match self.policy {
            Policy::Static => Box::new(Static::new(p, self.required_chunk_size()?)?),
            Policy::StaticCompact => Box::new(Static::compact(p)?),
            Policy::Lpt => Box::new(Lpt::new(p)?),
            Policy::Dynamic => Box::new(Dynamic::new(p, self.required_chunk_size()?)?),
            Policy::Guided => Box::new(Guided::new(p, self.required_min_chunk_size()?)?),
            Policy::RecursiveBipartition => Box::new(RecursiveBipartition::new(p)?),
            Policy::RecursiveBipartitionProportional => {
                Box::new(RecursiveBipartition::proportional(p)?)
            }
            Policy::Nicol => Box::new(Nicol::new(p)?),
        };
        Ok(scheduler)
    }

    fn required_chunk_size(&self) -> SimResult<usize> {
        self.chunk_size
            .ok_or_else(|| SimError::config(format!("{:?} requires chunk_size", self.policy)))
    }

    fn required_min_chunk_size(&self) -> SimResult<usize> {
        self.min_chunk_size
            .ok_or_else(|| SimError::config(format!("{:?} requires min_chunk_size", self.policy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_every_policy() {
        for policy in Policy::ALL {
            let mut config = SchedulerConfig::new(policy, 4);
            if policy.accepts_chunk_size() {
                config = config.with_chunk_size(2);
            }
            if policy.accepts_min_chunk_size() {
                config = config.with_min_chunk_size(1);
            }
            let scheduler = config.build::<u64>().unwrap();
            assert_eq!(scheduler.resource_count(), 4, "{policy:?}");
        }
    }

    #[test]
    fn test_missing_required_option() {
        let err = SchedulerConfig::new(Policy::Static, 2)
            .build::<u64>()
            .unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidConfiguration("Static requires chunk_size".into())
        );
        assert!(SchedulerConfig::new(Policy::Guided, 2)
            .build::<u64>()
            .is_err());
    }

    #[test]
    fn test_unsupported_option() {
        let err = SchedulerConfig::new(Policy::Lpt, 2)
            .with_min_chunk_size(3)
            .build::<u64>()
            .unwrap_err();
        assert!(err.to_string().contains("does not take min_chunk_size"));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(SchedulerConfig::new(Policy::Dynamic, 2)
            .with_chunk_size(0)
            .build::<u64>()
            .is_err());
        assert!(SchedulerConfig::new(Policy::Nicol, 0).build::<u64>().is_err());
    }

    #[test]
    fn test_bipartition_power_of_two() {
        assert!(SchedulerConfig::new(Policy::RecursiveBipartition, 3)
            .build::<u64>()
            .is_err());
        assert!(SchedulerConfig::new(Policy::RecursiveBipartitionProportional, 3)
            .build::<u64>()
            .is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let json = r#"{"policy":"guided","resource_count":3,"min_chunk_size":2}"#;
        let config: SchedulerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            SchedulerConfig::new(Policy::Guided, 3).with_min_chunk_size(2)
        );
        assert_eq!(serde_json::to_string(&config).unwrap(), json);
    }
}
