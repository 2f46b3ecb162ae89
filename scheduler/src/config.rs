//! Startup configuration
//!
//! Supplied once when the core is built and immutable afterwards.

use crate::error::{SchedulerError, SchedulerResult};
use crate::policy::{Policy, TimeSlice};

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of simulated CPUs
    pub cpu_count: usize,
    /// Scheduling policy
    pub policy: Policy,
    /// Quantum in ticks, required by Round-Robin
    pub time_slice: Option<u32>,
}

impl SchedulerConfig {
    pub const fn new(cpu_count: usize, policy: Policy) -> Self {
        Self {
            cpu_count,
            policy,
            time_slice: None,
        }
    }

    pub const fn with_time_slice(mut self, ticks: u32) -> Self {
        self.time_slice = Some(ticks);
        self
    }

    /// Check the configuration and resolve the slice handed to every dispatch.
    pub fn validate(&self) -> SchedulerResult<TimeSlice> {
        if self.cpu_count == 0 {
            return Err(SchedulerError::NoCpus);
        }

        if !self.policy.is_time_sliced() {
            if let Some(ticks) = self.time_slice {
                log::warn!(
                    "time slice of {} ticks ignored: {} is not time-sliced",
                    ticks,
                    self.policy
                );
            }
            return Ok(TimeSlice::Unbounded);
        }

        match self.time_slice {
            None => Err(SchedulerError::MissingTimeSlice),
            Some(0) => Err(SchedulerError::ZeroTimeSlice),
            Some(ticks) => Ok(TimeSlice::Ticks(ticks)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cpus() {
        let config = SchedulerConfig::new(0, Policy::Fifo);
        assert_eq!(config.validate(), Err(SchedulerError::NoCpus));
    }

    #[test]
    fn test_round_robin_needs_slice() {
        let config = SchedulerConfig::new(2, Policy::RoundRobin);
        assert_eq!(config.validate(), Err(SchedulerError::MissingTimeSlice));
        assert_eq!(
            config.with_time_slice(0).validate(),
            Err(SchedulerError::ZeroTimeSlice)
        );
        assert_eq!(config.with_time_slice(3).validate(), Ok(TimeSlice::Ticks(3)));
    }

    #[test]
    fn test_slice_ignored_for_other_policies() {
        for policy in [Policy::Fifo, Policy::Srtf, Policy::Priority] {
            let config = SchedulerConfig::new(1, policy).with_time_slice(5);
            assert_eq!(config.validate(), Ok(TimeSlice::Unbounded));
        }
    }

    #[test]
    fn test_cpu_count_checked_first() {
        let config = SchedulerConfig::new(0, Policy::RoundRobin);
        assert_eq!(config.validate(), Err(SchedulerError::NoCpus));
    }
}
