//! Scheduling Policies
//!
//! The four supported policies form a closed set selected once at startup.
//! Each variant supplies:
//! - where a newly ready process is inserted in the ready queue
//! - which queued process is selected next
//! - the time slice handed to the dispatcher
//! - the key used to decide wake-up preemption (SRTF and Priority only)
//!
//! Supported policies:
//! - FIFO: arrival order, runs until yield/terminate
//! - Round-Robin: arrival order, fixed quantum
//! - SRTF: queue kept sorted by remaining time, preempts on wake-up
//! - Priority: static priority chosen at selection time, preempts on wake-up

use crate::error::SchedulerError;
use crate::process::{Process, ProcessHandle};
use core::fmt;
use core::str::FromStr;
use std::collections::VecDeque;

/// Scheduling policy identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// First come, first served
    #[default]
    Fifo,
    /// FIFO with a fixed time quantum
    RoundRobin,
    /// Shortest remaining time first
    Srtf,
    /// Static priority, lower value runs first
    Priority,
}

impl Policy {
    /// Does this policy consult the preemption advisor on wake-up?
    pub fn preempts_on_wake(&self) -> bool {
        matches!(self, Self::Srtf | Self::Priority)
    }

    /// Does this policy bound running time by a quantum?
    pub fn is_time_sliced(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }

    /// Index at which `process` goes into `queue`.
    ///
    /// SRTF places it after every entry with equal or smaller remaining time,
    /// so equal entries stay in arrival order. Everything else appends.
    pub fn insert_index(&self, queue: &VecDeque<ProcessHandle>, process: &Process) -> usize {
        match self {
            Self::Srtf => {
                let key = process.remaining_time();
                queue
                    .iter()
                    .position(|queued| queued.remaining_time() > key)
                    .unwrap_or(queue.len())
            }
            Self::Fifo | Self::RoundRobin | Self::Priority => queue.len(),
        }
    }

    /// Index of the entry to run next, `None` on an empty queue.
    ///
    /// Priority scans the whole queue for the numerically lowest priority;
    /// the first one found wins a tie.
    pub fn select_index(&self, queue: &VecDeque<ProcessHandle>) -> Option<usize> {
        match self {
            Self::Priority => queue
                .iter()
                .enumerate()
                .min_by_key(|(_, queued)| queued.priority())
                .map(|(index, _)| index),
            Self::Fifo | Self::RoundRobin | Self::Srtf => (!queue.is_empty()).then_some(0),
        }
    }

    /// How "weak" a process is for wake-up preemption: larger is worse.
    ///
    /// `None` for policies that never preempt on wake-up.
    pub fn preemption_key(&self, process: &Process) -> Option<u64> {
        match self {
            Self::Srtf => Some(process.remaining_time()),
            Self::Priority => Some(u64::from(process.priority())),
            Self::Fifo | Self::RoundRobin => None,
        }
    }

    /// Short name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::RoundRobin => "rr",
            Self::Srtf => "srtf",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(Self::Fifo),
            "rr" | "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "srtf" => Ok(Self::Srtf),
            "priority" | "prio" => Ok(Self::Priority),
            _ => Err(SchedulerError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Time a dispatched process may run before the simulator preempts it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlice {
    /// Runs until it yields or terminates
    Unbounded,
    /// Runs for at most this many ticks
    Ticks(u32),
}

impl TimeSlice {
    pub fn ticks(&self) -> Option<u32> {
        match self {
            Self::Unbounded => None,
            Self::Ticks(ticks) => Some(*ticks),
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Self::Ticks(_))
    }
}

impl fmt::Display for TimeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Ticks(ticks) => write!(f, "{} ticks", ticks),
        }
    }
}
