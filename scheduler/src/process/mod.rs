//! Process records
//!
//! A [`Process`] is the schedulable unit. The simulator allocates it and owns
//! its lifetime; the scheduler core only observes it through a shared
//! [`ProcessHandle`] while it is ready or running. Queue membership lives in
//! the ready queue, never in the record itself.

pub mod state;

pub use state::{validate_transition, AtomicProcessState, ProcessState};

use crate::error::{SchedulerError, SchedulerResult};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process identifier
pub type Pid = u32;

/// Shared handle to a process record
pub type ProcessHandle = Arc<Process>;

/// One schedulable unit
pub struct Process {
    pid: Pid,
    name: String,
    /// Static priority, lower value = higher priority
    priority: u32,
    state: AtomicProcessState,
    /// Ticks of CPU time left; decremented by the simulator while running
    remaining_time: AtomicU64,
}

impl Process {
    /// Create a record in the `New` state
    pub fn new(pid: Pid, name: impl Into<String>, priority: u32, remaining_time: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            priority,
            state: AtomicProcessState::new(ProcessState::New),
            remaining_time: AtomicU64::new(remaining_time),
        }
    }

    /// Create a record and wrap it in a shared handle
    pub fn spawn(
        pid: Pid,
        name: impl Into<String>,
        priority: u32,
        remaining_time: u64,
    ) -> ProcessHandle {
        Arc::new(Self::new(pid, name, priority, remaining_time))
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn state(&self) -> ProcessState {
        self.state.load()
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time.load(Ordering::Acquire)
    }

    /// Account `ticks` of CPU time, saturating at zero.
    ///
    /// Returns the time still remaining.
    pub fn consume(&self, ticks: u64) -> u64 {
        let mut current = self.remaining_time.load(Ordering::Acquire);
        loop {
            let next = current.saturating_sub(ticks);
            match self.remaining_time.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// Move to `to`, validating the edge against the lifecycle.
    ///
    /// Returns the state the process was in.
    pub fn transition(&self, to: ProcessState) -> SchedulerResult<ProcessState> {
        let mut from = self.state.load();
        loop {
            if !validate_transition(from, to) {
                return Err(SchedulerError::InvalidStateTransition {
                    pid: self.pid,
                    from,
                    to,
                });
            }
            match self.state.compare_exchange(from, to) {
                Ok(previous) => return Ok(previous),
                Err(actual) => from = actual,
            }
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("state", &self.state())
            .field("remaining_time", &self.remaining_time())
            .finish()
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.pid)
    }
}
