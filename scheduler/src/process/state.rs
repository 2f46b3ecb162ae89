//! State - Process state machine
//!
//! Lifecycle of a simulated process as seen by the scheduler core:
//!
//! ```text
//! New ──► Ready ──► Running ──► Ready       (preempt)
//!           ▲                ├─► Waiting   (yield for I/O) ──► Ready (wake_up)
//!           └────────────────┘─► Terminated
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProcessState {
    /// Created by the simulator, never scheduled yet
    New = 0,

    /// Eligible to run, sitting in the ready queue
    Ready = 1,

    /// Occupying exactly one CPU slot
    Running = 2,

    /// Performing I/O; owned by the simulator until woken
    Waiting = 3,

    /// Finished; the simulator disposes of it
    Terminated = 4,
}

impl ProcessState {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::New),
            1 => Some(Self::Ready),
            2 => Some(Self::Running),
            3 => Some(Self::Waiting),
            4 => Some(Self::Terminated),
            _ => None,
        }
    }

    /// Check if state is schedulable
    pub fn is_schedulable(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Ready => write!(f, "Ready"),
            Self::Running => write!(f, "Running"),
            Self::Waiting => write!(f, "Waiting"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Atomic process state
pub struct AtomicProcessState {
    state: AtomicU8,
}

impl AtomicProcessState {
    /// Create new atomic state
    pub const fn new(state: ProcessState) -> Self {
        Self {
            state: AtomicU8::new(state as u8),
        }
    }

    /// Load current state
    pub fn load(&self) -> ProcessState {
        let value = self.state.load(Ordering::Acquire);
        // Only `ProcessState as u8` is ever stored.
        ProcessState::from_u8(value).unwrap_or(ProcessState::Terminated)
    }

    /// Compare and exchange state
    pub fn compare_exchange(
        &self,
        current: ProcessState,
        new: ProcessState,
    ) -> Result<ProcessState, ProcessState> {
        match self.state.compare_exchange(
            current as u8,
            new as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(current),
            Err(actual) => Err(ProcessState::from_u8(actual).unwrap_or(ProcessState::Terminated)),
        }
    }
}

impl fmt::Debug for AtomicProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicProcessState").field(&self.load()).finish()
    }
}

/// Validate state transition
pub fn validate_transition(from: ProcessState, to: ProcessState) -> bool {
    use ProcessState::*;

    match (from, to) {
        // New -> Ready (first arrival)
        (New, Ready) => true,

        // Ready -> Running
        (Ready, Running) => true,

        // Running -> Ready (preemption)
        (Running, Ready) => true,

        // Running -> Waiting (I/O)
        (Running, Waiting) => true,

        // Running -> Terminated
        (Running, Terminated) => true,

        // Waiting -> Ready (I/O completed)
        (Waiting, Ready) => true,

        // All other transitions invalid
        _ => false,
    }
}
