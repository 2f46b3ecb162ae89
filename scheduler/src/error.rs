//! Scheduler Error Handling
//!
//! Typed errors for configuration and for collaborator contract violations.
//! Configuration errors are returned to the caller at startup; contract
//! violations inside a handler are fatal (see [`invariant_violation`]).

use crate::process::{Pid, ProcessState};
use crate::CpuId;
use thiserror::Error;

/// Scheduler error types with detailed context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    // ═══════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════
    /// Zero CPUs requested
    #[error("cpu count must be at least 1")]
    NoCpus,

    /// Round-Robin selected without a time slice
    #[error("round-robin scheduling requires a time slice")]
    MissingTimeSlice,

    /// Time slice of zero ticks
    #[error("time slice must be a positive number of ticks")]
    ZeroTimeSlice,

    /// Policy name not recognised
    #[error("unknown scheduling policy `{0}`")]
    UnknownPolicy(String),

    // ═══════════════════════════════════════════════════════════════
    // Contract Violations (fatal inside handlers)
    // ═══════════════════════════════════════════════════════════════
    /// Handler called with a CPU id outside the run table
    #[error("cpu {cpu_id} out of range (cpu count {cpu_count})")]
    CpuOutOfRange { cpu_id: CpuId, cpu_count: usize },

    /// Handler assumed a running process on an idle CPU
    #[error("cpu {cpu_id} has no running process")]
    NoRunningProcess { cpu_id: CpuId },

    /// Scheduling onto a CPU whose slot is still occupied
    #[error("cpu {cpu_id} is still running process {pid}")]
    CpuBusy { cpu_id: CpuId, pid: Pid },

    /// Process moved along an edge the lifecycle does not allow
    #[error("process {pid}: invalid state transition {from} -> {to}")]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
}

impl SchedulerError {
    /// Get recovery hint for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::NoCpus => "Configure at least one CPU",
            Self::MissingTimeSlice => "Pass a time slice when selecting round-robin",
            Self::ZeroTimeSlice => "Use a time slice of at least one tick",
            Self::UnknownPolicy(_) => "Use one of: fifo, rr, srtf, priority",
            Self::CpuOutOfRange { .. } => "Simulator addressed a CPU it never configured",
            Self::NoRunningProcess { .. } => "Simulator raised an event for an idle CPU",
            Self::CpuBusy { .. } => "Preempt, yield or terminate before scheduling again",
            Self::InvalidStateTransition { .. } => "Check process lifecycle in the simulator",
        }
    }

    /// Contract violations cannot be recovered from without corrupting state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CpuOutOfRange { .. }
                | Self::NoRunningProcess { .. }
                | Self::CpuBusy { .. }
                | Self::InvalidStateTransition { .. }
        )
    }

    /// Get error severity (0-3)
    pub fn severity(&self) -> u8 {
        match self {
            Self::NoRunningProcess { .. } => 3,
            Self::CpuBusy { .. } => 3,
            Self::InvalidStateTransition { .. } => 3,
            Self::CpuOutOfRange { .. } => 3,
            Self::MissingTimeSlice | Self::ZeroTimeSlice => 2,
            Self::NoCpus => 2,
            Self::UnknownPolicy(_) => 1,
        }
    }
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Abort the calling handler on a collaborator contract violation.
///
/// The error is logged before panicking so the diagnostic survives even when
/// the panic message is swallowed by the simulator's thread.
#[cold]
#[track_caller]
pub fn invariant_violation(err: SchedulerError) -> ! {
    log::error!(
        "[SCHED] Error (severity {}): {} (hint: {})",
        err.severity(),
        err,
        err.recovery_hint()
    );
    panic!("[SCHED CRITICAL] Invariant violated: {}", err);
}

/// Unwrap a handler-internal result, treating any error as fatal.
pub(crate) trait OrFatal<T> {
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for SchedulerResult<T> {
    #[track_caller]
    fn or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => invariant_violation(err),
        }
    }
}
