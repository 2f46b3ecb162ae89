//! OS-Sim scheduler core
//!
//! Decision core of a simulated multi-processor scheduler. Given a pool of
//! CPUs and a stream of process lifecycle events, it decides which ready
//! process runs on which CPU, under one of four policies:
//!
//! | policy      | queue order              | time slice | wake-up preemption |
//! |-------------|--------------------------|------------|--------------------|
//! | FIFO        | arrival                  | unbounded  | never              |
//! | Round-Robin | arrival                  | quantum    | never              |
//! | SRTF        | remaining time, stable   | unbounded  | longest remaining  |
//! | Priority    | lowest value at select   | unbounded  | worst priority     |
//!
//! The discrete-event simulator stays outside: it drives [`SchedulerCore`]
//! through the event handlers (`idle`, `preempt`, `yield_cpu`, `terminate`,
//! `wake_up`) from its CPU and I/O threads, and receives decisions through
//! its [`Dispatcher`] implementation.

pub mod advisor;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod policy;
pub mod process;
pub mod ready_queue;
pub mod run_table;
pub mod scheduler;
pub mod statistics;

/// Index of a simulated CPU
pub type CpuId = usize;

// Re-exports
pub use advisor::PreemptionAdvisor;
pub use config::SchedulerConfig;
pub use dispatch::Dispatcher;
pub use error::{invariant_violation, SchedulerError, SchedulerResult};
pub use policy::{Policy, TimeSlice};
pub use process::{Pid, Process, ProcessHandle, ProcessState};
pub use ready_queue::{ReadyQueue, WaitOutcome};
pub use run_table::{RunTable, RunTableGuard};
pub use scheduler::{SchedulerCore, Snapshot};
pub use statistics::{SchedulerStats, StatsSnapshot};
