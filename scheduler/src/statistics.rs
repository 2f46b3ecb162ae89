//! Statistics - Scheduler event counters
//!
//! Tracks dispatches, preemptions, yields, etc.

use core::sync::atomic::{AtomicU64, Ordering};

/// Scheduler statistics
#[derive(Debug, Default)]
pub struct SchedulerStats {
    /// Dispatches of a process onto a CPU
    pub dispatches: AtomicU64,

    /// Dispatches of the idle routine
    pub idle_dispatches: AtomicU64,

    /// Preemptions (quantum expiry or forced)
    pub preemptions: AtomicU64,

    /// Forced preemptions requested on wake-up
    pub preempt_requests: AtomicU64,

    /// Voluntary yields for I/O
    pub yields: AtomicU64,

    /// Terminated processes
    pub terminations: AtomicU64,

    /// Processes made ready by wake_up
    pub wakeups: AtomicU64,
}

impl SchedulerStats {
    pub const fn new() -> Self {
        Self {
            dispatches: AtomicU64::new(0),
            idle_dispatches: AtomicU64::new(0),
            preemptions: AtomicU64::new(0),
            preempt_requests: AtomicU64::new(0),
            yields: AtomicU64::new(0),
            terminations: AtomicU64::new(0),
            wakeups: AtomicU64::new(0),
        }
    }

    /// Record a dispatch; `idle` when nothing was runnable
    pub fn record_dispatch(&self, idle: bool) {
        if idle {
            self.idle_dispatches.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dispatches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_preemption(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preempt_request(&self) {
        self.preempt_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_yield(&self) {
        self.yields.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_termination(&self) {
        self.terminations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_wakeup(&self) {
        self.wakeups.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            idle_dispatches: self.idle_dispatches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            preempt_requests: self.preempt_requests.load(Ordering::Relaxed),
            yields: self.yields.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time scheduler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub dispatches: u64,
    pub idle_dispatches: u64,
    pub preemptions: u64,
    pub preempt_requests: u64,
    pub yields: u64,
    pub terminations: u64,
    pub wakeups: u64,
}

impl StatsSnapshot {
    /// Share of dispatches that found work, in percent
    pub fn busy_ratio(&self) -> u8 {
        let total = self.dispatches + self.idle_dispatches;
        if total > 0 {
            ((self.dispatches * 100) / total) as u8
        } else {
            0
        }
    }
}
