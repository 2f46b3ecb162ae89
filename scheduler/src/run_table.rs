//! Run table - what each CPU is currently running
//!
//! One slot per CPU behind a single spinlock. Every access goes through a
//! [`RunTableGuard`], so a multi-slot scan sees one consistent table for as
//! long as the guard lives.
//!
//! CPU threads are plain OS threads that can be descheduled while holding the
//! lock, so waiters relax with [`Yield`] instead of spinning hot.

use crate::process::{Pid, ProcessHandle};
use crate::CpuId;
use spin::mutex::{Mutex, MutexGuard};
use spin::relax::Yield;

type Slots = Vec<Option<ProcessHandle>>;

/// Per-CPU running slots
pub struct RunTable {
    slots: Mutex<Slots, Yield>,
}

impl RunTable {
    /// Create a table with every CPU idle
    pub fn new(cpu_count: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; cpu_count]),
        }
    }

    /// Acquire the table lock
    pub fn lock(&self) -> RunTableGuard<'_> {
        RunTableGuard {
            slots: self.slots.lock(),
        }
    }

    pub fn cpu_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Pid running on each CPU
    pub fn pids(&self) -> Vec<Option<Pid>> {
        self.lock().pids()
    }
}

impl core::fmt::Debug for RunTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunTable").field("pids", &self.pids()).finish()
    }
}

/// Locked view of the run table
pub struct RunTableGuard<'a> {
    slots: MutexGuard<'a, Slots>,
}

impl RunTableGuard<'_> {
    /// Process running on `cpu_id`, `None` when idle or out of range
    pub fn get(&self, cpu_id: CpuId) -> Option<&ProcessHandle> {
        self.slots.get(cpu_id).and_then(Option::as_ref)
    }

    /// Install `process` on `cpu_id`, returning what was there.
    ///
    /// # Panics
    /// If `cpu_id` is out of range; callers check bounds first.
    pub fn set(&mut self, cpu_id: CpuId, process: Option<ProcessHandle>) -> Option<ProcessHandle> {
        core::mem::replace(&mut self.slots[cpu_id], process)
    }

    /// Empty the slot of `cpu_id`, returning its process.
    pub fn take(&mut self, cpu_id: CpuId) -> Option<ProcessHandle> {
        self.slots.get_mut(cpu_id).and_then(Option::take)
    }

    /// Iterate `(cpu_id, slot)` in CPU order
    pub fn iter(&self) -> impl Iterator<Item = (CpuId, Option<&ProcessHandle>)> + '_ {
        self.slots.iter().map(Option::as_ref).enumerate()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_idle_cpu(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    pub fn pids(&self) -> Vec<Option<Pid>> {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|p| p.pid()))
            .collect()
    }
}
