//! Ready queue
//!
//! One shared queue for all CPUs, ordered by the configured [`Policy`].
//! A single lock guards the entries; the "became non-empty" condition
//! variable waits on that same lock so a wake-up between the emptiness check
//! and the wait cannot be lost.

use crate::policy::Policy;
use crate::process::{Pid, ProcessHandle};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Outcome of [`ReadyQueue::wait_until_nonempty`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// At least one process is queued
    Ready,
    /// The queue was closed; the caller should stop
    Closed,
}

struct Inner {
    entries: VecDeque<ProcessHandle>,
    closed: bool,
}

/// Policy-ordered queue of ready processes
pub struct ReadyQueue {
    policy: Policy,
    inner: Mutex<Inner>,
    not_empty: Condvar,
}

impl ReadyQueue {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            inner: Mutex::new(Inner {
                entries: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Queue a ready process and wake one idle waiter.
    pub fn insert(&self, process: ProcessHandle) {
        let mut inner = self.inner.lock();
        let index = self.policy.insert_index(&inner.entries, &process);
        log::trace!(
            "[READYQ] insert pid {} at {}/{}",
            process.pid(),
            index,
            inner.entries.len()
        );
        inner.entries.insert(index, process);
        self.not_empty.notify_one();
    }

    /// Remove and return the next process to run, never blocking.
    pub fn select(&self) -> Option<ProcessHandle> {
        let mut inner = self.inner.lock();
        let index = self.policy.select_index(&inner.entries)?;
        inner.entries.remove(index)
    }

    /// Block until the queue holds a process or is closed.
    pub fn wait_until_nonempty(&self) -> WaitOutcome {
        let mut inner = self.inner.lock();
        loop {
            if inner.closed {
                return WaitOutcome::Closed;
            }
            if !inner.entries.is_empty() {
                return WaitOutcome::Ready;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Close the queue and release every waiter.
    ///
    /// Inserts and selects keep working; only waiting stops.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Pids in queue order
    pub fn pids(&self) -> Vec<Pid> {
        self.inner.lock().entries.iter().map(|p| p.pid()).collect()
    }

    /// Run `f` over the entries while holding the queue lock.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&VecDeque<ProcessHandle>) -> R) -> R {
        f(&self.inner.lock().entries)
    }
}

impl core::fmt::Debug for ReadyQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadyQueue")
            .field("policy", &self.policy)
            .field("pids", &self.pids())
            .finish()
    }
}
