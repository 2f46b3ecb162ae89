//! Scheduler Core - event handlers
//!
//! Entered by the simulator from its per-CPU threads and from I/O completion
//! threads. Every handler is safe under arbitrary interleaving.
//!
//! # Locking
//! - ready queue lock: insert/select/wait
//! - run table lock: every slot read or write, held across advisor scans
//!
//! No handler takes the ready queue lock while holding the run table lock.
//! [`SchedulerCore::snapshot`] is the only place holding both, and it always
//! takes the ready queue first.
//!
//! # State flips
//! READY → RUNNING happens together with installing the process in its slot,
//! and RUNNING → anything together with emptying it, both under the run table
//! lock. A process is therefore RUNNING exactly when it sits in one slot.

use crate::advisor::PreemptionAdvisor;
use crate::config::SchedulerConfig;
use crate::dispatch::Dispatcher;
use crate::error::{invariant_violation, OrFatal, SchedulerError, SchedulerResult};
use crate::policy::{Policy, TimeSlice};
use crate::process::{Pid, ProcessHandle, ProcessState};
use crate::ready_queue::{ReadyQueue, WaitOutcome};
use crate::run_table::RunTable;
use crate::statistics::{SchedulerStats, StatsSnapshot};
use crate::CpuId;

/// Multi-CPU scheduler decision core
pub struct SchedulerCore<D: Dispatcher> {
    config: SchedulerConfig,
    time_slice: TimeSlice,
    ready: ReadyQueue,
    running: RunTable,
    advisor: PreemptionAdvisor,
    dispatcher: D,
    stats: SchedulerStats,
}

impl<D: Dispatcher> SchedulerCore<D> {
    /// Validate `config` and build an idle core.
    pub fn new(config: SchedulerConfig, dispatcher: D) -> SchedulerResult<Self> {
        let time_slice = config.validate()?;

        log::info!(
            "[SCHED] {} cpu(s), policy {}, time slice {}",
            config.cpu_count,
            config.policy,
            time_slice
        );

        Ok(Self {
            config,
            time_slice,
            ready: ReadyQueue::new(config.policy),
            running: RunTable::new(config.cpu_count),
            advisor: PreemptionAdvisor::new(config.policy),
            dispatcher,
            stats: SchedulerStats::new(),
        })
    }

    /// Pick the next ready process for `cpu_id` and dispatch it.
    ///
    /// Dispatches `None` (the idle routine) when nothing is ready. The CPU's
    /// slot must be empty.
    pub fn schedule(&self, cpu_id: CpuId) {
        self.check_cpu(cpu_id);
        // Only this CPU's own thread fills its slot, so an empty slot here
        // stays empty until the install below.
        self.ensure_idle(cpu_id);

        let next = self.ready.select();
        let mut table = self.running.lock();
        if let Some(current) = table.get(cpu_id) {
            let pid = current.pid();
            drop(table);
            if let Some(process) = next {
                self.ready.insert(process);
            }
            invariant_violation(SchedulerError::CpuBusy { cpu_id, pid });
        }
        if let Some(process) = &next {
            process.transition(ProcessState::Running).or_fatal();
        }
        table.set(cpu_id, next.clone());
        drop(table);

        self.stats.record_dispatch(next.is_none());
        match &next {
            Some(process) => log::debug!(
                "[SCHED] cpu {} <- {} ({})",
                cpu_id,
                process,
                self.time_slice
            ),
            None => log::trace!("[SCHED] cpu {} <- idle", cpu_id),
        }

        self.dispatcher.run(cpu_id, next.as_ref(), self.time_slice);
    }

    /// Idle routine: block until something is ready, then schedule.
    ///
    /// Returns without dispatching once the core is shut down.
    pub fn idle(&self, cpu_id: CpuId) {
        self.check_cpu(cpu_id);

        match self.ready.wait_until_nonempty() {
            WaitOutcome::Ready => self.schedule(cpu_id),
            WaitOutcome::Closed => {
                log::debug!("[SCHED] cpu {} leaving idle: scheduler shut down", cpu_id)
            }
        }
    }

    /// Quantum expiry or forced preemption: requeue the running process.
    pub fn preempt(&self, cpu_id: CpuId) {
        let process = self.vacate(cpu_id, ProcessState::Ready);
        self.stats.record_preemption();
        log::debug!("[SCHED] cpu {} preempted {}", cpu_id, process);

        self.ready.insert(process);
        self.schedule(cpu_id);
    }

    /// The running process blocks for I/O; the simulator owns it until
    /// [`wake_up`](Self::wake_up).
    pub fn yield_cpu(&self, cpu_id: CpuId) {
        let process = self.vacate(cpu_id, ProcessState::Waiting);
        self.stats.record_yield();
        log::debug!("[SCHED] cpu {} yielded {}", cpu_id, process);

        self.schedule(cpu_id);
    }

    /// The running process finished; the simulator disposes of it.
    pub fn terminate(&self, cpu_id: CpuId) {
        let process = self.vacate(cpu_id, ProcessState::Terminated);
        self.stats.record_termination();
        log::debug!("[SCHED] cpu {} terminated {}", cpu_id, process);

        self.schedule(cpu_id);
    }

    /// A new or I/O-completed process becomes ready.
    ///
    /// Under SRTF and Priority this may request a forced preemption of the
    /// weakest running CPU.
    pub fn wake_up(&self, process: ProcessHandle) {
        process.transition(ProcessState::Ready).or_fatal();
        self.stats.record_wakeup();
        log::debug!("[SCHED] wake_up {}", process);

        if !self.advisor.is_active() {
            self.ready.insert(process);
            return;
        }

        self.ready.insert(ProcessHandle::clone(&process));

        let target = {
            let table = self.running.lock();
            // Already picked up by an idle CPU: nothing to make room for.
            if !process.state().is_schedulable() {
                None
            } else {
                self.advisor.advise(&table, &process)
            }
        };

        if let Some(cpu_id) = target {
            self.stats.record_preempt_request();
            log::debug!(
                "[SCHED] {} requests preemption of cpu {}",
                process,
                cpu_id
            );
            self.dispatcher.request_preempt(cpu_id);
        }
    }

    /// Release every idle CPU and stop blocking in [`idle`](Self::idle).
    pub fn shutdown(&self) {
        let stats = self.stats.snapshot();
        log::info!(
            "[SCHED] shutting down after {} dispatches ({}% busy)",
            stats.dispatches + stats.idle_dispatches,
            stats.busy_ratio()
        );
        self.ready.close();
    }

    pub fn is_shut_down(&self) -> bool {
        self.ready.is_closed()
    }

    /// Consistent view of the ready queue and run table.
    pub fn snapshot(&self) -> Snapshot {
        self.ready.with_entries(|entries| {
            let table = self.running.lock();

            let mut misplaced: Vec<Pid> = entries
                .iter()
                .filter(|p| p.state() != ProcessState::Ready)
                .map(|p| p.pid())
                .collect();
            misplaced.extend(
                table
                    .iter()
                    .filter_map(|(_, slot)| slot)
                    .filter(|p| p.state() != ProcessState::Running)
                    .map(|p| p.pid()),
            );

            Snapshot {
                ready: entries.iter().map(|p| p.pid()).collect(),
                running: table.pids(),
                misplaced,
            }
        })
    }

    /// Pid running on `cpu_id`
    pub fn running_pid(&self, cpu_id: CpuId) -> Option<Pid> {
        self.running.lock().get(cpu_id).map(|p| p.pid())
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    pub fn time_slice(&self) -> TimeSlice {
        self.time_slice
    }

    pub fn cpu_count(&self) -> usize {
        self.config.cpu_count
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    fn check_cpu(&self, cpu_id: CpuId) {
        if cpu_id >= self.config.cpu_count {
            invariant_violation(SchedulerError::CpuOutOfRange {
                cpu_id,
                cpu_count: self.config.cpu_count,
            });
        }
    }

    /// Fatal `CpuBusy` unless `cpu_id`'s slot is empty.
    fn ensure_idle(&self, cpu_id: CpuId) {
        let occupant = self.running.lock().get(cpu_id).map(|p| p.pid());
        if let Some(pid) = occupant {
            invariant_violation(SchedulerError::CpuBusy { cpu_id, pid });
        }
    }

    /// Empty `cpu_id`'s slot and move its process to `to`.
    fn vacate(&self, cpu_id: CpuId, to: ProcessState) -> ProcessHandle {
        self.check_cpu(cpu_id);

        let mut table = self.running.lock();
        let taken = table.take(cpu_id);
        let process = match taken {
            Some(process) => process,
            None => {
                drop(table);
                invariant_violation(SchedulerError::NoRunningProcess { cpu_id })
            }
        };
        process.transition(to).or_fatal();
        process
    }
}

impl<D: Dispatcher> core::fmt::Debug for SchedulerCore<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SchedulerCore")
            .field("config", &self.config)
            .field("time_slice", &self.time_slice)
            .field("ready", &self.ready)
            .field("running", &self.running)
            .finish()
    }
}

/// Ready queue and run table contents at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Ready pids in queue order
    pub ready: Vec<Pid>,
    /// Pid per CPU, `None` when idle
    pub running: Vec<Option<Pid>>,
    /// Queued but not READY, or in a slot but not RUNNING
    pub misplaced: Vec<Pid>,
}

impl Snapshot {
    /// Pids reachable more than once from the queue and the table
    pub fn duplicates(&self) -> Vec<Pid> {
        let mut seen: Vec<Pid> = self
            .ready
            .iter()
            .copied()
            .chain(self.running.iter().flatten().copied())
            .collect();
        seen.sort_unstable();
        let mut dups: Vec<Pid> = seen.windows(2).filter(|w| w[0] == w[1]).map(|w| w[0]).collect();
        dups.dedup();
        dups
    }

    pub fn is_consistent(&self) -> bool {
        self.misplaced.is_empty() && self.duplicates().is_empty()
    }

    pub fn idle_cpus(&self) -> usize {
        self.running.iter().filter(|slot| slot.is_none()).count()
    }
}
