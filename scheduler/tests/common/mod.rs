//! Test harness: dispatchers standing in for the simulator.

#![allow(dead_code)]

use ossim_scheduler::{CpuId, Dispatcher, Pid, ProcessHandle, TimeSlice};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Run(CpuId, Option<Pid>, TimeSlice),
    Preempt(CpuId),
}

/// Records every call in order
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.events.lock())
    }

    /// Most recent dispatch on `cpu_id`
    pub fn last_run(&self, cpu_id: CpuId) -> Option<(Option<Pid>, TimeSlice)> {
        self.events.lock().iter().rev().find_map(|event| match *event {
            Event::Run(cpu, pid, slice) if cpu == cpu_id => Some((pid, slice)),
            _ => None,
        })
    }

    pub fn preempt_requests(&self) -> Vec<CpuId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match *event {
                Event::Preempt(cpu) => Some(cpu),
                _ => None,
            })
            .collect()
    }
}

impl Dispatcher for Recorder {
    fn run(&self, cpu_id: CpuId, process: Option<&ProcessHandle>, slice: TimeSlice) {
        self.events
            .lock()
            .push(Event::Run(cpu_id, process.map(|p| p.pid()), slice));
    }

    fn request_preempt(&self, cpu_id: CpuId) {
        self.events.lock().push(Event::Preempt(cpu_id));
    }
}

/// Per-CPU "what am I running" cells, read by the CPU threads
pub struct CpuCells {
    assigned: Vec<Mutex<Option<ProcessHandle>>>,
    preempt_requested: Vec<AtomicBool>,
}

impl CpuCells {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            assigned: (0..cpu_count).map(|_| Mutex::new(None)).collect(),
            preempt_requested: (0..cpu_count).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn current(&self, cpu_id: CpuId) -> Option<ProcessHandle> {
        self.assigned[cpu_id].lock().clone()
    }

    /// Consume a pending forced-preemption request
    pub fn take_preempt_request(&self, cpu_id: CpuId) -> bool {
        self.preempt_requested[cpu_id].swap(false, Ordering::AcqRel)
    }
}

impl Dispatcher for CpuCells {
    fn run(&self, cpu_id: CpuId, process: Option<&ProcessHandle>, _slice: TimeSlice) {
        *self.assigned[cpu_id].lock() = process.cloned();
    }

    fn request_preempt(&self, cpu_id: CpuId) {
        self.preempt_requested[cpu_id].store(true, Ordering::Release);
    }
}
