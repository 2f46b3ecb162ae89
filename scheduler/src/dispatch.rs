//! Dispatcher - the simulator side of the boundary
//!
//! The core never switches contexts itself. It tells the simulator what each
//! CPU should run through [`Dispatcher::run`], and asks for a forced
//! preemption through [`Dispatcher::request_preempt`].

use crate::policy::TimeSlice;
use crate::process::ProcessHandle;
use crate::CpuId;
use std::sync::Arc;

/// Primitives the simulator provides to the scheduler core
pub trait Dispatcher: Send + Sync {
    /// Context-switch `cpu_id` to `process`, or to the idle routine on `None`.
    ///
    /// Called with no scheduler lock held.
    fn run(&self, cpu_id: CpuId, process: Option<&ProcessHandle>, slice: TimeSlice);

    /// Ask `cpu_id` to preempt its running process.
    ///
    /// The simulator honours the request by calling
    /// [`SchedulerCore::preempt`](crate::SchedulerCore::preempt) from that
    /// CPU's own thread. Called with no scheduler lock held.
    fn request_preempt(&self, cpu_id: CpuId);
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn run(&self, cpu_id: CpuId, process: Option<&ProcessHandle>, slice: TimeSlice) {
        (**self).run(cpu_id, process, slice)
    }

    fn request_preempt(&self, cpu_id: CpuId) {
        (**self).request_preempt(cpu_id)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn run(&self, cpu_id: CpuId, process: Option<&ProcessHandle>, slice: TimeSlice) {
        (**self).run(cpu_id, process, slice)
    }

    fn request_preempt(&self, cpu_id: CpuId) {
        (**self).request_preempt(cpu_id)
    }
}
