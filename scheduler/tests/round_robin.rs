//! Round-Robin quantum accounting on a single CPU.

mod common;

use common::{init_logging, Recorder};
use ossim_scheduler::{
    Pid, Policy, Process, ProcessHandle, ProcessState, SchedulerConfig, SchedulerCore, TimeSlice,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// One quantum as observed by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quantum {
    pid: Pid,
    ticks: u64,
    /// Ready processes left waiting while this one ran
    waiting: usize,
}

struct Trace {
    quanta: Vec<Quantum>,
    completions: Vec<Pid>,
}

/// Drive CPU 0 until it goes idle: run each dispatch for its slice, then
/// preempt, or terminate when the burst is used up.
fn run_to_idle(quantum: u32, bursts: &[u64]) -> Trace {
    init_logging();

    let config = SchedulerConfig::new(1, Policy::RoundRobin).with_time_slice(quantum);
    let core = SchedulerCore::new(config, Recorder::default()).expect("valid config");

    let procs: HashMap<Pid, ProcessHandle> = bursts
        .iter()
        .enumerate()
        .map(|(i, &burst)| {
            let pid = i as Pid + 1;
            (pid, Process::spawn(pid, format!("P{}", pid), 0, burst))
        })
        .collect();
    for pid in 1..=bursts.len() as Pid {
        core.wake_up(Arc::clone(&procs[&pid]));
    }

    let mut trace = Trace {
        quanta: Vec::new(),
        completions: Vec::new(),
    };

    core.schedule(0);
    loop {
        let (pid, slice) = match core.dispatcher().last_run(0) {
            Some((Some(pid), slice)) => (pid, slice),
            _ => break,
        };
        assert_eq!(slice, TimeSlice::Ticks(quantum));

        let process = &procs[&pid];
        assert_eq!(process.state(), ProcessState::Running);
        let ticks = process.remaining_time().min(u64::from(quantum));
        let left = process.consume(ticks);
        trace.quanta.push(Quantum {
            pid,
            ticks,
            waiting: core.ready_len(),
        });

        if left == 0 {
            trace.completions.push(pid);
            core.terminate(0);
        } else {
            core.preempt(0);
        }
        assert!(core.snapshot().is_consistent());
    }

    assert!(procs.values().all(|p| p.state() == ProcessState::Terminated));
    assert_eq!(core.stats().terminations, bursts.len() as u64);
    trace
}

#[test]
fn test_two_processes_alternate() {
    let trace = run_to_idle(2, &[5, 3]);

    let order: Vec<(Pid, u64)> = trace.quanta.iter().map(|q| (q.pid, q.ticks)).collect();
    assert_eq!(order, vec![(1, 2), (2, 2), (1, 2), (2, 1), (1, 1)]);
    assert_eq!(trace.completions, vec![2, 1]);
}

#[test]
fn test_single_process_reruns_alone() {
    let trace = run_to_idle(3, &[7]);
    let ticks: Vec<u64> = trace.quanta.iter().map(|q| q.ticks).collect();
    assert_eq!(ticks, vec![3, 3, 1]);
    assert!(trace.quanta.iter().all(|q| q.waiting == 0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_robin_is_fair(
        quantum in 1u32..5,
        bursts in proptest::collection::vec(1u64..12, 1..6),
    ) {
        let trace = run_to_idle(quantum, &bursts);

        // Every process gets exactly its burst.
        let mut held: HashMap<Pid, u64> = HashMap::new();
        for q in &trace.quanta {
            prop_assert!(q.ticks <= u64::from(quantum));
            *held.entry(q.pid).or_default() += q.ticks;
        }
        for (i, &burst) in bursts.iter().enumerate() {
            prop_assert_eq!(held[&(i as Pid + 1)], burst);
        }

        // Back-to-back quanta only when nobody else was waiting.
        for pair in trace.quanta.windows(2) {
            if pair[0].pid == pair[1].pid {
                prop_assert_eq!(pair[0].waiting, 0);
            }
        }
    }
}
