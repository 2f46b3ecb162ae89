//! Wake-up preemption advisor
//!
//! When a process becomes ready under SRTF or Priority, decide whether one
//! running CPU should give way to it:
//! 1. any idle CPU → no preemption, the idle CPU picks the process up
//! 2. otherwise find the weakest running process (largest remaining time,
//!    or numerically largest priority), lowest CPU id on ties
//! 3. preempt only if it is strictly weaker than the woken process
//!
//! The advisor only decides. Acting on the decision (requesting the
//! preemption) is left to the caller.

use crate::policy::Policy;
use crate::process::Process;
use crate::run_table::RunTableGuard;
use crate::CpuId;

/// Policy-specific wake-up preemption logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreemptionAdvisor {
    policy: Policy,
}

impl PreemptionAdvisor {
    pub const fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// FIFO and Round-Robin never preempt on wake-up
    pub fn is_active(&self) -> bool {
        self.policy.preempts_on_wake()
    }

    /// CPU to preempt in favour of `woken`, if any.
    ///
    /// `table` must be held across the whole decision.
    pub fn advise(&self, table: &RunTableGuard<'_>, woken: &Process) -> Option<CpuId> {
        let woken_key = self.policy.preemption_key(woken)?;

        let mut weakest: Option<(CpuId, u64)> = None;
        for (cpu_id, slot) in table.iter() {
            let running = match slot {
                Some(running) => running,
                None => return None,
            };
            let key = self.policy.preemption_key(running)?;
            match weakest {
                Some((_, worst)) if key <= worst => {}
                _ => weakest = Some((cpu_id, key)),
            }
        }

        let (cpu_id, worst) = weakest?;
        (worst > woken_key).then_some(cpu_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;
    use crate::run_table::RunTable;

    /// Build a table from `(priority, remaining)` per CPU, `None` = idle
    fn table_of(slots: &[Option<(u32, u64)>]) -> RunTable {
        let table = RunTable::new(slots.len());
        {
            let mut guard = table.lock();
            for (cpu, slot) in slots.iter().enumerate() {
                if let Some((prio, remaining)) = *slot {
                    guard.set(cpu, Some(Process::spawn(cpu as u32 + 100, "run", prio, remaining)));
                }
            }
        }
        table
    }

    #[test]
    fn test_priority_targets_worst() {
        let table = table_of(&[Some((1, 0)), Some((4, 0)), Some((2, 0))]);
        let advisor = PreemptionAdvisor::new(Policy::Priority);
        let woken = Process::new(1, "urgent", 0, 0);
        assert_eq!(advisor.advise(&table.lock(), &woken), Some(1));
    }

    #[test]
    fn test_priority_tie_picks_lowest_cpu() {
        let table = table_of(&[Some((3, 0)), Some((3, 0)), Some((3, 0))]);
        let advisor = PreemptionAdvisor::new(Policy::Priority);
        let woken = Process::new(1, "urgent", 0, 0);
        assert_eq!(advisor.advise(&table.lock(), &woken), Some(0));
    }

    #[test]
    fn test_equal_never_preempts() {
        let table = table_of(&[Some((2, 6)), Some((2, 6))]);
        let woken = Process::new(1, "same", 2, 6);
        assert_eq!(
            PreemptionAdvisor::new(Policy::Priority).advise(&table.lock(), &woken),
            None
        );
        assert_eq!(
            PreemptionAdvisor::new(Policy::Srtf).advise(&table.lock(), &woken),
            None
        );
    }

    #[test]
    fn test_srtf_targets_longest_remaining() {
        let table = table_of(&[Some((0, 4)), Some((0, 9)), Some((0, 9))]);
        let advisor = PreemptionAdvisor::new(Policy::Srtf);
        let woken = Process::new(1, "short", 0, 3);
        assert_eq!(advisor.advise(&table.lock(), &woken), Some(1));

        let long = Process::new(2, "long", 0, 12);
        assert_eq!(advisor.advise(&table.lock(), &long), None);
    }

    #[test]
    fn test_idle_cpu_suppresses_preemption() {
        let table = table_of(&[Some((9, 9)), None, Some((9, 9))]);
        let woken = Process::new(1, "urgent", 0, 0);
        for policy in [Policy::Srtf, Policy::Priority] {
            assert_eq!(PreemptionAdvisor::new(policy).advise(&table.lock(), &woken), None);
        }
    }

    #[test]
    fn test_fifo_and_rr_inactive() {
        let table = table_of(&[Some((9, 9))]);
        let woken = Process::new(1, "urgent", 0, 0);
        for policy in [Policy::Fifo, Policy::RoundRobin] {
            let advisor = PreemptionAdvisor::new(policy);
            assert!(!advisor.is_active());
            assert_eq!(advisor.advise(&table.lock(), &woken), None);
        }
    }
}
