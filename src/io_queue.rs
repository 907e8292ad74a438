//! The I/O queue: processes blocked on an I/O burst, ticked in parallel.

use crate::pool::ProcessPool;

#[derive(Debug, Default)]
pub struct IoQueue {
    /// (pid, remaining I/O ticks), order irrelevant for correctness.
    waiting: Vec<(u32, u64)>,
}

/// Outcome of a completed I/O burst: either the process has more bursts
/// (ready to resume), or it just terminated (rare — a process whose last
/// burst is I/O; spec §4.6 `WAITING -> TERMINATED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCompletion {
    ReadyForMore { pid: u32 },
    Terminated { pid: u32 },
}

impl IoQueue {
    pub fn new() -> Self {
        IoQueue { waiting: Vec::new() }
    }

    pub fn enqueue(&mut self, pid: u32, duration: u64) {
        self.waiting.push((pid, duration));
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.waiting.iter().any(|&(p, _)| p == pid)
    }

    /// Decrement every waiter's remaining time by one tick. Entries that
    /// reach zero are removed and their PCB is advanced to the next burst;
    /// completions are returned in a single batch, in the (fixed,
    /// deterministic) order they were enqueued.
    pub fn tick(&mut self, pool: &mut ProcessPool) -> Vec<IoCompletion> {
        for entry in self.waiting.iter_mut() {
            if entry.1 > 0 {
                entry.1 -= 1;
            }
        }

        let mut completions = Vec::new();
        self.waiting.retain(|&(pid, remaining)| {
            if remaining == 0 {
                let pcb = pool.get_mut(pid);
                if pcb.advance_burst() {
                    completions.push(IoCompletion::ReadyForMore { pid });
                } else {
                    completions.push(IoCompletion::Terminated { pid });
                }
                false
            } else {
                true
            }
        });
        completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::{Burst, BurstKind, Pcb};

    /// Builds a PCB already parked on its I/O burst, as the engine leaves it
    /// just before handing it to the I/O queue (spec §4.5 step 8).
    fn parked_on_io(pid: u32, bursts: Vec<Burst>) -> Pcb {
        let mut p = Pcb::new(pid, 0, 0, bursts);
        p.advance_burst();
        p
    }

    #[test]
    fn completions_advance_the_pcbs_burst() {
        let pcb = parked_on_io(1, vec![
            Burst { kind: BurstKind::Cpu, duration: 1 },
            Burst { kind: BurstKind::Io, duration: 2 },
            Burst { kind: BurstKind::Cpu, duration: 3 },
        ]);
        let mut pool = ProcessPool::new(vec![pcb]);
        let mut q = IoQueue::new();
        q.enqueue(1, 2);

        assert!(q.tick(&mut pool).is_empty());
        let completions = q.tick(&mut pool);
        assert_eq!(completions, vec![IoCompletion::ReadyForMore { pid: 1 }]);
        assert_eq!(pool.get(1).remaining_burst_time, 3);
    }

    #[test]
    fn io_completion_with_no_further_bursts_terminates() {
        let pcb = parked_on_io(1, vec![
            Burst { kind: BurstKind::Cpu, duration: 1 },
            Burst { kind: BurstKind::Io, duration: 1 },
        ]);
        let mut pool = ProcessPool::new(vec![pcb]);
        let mut q = IoQueue::new();
        q.enqueue(1, 1);
        let completions = q.tick(&mut pool);
        assert_eq!(completions, vec![IoCompletion::Terminated { pid: 1 }]);
    }

    #[test]
    fn all_waiters_age_simultaneously() {
        let pool_pcbs = vec![
            parked_on_io(1, vec![Burst { kind: BurstKind::Cpu, duration: 1 }, Burst { kind: BurstKind::Io, duration: 1 }]),
            parked_on_io(2, vec![Burst { kind: BurstKind::Cpu, duration: 1 }, Burst { kind: BurstKind::Io, duration: 1 }]),
        ];
        let mut pool = ProcessPool::new(pool_pcbs);
        let mut q = IoQueue::new();
        q.enqueue(1, 1);
        q.enqueue(2, 1);
        let completions = q.tick(&mut pool);
        assert_eq!(completions.len(), 2);
    }
}
