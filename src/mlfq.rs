//! Multilevel feedback queue: a fixed stack of ready queues with
//! demote/promote operations (spec §3, §4.1, §4.5).

use crate::pool::ProcessPool;
use crate::queue::ReadyQueue;

pub const NUM_LEVELS: usize = 3;

pub struct Mlfq {
    levels: [ReadyQueue; NUM_LEVELS],
    /// Finite quantum for levels 0..N-2; the lowest level has no quantum.
    quanta: [Option<u64>; NUM_LEVELS],
}

impl Mlfq {
    pub fn new(q0: u64, q1: u64) -> Self {
        Mlfq {
            levels: Default::default(),
            quanta: [Some(q0), Some(q1), None],
        }
    }

    pub fn quantum_at(&self, level: usize) -> Option<u64> {
        self.quanta[level]
    }

    /// Enqueue at the tail of `level`. Caller has already set state READY
    /// and `last_ready_time`, matching `ReadyQueue::enqueue`.
    pub fn enqueue(&mut self, level: usize, pid: u32) {
        self.levels[level.min(NUM_LEVELS - 1)].enqueue(pid);
    }

    /// Scans from level 0 downward and returns the first non-empty queue's
    /// head, along with its level and quantum.
    pub fn peek(&self) -> Option<(usize, u32)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(level, q)| q.peek_head().map(|pid| (level, pid)))
    }

    pub fn dequeue_next(&mut self) -> Option<(usize, u32, Option<u64>)> {
        for (level, q) in self.levels.iter_mut().enumerate() {
            if let Some(pid) = q.dequeue() {
                return Some((level, pid, self.quanta[level]));
            }
        }
        None
    }

    pub fn remove(&mut self, level: usize, pid: u32) -> Option<u32> {
        self.levels[level].remove(pid)
    }

    pub fn level_mut(&mut self, level: usize) -> &mut ReadyQueue {
        &mut self.levels[level]
    }

    pub fn level(&self, level: usize) -> &ReadyQueue {
        &self.levels[level]
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(|q| q.is_empty())
    }

    /// True iff some level strictly above `below_level` has a ready entry —
    /// used by the engine's preemption check (spec §4.5 step 4).
    pub fn has_higher_priority_than(&self, below_level: usize) -> bool {
        self.levels[..below_level].iter().any(|q| !q.is_empty())
    }

    pub fn demote(level: usize) -> usize {
        (level + 1).min(NUM_LEVELS - 1)
    }

    pub fn promote(level: usize) -> usize {
        level.saturating_sub(1)
    }

    /// Aging-promotion across all levels >= 1: any entry that has waited
    /// `floor((t - last_ready_time) / interval)` whole intervals is bumped
    /// up that many levels, floored at level 0. A no-op when
    /// `interval == 0`. Unlike priority aging (`ReadyQueue::apply_aging`),
    /// this moves the process between levels rather than adjusting a
    /// numeric priority value — the promotion step count, not `boost`, is
    /// what matters here (see DESIGN.md, Open Question 3).
    pub fn apply_aging_promotion(&mut self, pool: &mut ProcessPool, t: u64, interval: u64) {
        if interval == 0 {
            return;
        }
        for level in 1..NUM_LEVELS {
            let mut promoted = Vec::new();
            self.levels[level].iter().for_each(|pid| {
                let p = pool.get(pid);
                if let Some(last) = p.last_ready_time {
                    let k = (t - last) / interval;
                    if k > 0 {
                        promoted.push((pid, k as usize));
                    }
                }
            });
            for (pid, steps) in promoted {
                self.levels[level].remove(pid);
                let new_level = level.saturating_sub(steps);
                self.levels[new_level].enqueue(pid);
                pool.get_mut(pid).queue_level = new_level;
                pool.get_mut(pid).last_ready_time = Some(t);
            }
        }
    }
}
