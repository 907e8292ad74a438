//! The ready queue: an ordered collection of runnable process handles.
//!
//! Every reordering is stable and shares the same tie-break chain — policy
//! key first, then arrival time, then pid — so two processes that compare
//! equal on the policy key always resolve the same way regardless of which
//! sort produced the tie (spec §3, §4.1).

use std::collections::VecDeque;

use crate::pool::ProcessPool;

#[derive(Debug, Default)]
pub struct ReadyQueue {
    pids: VecDeque<u32>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue { pids: VecDeque::new() }
    }

    /// Appends at the tail. The caller is responsible for having already
    /// set the PCB's state to READY and its `last_ready_time` — the queue
    /// only orders handles, it does not mutate PCBs.
    pub fn enqueue(&mut self, pid: u32) {
        self.pids.push_back(pid);
    }

    pub fn dequeue(&mut self) -> Option<u32> {
        self.pids.pop_front()
    }

    pub fn remove(&mut self, pid: u32) -> Option<u32> {
        let pos = self.pids.iter().position(|&p| p == pid)?;
        self.pids.remove(pos)
    }

    pub fn peek_head(&self) -> Option<u32> {
        self.pids.front().copied()
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.pids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pids.iter().copied()
    }

    fn sort_by_key<K: Ord, F: Fn(u32) -> (K, u64, u32)>(&mut self, key: F) {
        let mut items: Vec<u32> = self.pids.drain(..).collect();
        items.sort_by_key(|&pid| key(pid));
        self.pids = items.into();
    }

    pub fn sort_by_arrival(&mut self, pool: &ProcessPool) {
        self.sort_by_key(|pid| {
            let p = pool.get(pid);
            (p.arrival_time, p.arrival_time, p.pid)
        });
    }

    pub fn sort_by_burst_remaining(&mut self, pool: &ProcessPool) {
        self.sort_by_key(|pid| {
            let p = pool.get(pid);
            (p.remaining_burst_time, p.arrival_time, p.pid)
        });
    }

    pub fn sort_by_priority(&mut self, pool: &ProcessPool) {
        self.sort_by_key(|pid| {
            let p = pool.get(pid);
            (p.priority as u64, p.arrival_time, p.pid)
        });
    }

    /// HRRN response ratio at tick `t`, descending (higher ratio first).
    /// `remaining` is guaranteed >= 1 at sort time: any process with
    /// remaining 0 has already advanced to its next burst (spec §4.1).
    pub fn sort_by_response_ratio(&mut self, pool: &ProcessPool, t: u64) {
        let mut items: Vec<u32> = self.pids.drain(..).collect();
        items.sort_by(|&a, &b| {
            let pa = pool.get(a);
            let pb = pool.get(b);
            let ratio = |p: &crate::pcb::Pcb| {
                let waiting = (t - p.arrival_time) as f64;
                let remaining = p.remaining_burst_time.max(1) as f64;
                (waiting + remaining) / remaining
            };
            // Descending ratio, then ascending arrival, then ascending pid.
            ratio(pb)
                .partial_cmp(&ratio(pa))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.arrival_time.cmp(&pb.arrival_time))
                .then(pa.pid.cmp(&pb.pid))
        });
        self.pids = items.into();
    }

    /// For each entry waiting since `last_ready_time`, decrease priority by
    /// `floor((t - last_ready_time) / interval) * boost`, floored at 0.
    /// A no-op when `interval == 0` (aging disabled).
    pub fn apply_aging(&mut self, pool: &mut ProcessPool, t: u64, interval: u64, boost: u32) {
        if interval == 0 {
            return;
        }
        for pid in self.pids.iter().copied() {
            let p = pool.get_mut(pid);
            if let Some(last) = p.last_ready_time {
                let k = (t - last) / interval;
                if k > 0 {
                    p.age_priority(k as u32 * boost);
                }
            }
        }
    }
}
