//! Owns every PCB for the duration of a run.
//!
//! Queues hold plain `u32` pid handles rather than owning or pointing at
//! PCBs directly (spec §9, "Indices, not pointers"); the pool is the single
//! place PCB state actually lives, with O(1) lookup by pid via an auxiliary
//! index map.

use std::collections::HashMap;

use crate::pcb::Pcb;

pub struct ProcessPool {
    processes: Vec<Pcb>,
    index_of: HashMap<u32, usize>,
}

impl ProcessPool {
    pub fn new(processes: Vec<Pcb>) -> Self {
        let index_of = processes.iter().enumerate().map(|(i, p)| (p.pid, i)).collect();
        ProcessPool { processes, index_of }
    }

    pub fn get(&self, pid: u32) -> &Pcb {
        &self.processes[self.index_of[&pid]]
    }

    pub fn get_mut(&mut self, pid: u32) -> &mut Pcb {
        let idx = self.index_of[&pid];
        &mut self.processes[idx]
    }

    /// The pid at construction-order position `index`. Construction order
    /// is arrival/pid-stable (the workload loader guarantees this), so the
    /// engine walks this to admit arrivals in order without re-sorting.
    pub fn pid_at(&self, index: usize) -> u32 {
        self.processes[index].pid
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.processes.iter()
    }

    pub fn all_terminated(&self) -> bool {
        self.processes
            .iter()
            .all(|p| p.state == crate::pcb::ProcessState::Terminated)
    }

    /// Consumes the pool, returning the final PCB snapshots in pid order —
    /// the order they were constructed in, which the workload loader
    /// guarantees is also arrival/pid-stable order.
    pub fn into_snapshots(self) -> Vec<Pcb> {
        self.processes
    }
}
