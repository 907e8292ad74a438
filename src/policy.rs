//! Algorithm policies (spec §4.4): one selection function, one preemption
//! predicate, and a quantum per discipline. Non-MLFQ disciplines share a
//! single trait so the engine's non-MLFQ tick loop is written once,
//! parameterized by whichever policy is active (spec §9, "Policies as
//! data").

use crate::pcb::Pcb;
use crate::pool::ProcessPool;
use crate::queue::ReadyQueue;

/// The seven non-MLFQ disciplines, plus MLFQ itself (handled separately by
/// the engine — its multi-level structure doesn't fit this trait).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Discipline {
    Fcfs,
    Sjf,
    Srtf,
    PriorityNp,
    PriorityP,
    RoundRobin,
    Hrrn,
    Mlfq,
}

impl Discipline {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fcfs" => Some(Discipline::Fcfs),
            "sjf" => Some(Discipline::Sjf),
            "srtf" => Some(Discipline::Srtf),
            "priority-np" | "prioritynp" => Some(Discipline::PriorityNp),
            "priority-p" | "priorityp" => Some(Discipline::PriorityP),
            "round-robin" | "rr" | "roundrobin" => Some(Discipline::RoundRobin),
            "hrrn" => Some(Discipline::Hrrn),
            "mlfq" => Some(Discipline::Mlfq),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Discipline::Fcfs => "FCFS",
            Discipline::Sjf => "SJF",
            Discipline::Srtf => "SRTF",
            Discipline::PriorityNp => "PRIORITY-NP",
            Discipline::PriorityP => "PRIORITY-P",
            Discipline::RoundRobin => "ROUND ROBIN",
            Discipline::Hrrn => "HRRN",
            Discipline::Mlfq => "MLFQ",
        }
    }

    /// Builds the boxed policy for this discipline. Panics if called on
    /// `Mlfq`, which the engine handles through a dedicated code path, not
    /// through `SchedulingPolicy`.
    pub fn build(self) -> Box<dyn SchedulingPolicy> {
        match self {
            Discipline::Fcfs => Box::new(Fcfs),
            Discipline::Sjf => Box::new(Sjf),
            Discipline::Srtf => Box::new(Srtf),
            Discipline::PriorityNp => Box::new(PriorityNp),
            Discipline::PriorityP => Box::new(PriorityP),
            Discipline::RoundRobin => Box::new(RoundRobin),
            Discipline::Hrrn => Box::new(Hrrn),
            Discipline::Mlfq => panic!("MLFQ is handled by the engine directly, not via SchedulingPolicy"),
        }
    }
}

/// A single, flat ready structure's selection and preemption rule. The
/// quantum (if any) is read from `SimConfig` by the engine, not from the
/// policy itself, since Round Robin's quantum is a run-time configuration
/// value rather than a per-discipline constant.
pub trait SchedulingPolicy {
    /// Reorders `ready` as this discipline's selection rule requires and
    /// dequeues the head. Returns `None` if `ready` is empty.
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, t: u64) -> Option<u32>;

    /// May the running PCB be displaced right now by some ready PCB?
    /// Quantum-exhaustion preemption is handled by the engine uniformly
    /// before this is consulted (spec §4.5 step 4).
    fn preempts(&self, running: &Pcb, ready: &ReadyQueue, pool: &ProcessPool) -> bool;

    fn is_quantum_based(&self) -> bool {
        false
    }
}

pub struct Fcfs;
impl SchedulingPolicy for Fcfs {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.sort_by_arrival(pool);
        ready.dequeue()
    }
    fn preempts(&self, _running: &Pcb, _ready: &ReadyQueue, _pool: &ProcessPool) -> bool {
        false
    }
}

pub struct Sjf;
impl SchedulingPolicy for Sjf {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.sort_by_burst_remaining(pool);
        ready.dequeue()
    }
    fn preempts(&self, _running: &Pcb, _ready: &ReadyQueue, _pool: &ProcessPool) -> bool {
        false
    }
}

pub struct Srtf;
impl SchedulingPolicy for Srtf {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.sort_by_burst_remaining(pool);
        ready.dequeue()
    }
    fn preempts(&self, running: &Pcb, ready: &ReadyQueue, pool: &ProcessPool) -> bool {
        ready.iter().any(|pid| pool.get(pid).remaining_burst_time < running.remaining_burst_time)
    }
}

pub struct PriorityNp;
impl SchedulingPolicy for PriorityNp {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.sort_by_priority(pool);
        ready.dequeue()
    }
    fn preempts(&self, _running: &Pcb, _ready: &ReadyQueue, _pool: &ProcessPool) -> bool {
        false
    }
}

pub struct PriorityP;
impl SchedulingPolicy for PriorityP {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.sort_by_priority(pool);
        ready.dequeue()
    }
    fn preempts(&self, running: &Pcb, ready: &ReadyQueue, pool: &ProcessPool) -> bool {
        ready.iter().any(|pid| pool.get(pid).priority < running.priority)
    }
}

pub struct RoundRobin;
impl SchedulingPolicy for RoundRobin {
    fn select(&self, ready: &mut ReadyQueue, _pool: &ProcessPool, _t: u64) -> Option<u32> {
        ready.dequeue()
    }
    fn preempts(&self, _running: &Pcb, _ready: &ReadyQueue, _pool: &ProcessPool) -> bool {
        false
    }
    fn is_quantum_based(&self) -> bool {
        true
    }
}

pub struct Hrrn;
impl SchedulingPolicy for Hrrn {
    fn select(&self, ready: &mut ReadyQueue, pool: &ProcessPool, t: u64) -> Option<u32> {
        ready.sort_by_response_ratio(pool, t);
        ready.dequeue()
    }
    fn preempts(&self, _running: &Pcb, _ready: &ReadyQueue, _pool: &ProcessPool) -> bool {
        false
    }
}
