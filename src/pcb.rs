//! Process control block: the static attributes and mutable simulation
//! state of one process.

/// Which resource a burst consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BurstKind {
    Cpu,
    Io,
}

/// A contiguous span during which a process needs either CPU or I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Burst {
    pub kind: BurstKind,
    pub duration: u64,
}

/// A process's position in the state machine. Legal transitions are
/// enforced by [`Pcb::transition_to`]; see spec §4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

impl ProcessState {
    /// Whether `self -> to` is a legal edge in the state machine.
    fn can_transition(self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Running, Ready)
                | (Running, Waiting)
                | (Running, Terminated)
                | (Waiting, Ready)
                | (Waiting, Terminated)
        )
    }
}

/// Process control block. Created before the engine begins, owned by the
/// engine during the run, and returned read-only to callers after
/// termination (see [`crate::pool::ProcessPool`]).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Pcb {
    pub pid: u32,
    pub arrival_time: u64,
    pub original_priority: u32,
    pub bursts: Vec<Burst>,
    pub total_cpu_burst_time: u64,

    pub state: ProcessState,
    pub current_burst_index: usize,
    pub remaining_burst_time: u64,
    /// May decrease from `original_priority` via aging; never below 0, never
    /// above `original_priority`.
    pub priority: u32,
    pub last_ready_time: Option<u64>,
    pub first_run_tick: Option<u64>,
    pub completion_time: Option<u64>,
    /// MLFQ queue level; 0 = highest priority. Unused by non-MLFQ
    /// disciplines but always present for a uniform snapshot shape.
    pub queue_level: usize,
}

impl Pcb {
    /// Constructs a new PCB in state NEW. `bursts` must begin and end with
    /// a CPU burst (the workload layer guarantees this at validation time).
    pub fn new(pid: u32, arrival_time: u64, priority: u32, bursts: Vec<Burst>) -> Self {
        let total_cpu_burst_time = bursts
            .iter()
            .filter(|b| b.kind == BurstKind::Cpu)
            .map(|b| b.duration)
            .sum();
        let remaining_burst_time = bursts.first().map(|b| b.duration).unwrap_or(0);

        Pcb {
            pid,
            arrival_time,
            original_priority: priority,
            bursts,
            total_cpu_burst_time,
            state: ProcessState::New,
            current_burst_index: 0,
            remaining_burst_time,
            priority,
            last_ready_time: None,
            first_run_tick: None,
            completion_time: None,
            queue_level: 0,
        }
    }

    /// Transition to a new state. Panics in debug builds if the edge is
    /// illegal — that is always a scheduler bug, never user input, so a
    /// release build trusts the caller and simply records the state.
    pub fn transition_to(&mut self, to: ProcessState) {
        debug_assert!(
            self.state.can_transition(to),
            "illegal transition {:?} -> {:?} for pid {}",
            self.state,
            to,
            self.pid
        );
        self.state = to;
    }

    pub fn current_burst(&self) -> Option<&Burst> {
        self.bursts.get(self.current_burst_index)
    }

    /// Decrement `remaining_burst_time` by one tick. Returns true iff it
    /// just reached zero.
    pub fn execute_tick(&mut self) -> bool {
        if self.remaining_burst_time > 0 {
            self.remaining_burst_time -= 1;
        }
        self.remaining_burst_time == 0
    }

    /// Advance to the next burst. Returns false if there is no next burst
    /// (the process is complete); otherwise loads the new burst's duration
    /// as the remaining time and returns true.
    pub fn advance_burst(&mut self) -> bool {
        self.current_burst_index += 1;
        match self.bursts.get(self.current_burst_index) {
            Some(burst) => {
                self.remaining_burst_time = burst.duration;
                true
            }
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_burst_index >= self.bursts.len()
    }

    /// Decrease effective priority by `amount`, floored at 0. Never raises
    /// priority above `original_priority` (aging only ever lowers the
    /// numeric value, i.e. raises scheduling precedence).
    pub fn age_priority(&mut self, amount: u32) {
        self.priority = self.priority.saturating_sub(amount).min(self.original_priority);
    }

    pub fn response_time(&self) -> Option<u64> {
        self.first_run_tick.map(|t| t - self.arrival_time)
    }

    pub fn turnaround_time(&self) -> Option<u64> {
        self.completion_time.map(|t| t - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<u64> {
        self.turnaround_time().map(|t| t - self.total_cpu_burst_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(d: u64) -> Burst {
        Burst { kind: BurstKind::Cpu, duration: d }
    }
    fn io(d: u64) -> Burst {
        Burst { kind: BurstKind::Io, duration: d }
    }

    #[test]
    fn new_pcb_sums_only_cpu_bursts() {
        let p = Pcb::new(1, 0, 3, vec![cpu(5), io(2), cpu(3)]);
        assert_eq!(p.total_cpu_burst_time, 8);
        assert_eq!(p.remaining_burst_time, 5);
    }

    #[test]
    fn execute_tick_reports_completion_of_current_burst() {
        let mut p = Pcb::new(1, 0, 0, vec![cpu(2)]);
        assert!(!p.execute_tick());
        assert!(p.execute_tick());
        assert_eq!(p.remaining_burst_time, 0);
    }

    #[test]
    fn advance_burst_past_end_reports_completion() {
        let mut p = Pcb::new(1, 0, 0, vec![cpu(1)]);
        assert!(!p.advance_burst());
        assert!(p.is_complete());
    }

    #[test]
    fn advance_burst_loads_next_duration() {
        let mut p = Pcb::new(1, 0, 0, vec![cpu(1), io(4), cpu(2)]);
        assert!(p.advance_burst());
        assert_eq!(p.remaining_burst_time, 4);
        assert_eq!(p.current_burst().unwrap().kind, BurstKind::Io);
    }

    #[test]
    fn aging_never_drops_below_zero_or_rises_above_original() {
        let mut p = Pcb::new(1, 0, 3, vec![cpu(1)]);
        p.age_priority(10);
        assert_eq!(p.priority, 0);
        p.priority = 3;
        p.age_priority(0);
        assert_eq!(p.priority, 3);
    }

    #[test]
    #[should_panic]
    fn illegal_transition_panics_in_debug() {
        let mut p = Pcb::new(1, 0, 0, vec![cpu(1)]);
        p.transition_to(ProcessState::Terminated);
    }
}
