//! The per-tick simulation engine (spec §4.5): the sole mutator of process
//! state. Composes arrival admission, I/O completion, context-switch
//! debiting, preemption, aging, selection, execution, and termination in a
//! fixed order every tick.

use crate::config::SimConfig;
use crate::error::SimError;
use crate::io_queue::IoCompletion;
use crate::io_queue::IoQueue;
use crate::mlfq::Mlfq;
use crate::pcb::{BurstKind, Pcb, ProcessState};
use crate::policy::{Discipline, SchedulingPolicy};
use crate::pool::ProcessPool;
use crate::queue::ReadyQueue;
use crate::timeline::{RawTick, TickKind, Transition};

/// Which ready structure this discipline uses. MLFQ gets its own
/// multi-level structure; every other discipline shares one flat queue and
/// a boxed [`SchedulingPolicy`].
enum ReadyStructure {
    Flat(ReadyQueue),
    Mlfq(Mlfq),
}

struct RunningState {
    pid: u32,
    /// MLFQ level, if the active discipline is MLFQ.
    level: Option<usize>,
    /// Active quantum, if this discipline is quantum-based (Round Robin or
    /// MLFQ); `None` otherwise.
    quantum: Option<u64>,
}

pub struct EngineOutput {
    pub raw_timeline: Vec<RawTick>,
    pub transitions: Vec<Transition>,
    pub pool: ProcessPool,
    pub total_time: u64,
    pub cpu_busy_ticks: u64,
}

pub struct Engine {
    pool: ProcessPool,
    discipline: Discipline,
    policy: Option<Box<dyn SchedulingPolicy>>,
    ready: ReadyStructure,
    io_queue: IoQueue,
    config: SimConfig,

    current_time: u64,
    running: Option<RunningState>,
    time_in_slice: u64,
    context_switch_remaining: u64,
    arrival_cursor: usize,
    cpu_busy_ticks: u64,

    raw_timeline: Vec<RawTick>,
    transitions: Vec<Transition>,
}

impl Engine {
    pub fn new(pcbs: Vec<Pcb>, discipline: Discipline, config: SimConfig) -> Self {
        let pool = ProcessPool::new(pcbs);
        let (policy, ready) = match discipline {
            Discipline::Mlfq => (None, ReadyStructure::Mlfq(Mlfq::new(config.q1_time_quantum, config.q2_time_quantum))),
            other => (Some(other.build()), ReadyStructure::Flat(ReadyQueue::new())),
        };
        Engine {
            pool,
            discipline,
            policy,
            ready,
            io_queue: IoQueue::new(),
            config,
            current_time: 0,
            running: None,
            time_in_slice: 0,
            context_switch_remaining: 0,
            arrival_cursor: 0,
            cpu_busy_ticks: 0,
            raw_timeline: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Runs the engine to completion. Returns `IterationCapExceeded` if the
    /// hard tick cap is reached without every process terminating.
    pub fn run(mut self) -> Result<EngineOutput, SimError> {
        tracing::info!(
            target: "schedsim::engine",
            discipline = self.discipline.name(),
            processes = self.pool.len(),
            "starting run"
        );

        loop {
            if self.pool.all_terminated() {
                break;
            }
            if self.current_time >= self.config.max_ticks {
                tracing::error!(
                    target: "schedsim::engine",
                    at_tick = self.current_time,
                    "iteration cap exceeded without termination"
                );
                return Err(SimError::IterationCapExceeded { at_tick: self.current_time });
            }
            if self.config.max_ticks >= 20 && self.current_time == self.config.max_ticks * 19 / 20 {
                tracing::warn!(
                    target: "schedsim::engine",
                    at_tick = self.current_time,
                    cap = self.config.max_ticks,
                    "approaching iteration cap"
                );
            }

            self.admit_arrivals();
            self.process_io_completions();

            if self.context_switch_remaining > 0 {
                self.context_switch_remaining -= 1;
                self.raw_timeline.push(RawTick { tick: self.current_time, kind: TickKind::ContextSwitch });
                self.current_time += 1;
                continue;
            }

            self.apply_preemption();
            self.apply_aging();
            self.select_if_idle();
            self.execute_or_idle();

            self.current_time += 1;
        }

        tracing::info!(
            target: "schedsim::engine",
            total_time = self.current_time,
            cpu_busy_ticks = self.cpu_busy_ticks,
            "run complete"
        );

        Ok(EngineOutput {
            raw_timeline: self.raw_timeline,
            transitions: self.transitions,
            pool: self.pool,
            total_time: self.current_time,
            cpu_busy_ticks: self.cpu_busy_ticks,
        })
    }

    fn set_context_switch_if_needed(&mut self) {
        if self.config.context_switch_time > 0 && !self.pool.all_terminated() {
            self.context_switch_remaining = self.config.context_switch_time;
        }
    }

    /// Step 1: admit every process whose arrival time has come due, in the
    /// stable arrival/pid order the workload loader already sorted them
    /// into.
    fn admit_arrivals(&mut self) {
        while self.arrival_cursor < self.pool.len() {
            let pid = self.pool.pid_at(self.arrival_cursor);
            if self.pool.get(pid).arrival_time > self.current_time {
                break;
            }
            self.arrival_cursor += 1;

            let t = self.current_time;
            let from = self.pool.get(pid).state;
            {
                let pcb = self.pool.get_mut(pid);
                pcb.transition_to(ProcessState::Ready);
                pcb.last_ready_time = Some(t);
            }
            self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Ready });

            match &mut self.ready {
                ReadyStructure::Flat(q) => q.enqueue(pid),
                ReadyStructure::Mlfq(m) => {
                    self.pool.get_mut(pid).queue_level = 0;
                    m.enqueue(0, pid);
                }
            }
        }
    }

    /// Step 2: tick the I/O queue; ready or terminate whatever completes.
    fn process_io_completions(&mut self) {
        let completions = self.io_queue.tick(&mut self.pool);
        for completion in completions {
            match completion {
                IoCompletion::ReadyForMore { pid } => self.ready_after_io(pid),
                IoCompletion::Terminated { pid } => self.terminate(pid, ProcessState::Waiting),
            }
        }
    }

    /// I/O completion is logged, like termination, at `currentTime + 1`
    /// (DESIGN.md, Open Question 1) even though the process is enqueued and
    /// already selectable within this same tick.
    fn ready_after_io(&mut self, pid: u32) {
        let t = self.current_time + 1;
        let from = self.pool.get(pid).state;
        let new_level = match &self.ready {
            ReadyStructure::Mlfq(_) => Some(Mlfq::promote(self.pool.get(pid).queue_level)),
            ReadyStructure::Flat(_) => None,
        };
        {
            let pcb = self.pool.get_mut(pid);
            pcb.transition_to(ProcessState::Ready);
            pcb.last_ready_time = Some(t);
            if let Some(level) = new_level {
                pcb.queue_level = level;
            }
        }
        self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Ready });

        match &mut self.ready {
            ReadyStructure::Flat(q) => q.enqueue(pid),
            ReadyStructure::Mlfq(m) => m.enqueue(new_level.unwrap(), pid),
        }
    }

    /// Step 4: may the running process be displaced right now?
    fn apply_preemption(&mut self) {
        let (pid, level, quantum) = match &self.running {
            Some(r) => (r.pid, r.level, r.quantum),
            None => return,
        };

        let mut decision: Option<bool> = None;
        if let Some(q) = quantum {
            if self.time_in_slice >= q {
                decision = Some(true);
            }
        }
        if decision.is_none() {
            decision = match &self.ready {
                ReadyStructure::Mlfq(m) => {
                    let level = level.expect("MLFQ running state always carries a level");
                    if m.has_higher_priority_than(level) { Some(false) } else { None }
                }
                ReadyStructure::Flat(q) => {
                    let policy = self.policy.as_ref().expect("non-MLFQ discipline always has a policy");
                    if !policy.is_quantum_based() && policy.preempts(self.pool.get(pid), q, &self.pool) {
                        Some(false)
                    } else {
                        None
                    }
                }
            };
        }

        let Some(used_full_quantum) = decision else { return };

        let t = self.current_time;
        let from = self.pool.get(pid).state;
        {
            let pcb = self.pool.get_mut(pid);
            pcb.transition_to(ProcessState::Ready);
            pcb.last_ready_time = Some(t);
        }
        self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Ready });

        match &mut self.ready {
            ReadyStructure::Flat(q) => q.enqueue(pid),
            ReadyStructure::Mlfq(m) => {
                let level = level.expect("MLFQ running state always carries a level");
                let new_level = if used_full_quantum { Mlfq::demote(level) } else { level };
                self.pool.get_mut(pid).queue_level = new_level;
                m.enqueue(new_level, pid);
            }
        }

        self.running = None;
        self.time_in_slice = 0;
        self.set_context_switch_if_needed();
    }

    /// Step 5: aging. Priority disciplines decay `priority`; MLFQ promotes
    /// long-waiting entries toward level 0. Applied exactly once per tick
    /// (see DESIGN.md on why this differs textually from the per-selection
    /// phrasing in spec prose without changing any observable schedule).
    fn apply_aging(&mut self) {
        let t = self.current_time;
        match self.discipline {
            Discipline::PriorityNp | Discipline::PriorityP => {
                if let ReadyStructure::Flat(q) = &mut self.ready {
                    q.apply_aging(&mut self.pool, t, self.config.aging_interval, self.config.aging_boost);
                }
            }
            Discipline::Mlfq => {
                if let ReadyStructure::Mlfq(m) = &mut self.ready {
                    m.apply_aging_promotion(&mut self.pool, t, self.config.aging_interval);
                }
            }
            _ => {}
        }
    }

    /// Step 6: pick a new process if the CPU is free.
    fn select_if_idle(&mut self) {
        if self.running.is_some() {
            return;
        }
        let t = self.current_time;
        let selected = match &mut self.ready {
            ReadyStructure::Flat(q) => {
                let policy = self.policy.as_ref().expect("non-MLFQ discipline always has a policy");
                policy.select(q, &self.pool, t).map(|pid| {
                    let quantum = policy.is_quantum_based().then_some(self.config.time_quantum);
                    (pid, None, quantum)
                })
            }
            ReadyStructure::Mlfq(m) => m.dequeue_next().map(|(level, pid, quantum)| (pid, Some(level), quantum)),
        };
        let Some((pid, level, quantum)) = selected else { return };
        self.dispatch(pid, level, quantum, t);
    }

    fn dispatch(&mut self, pid: u32, level: Option<usize>, quantum: Option<u64>, t: u64) {
        let from = self.pool.get(pid).state;
        {
            let pcb = self.pool.get_mut(pid);
            pcb.transition_to(ProcessState::Running);
            if pcb.first_run_tick.is_none() {
                pcb.first_run_tick = Some(t);
            }
            if let Some(level) = level {
                pcb.queue_level = level;
            }
        }
        self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Running });
        tracing::debug!(target: "schedsim::engine", tick = t, pid, "dispatched");

        self.running = Some(RunningState { pid, level, quantum });
        self.time_in_slice = 0;
    }

    /// Steps 7-8: execute one tick of the running process (or record idle),
    /// then handle burst/process completion.
    fn execute_or_idle(&mut self) {
        let t = self.current_time;
        let Some(running) = &self.running else {
            self.raw_timeline.push(RawTick { tick: t, kind: TickKind::Idle });
            return;
        };
        let pid = running.pid;
        let level = running.level;

        self.raw_timeline.push(RawTick { tick: t, kind: TickKind::Process { pid, level } });
        self.cpu_busy_ticks += 1;

        let burst_finished = self.pool.get_mut(pid).execute_tick();
        self.time_in_slice += 1;

        if burst_finished {
            self.handle_burst_completion(pid);
        }
    }

    fn handle_burst_completion(&mut self, pid: u32) {
        let has_more = self.pool.get_mut(pid).advance_burst();
        if !has_more {
            self.terminate(pid, ProcessState::Running);
            self.running = None;
            self.time_in_slice = 0;
            return;
        }

        let next_kind = self.pool.get(pid).current_burst().map(|b| b.kind);
        debug_assert_eq!(
            next_kind,
            Some(BurstKind::Io),
            "burst sequences alternate CPU/IO; a CPU burst can only be followed by IO or end-of-process"
        );
        let duration = self.pool.get(pid).current_burst().unwrap().duration;

        let t = self.current_time + 1;
        let from = self.pool.get(pid).state;
        {
            let pcb = self.pool.get_mut(pid);
            pcb.transition_to(ProcessState::Waiting);
        }
        self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Waiting });
        self.io_queue.enqueue(pid, duration);

        self.running = None;
        self.time_in_slice = 0;
        self.set_context_switch_if_needed();
    }

    /// Shared termination handling for both the burst-completion path
    /// (step 8, `from = Running`) and the rare I/O-completion-with-no-more-
    /// bursts path (step 2, `from = Waiting`). Both record
    /// `completionTime` and the transition at `currentTime + 1`.
    fn terminate(&mut self, pid: u32, from: ProcessState) {
        let t = self.current_time + 1;
        {
            let pcb = self.pool.get_mut(pid);
            pcb.completion_time = Some(t);
            pcb.transition_to(ProcessState::Terminated);
        }
        self.transitions.push(Transition { time: t, pid, from, to: ProcessState::Terminated });
        tracing::debug!(target: "schedsim::engine", tick = t, pid, "terminated");
        self.set_context_switch_if_needed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::Burst;

    fn pcb(pid: u32, arrival: u64, cpu: u64, priority: u32) -> Pcb {
        Pcb::new(pid, arrival, priority, vec![Burst { kind: BurstKind::Cpu, duration: cpu }])
    }

    #[test]
    fn context_switch_debit_blocks_dispatch_until_it_drains() {
        let mut config = SimConfig::default();
        config.context_switch_time = 2;
        let pcbs = vec![pcb(1, 0, 1, 0), pcb(2, 0, 1, 0)];
        let output = Engine::new(pcbs, Discipline::Fcfs, config).run().unwrap();

        let kinds: Vec<TickKind> = output.raw_timeline.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TickKind::Process { pid: 1, level: None });
        assert_eq!(kinds[1], TickKind::ContextSwitch);
        assert_eq!(kinds[2], TickKind::ContextSwitch);
        assert_eq!(kinds[3], TickKind::Process { pid: 2, level: None });
    }

    /// Step 4 (preemption) consults priorities as they stood before the
    /// current tick's step 5 (aging) runs — so an aging boost applied at
    /// tick `t` only changes the preemption decision starting at tick
    /// `t + 1` (DESIGN.md, Open Question 4).
    #[test]
    fn preemption_check_precedes_this_ticks_aging_application() {
        let mut config = SimConfig::default();
        config.context_switch_time = 0;
        config.aging_interval = 2;
        config.aging_boost = 100;
        let pcbs = vec![pcb(1, 0, 10, 1), pcb(2, 0, 1, 10)];
        let output = Engine::new(pcbs, Discipline::PriorityP, config).run().unwrap();

        let preemption = output
            .transitions
            .iter()
            .find(|t| t.pid == 1 && t.from == ProcessState::Running && t.to == ProcessState::Ready)
            .expect("pid 1 is eventually preempted once pid 2 ages past it");
        assert_eq!(preemption.time, 3, "aging applied at tick 2 must not be visible to tick 2's own preemption check");
    }
}
