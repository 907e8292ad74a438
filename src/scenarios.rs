//! The bundled end-to-end scenarios (spec §8, S1-S6). Shared between the
//! `demo` CLI subcommand and the `tests/scenarios.rs` integration suite so
//! the workload literals live in exactly one place.

use crate::config::SimConfig;
use crate::policy::Discipline;
use crate::workload::ProcessInput;

pub struct Scenario {
    pub name: &'static str,
    pub discipline: Discipline,
    pub config: SimConfig,
    pub processes: Vec<ProcessInput>,
}

fn no_io(pid: u32, arrival_time: u64, cpu_burst: u64, priority: u32) -> ProcessInput {
    ProcessInput { pid, arrival_time, cpu_burst, priority, io_enabled: false, io_bursts: vec![] }
}

fn zero_context_switch() -> SimConfig {
    SimConfig { context_switch_time: 0, ..SimConfig::default() }
}

/// S1 - FCFS basics.
pub fn s1_fcfs() -> Scenario {
    Scenario {
        name: "S1-fcfs",
        discipline: Discipline::Fcfs,
        config: zero_context_switch(),
        processes: vec![no_io(1, 0, 5, 0), no_io(2, 1, 3, 0), no_io(3, 2, 1, 0)],
    }
}

/// S2 - SJF non-preemptive.
pub fn s2_sjf() -> Scenario {
    Scenario {
        name: "S2-sjf",
        discipline: Discipline::Sjf,
        config: zero_context_switch(),
        processes: vec![no_io(1, 0, 6, 0), no_io(2, 0, 8, 0), no_io(3, 0, 7, 0), no_io(4, 0, 3, 0)],
    }
}

/// S3 - SRTF preemption.
pub fn s3_srtf() -> Scenario {
    Scenario {
        name: "S3-srtf",
        discipline: Discipline::Srtf,
        config: zero_context_switch(),
        processes: vec![no_io(1, 0, 8, 0), no_io(2, 1, 4, 0), no_io(3, 2, 2, 0), no_io(4, 3, 1, 0)],
    }
}

/// S4 - Round Robin, quantum 4.
pub fn s4_round_robin() -> Scenario {
    let mut config = zero_context_switch();
    config.time_quantum = 4;
    Scenario {
        name: "S4-round-robin",
        discipline: Discipline::RoundRobin,
        config,
        processes: vec![no_io(1, 0, 10, 0), no_io(2, 0, 4, 0), no_io(3, 0, 7, 0)],
    }
}

/// S5a - priority starvation, aging disabled.
pub fn s5a_priority_no_aging() -> Scenario {
    let config = zero_context_switch();
    Scenario {
        name: "S5a-priority-no-aging",
        discipline: Discipline::PriorityNp,
        config,
        processes: vec![no_io(1, 0, 10, 3), no_io(5, 0, 3, 5)],
    }
}

/// S5b - priority starvation, aging enabled (interval 2): non-starvation
/// only, not an exact schedule.
pub fn s5b_priority_with_aging() -> Scenario {
    let mut config = zero_context_switch();
    config.aging_interval = 2;
    Scenario {
        name: "S5b-priority-with-aging",
        discipline: Discipline::PriorityNp,
        config,
        processes: vec![no_io(1, 0, 10, 3), no_io(5, 0, 3, 5)],
    }
}

/// S6 - MLFQ demotion, q0=4, q1=8.
pub fn s6_mlfq() -> Scenario {
    let mut config = zero_context_switch();
    config.q1_time_quantum = 4;
    config.q2_time_quantum = 8;
    Scenario {
        name: "S6-mlfq",
        discipline: Discipline::Mlfq,
        config,
        processes: vec![no_io(1, 0, 20, 0), no_io(2, 0, 3, 0)],
    }
}

pub fn all() -> Vec<Scenario> {
    vec![
        s1_fcfs(),
        s2_sjf(),
        s3_srtf(),
        s4_round_robin(),
        s5a_priority_no_aging(),
        s5b_priority_with_aging(),
        s6_mlfq(),
    ]
}
