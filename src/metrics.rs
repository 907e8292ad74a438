//! Post-processing (spec §4.7): consolidating the raw timeline and reducing
//! final PCB snapshots down to the wire `Result` shape (spec §6).

use serde::{Deserialize, Serialize};

use crate::engine::EngineOutput;
use crate::pcb::Pcb;
use crate::policy::Discipline;
use crate::timeline::{self, TickKind, TimelineBlock, Transition};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetrics {
    pub pid: u32,
    pub arrival_time: u64,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
    pub response_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub cpu_utilization: f64,
    pub throughput: f64,
    pub total_time: u64,
    pub context_switches: u64,
    pub idle_time: u64,
    pub max_waiting: u64,
    pub max_response: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimResult {
    pub discipline: Discipline,
    pub timeline: Vec<TimelineBlock>,
    pub transitions: Vec<Transition>,
    pub processes: Vec<ProcessMetrics>,
    pub metrics: AggregateMetrics,
}

/// Reduces one engine run to its final `Result`. Every PCB in `output.pool`
/// is expected to be TERMINATED — the orchestrator only calls this after a
/// successful `Engine::run`.
pub fn summarize(discipline: Discipline, output: EngineOutput) -> SimResult {
    let blocks = timeline::consolidate(&output.raw_timeline);
    let context_switches = blocks.iter().filter(|b| b.kind == TickKind::ContextSwitch).count() as u64;
    let idle_time = blocks.iter().filter(|b| b.kind == TickKind::Idle).map(|b| b.duration).sum();

    let snapshots = output.pool.into_snapshots();
    let processes: Vec<ProcessMetrics> = snapshots.iter().map(process_metrics).collect();

    let n = processes.len().max(1) as f64;
    let avg_turnaround = processes.iter().map(|p| p.turnaround_time as f64).sum::<f64>() / n;
    let avg_waiting = processes.iter().map(|p| p.waiting_time as f64).sum::<f64>() / n;
    let avg_response = processes.iter().map(|p| p.response_time as f64).sum::<f64>() / n;
    let max_waiting = processes.iter().map(|p| p.waiting_time).max().unwrap_or(0);
    let max_response = processes.iter().map(|p| p.response_time).max().unwrap_or(0);

    let total_time = output.total_time;
    let cpu_utilization = if total_time == 0 { 0.0 } else { output.cpu_busy_ticks as f64 / total_time as f64 * 100.0 };
    let throughput = if total_time == 0 { 0.0 } else { processes.len() as f64 / total_time as f64 };

    SimResult {
        discipline,
        timeline: blocks,
        transitions: output.transitions,
        processes,
        metrics: AggregateMetrics {
            avg_turnaround,
            avg_waiting,
            avg_response,
            cpu_utilization,
            throughput,
            total_time,
            context_switches,
            idle_time,
            max_waiting,
            max_response,
        },
    }
}

fn process_metrics(p: &Pcb) -> ProcessMetrics {
    ProcessMetrics {
        pid: p.pid,
        arrival_time: p.arrival_time,
        completion_time: p.completion_time.expect("summarize is only called after every process terminates"),
        turnaround_time: p.turnaround_time().expect("terminated process has a turnaround time"),
        waiting_time: p.waiting_time().expect("terminated process has a waiting time"),
        response_time: p.response_time().expect("every process is dispatched at least once"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::{Burst, BurstKind};
    use crate::pool::ProcessPool;
    use crate::timeline::RawTick;

    fn terminated(pid: u32, arrival: u64, cpu: u64, first_run: u64, completion: u64) -> Pcb {
        let mut p = Pcb::new(pid, arrival, 0, vec![Burst { kind: BurstKind::Cpu, duration: cpu }]);
        p.state = crate::pcb::ProcessState::Terminated;
        p.first_run_tick = Some(first_run);
        p.completion_time = Some(completion);
        p
    }

    #[test]
    fn aggregate_metrics_average_over_all_processes() {
        let pool = ProcessPool::new(vec![terminated(1, 0, 2, 0, 2), terminated(2, 0, 2, 2, 6)]);
        let raw = vec![
            RawTick { tick: 0, kind: TickKind::Process { pid: 1, level: None } },
            RawTick { tick: 1, kind: TickKind::Process { pid: 1, level: None } },
            RawTick { tick: 2, kind: TickKind::ContextSwitch },
            RawTick { tick: 3, kind: TickKind::Process { pid: 2, level: None } },
            RawTick { tick: 4, kind: TickKind::Process { pid: 2, level: None } },
        ];
        let output = EngineOutput {
            raw_timeline: raw,
            transitions: vec![],
            pool,
            total_time: 5,
            cpu_busy_ticks: 4,
        };
        let result = summarize(Discipline::Fcfs, output);
        assert_eq!(result.metrics.context_switches, 1);
        assert_eq!(result.metrics.idle_time, 0);
        assert_eq!(result.metrics.avg_turnaround, 4.0);
        assert_eq!(result.metrics.max_waiting, result.processes.iter().map(|p| p.waiting_time).max().unwrap());
    }
}
