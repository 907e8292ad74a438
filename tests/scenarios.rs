//! End-to-end scenarios and universal invariants (spec §8).

use schedsim::orchestrator::run_once;
use schedsim::scenarios::{self, Scenario};
use schedsim::timeline::TickKind;
use schedsim::SimResult;

fn run(scenario: &Scenario) -> SimResult {
    run_once(&scenario.processes, scenario.discipline, scenario.config.clone()).expect("scenario runs to completion")
}

fn process_blocks(result: &SimResult) -> Vec<(u32, Option<usize>, u64, u64)> {
    result
        .timeline
        .iter()
        .filter_map(|b| match b.kind {
            TickKind::Process { pid, level } => Some((pid, level, b.start_time, b.end_time)),
            _ => None,
        })
        .collect()
}

#[test]
fn s1_fcfs_matches_documented_schedule() {
    let result = run(&scenarios::s1_fcfs());
    assert_eq!(
        process_blocks(&result),
        vec![(1, None, 0, 5), (2, None, 5, 8), (3, None, 8, 9)]
    );
    assert!((result.metrics.avg_turnaround - 19.0 / 3.0).abs() < 1e-9);
    assert!((result.metrics.avg_waiting - 10.0 / 3.0).abs() < 1e-9);
}

#[test]
fn s2_sjf_matches_documented_schedule() {
    let result = run(&scenarios::s2_sjf());
    assert_eq!(
        process_blocks(&result),
        vec![(4, None, 0, 3), (1, None, 3, 9), (3, None, 9, 16), (2, None, 16, 24)]
    );
    assert!((result.metrics.avg_waiting - 7.0).abs() < 1e-9);
}

#[test]
fn s3_srtf_matches_documented_schedule_and_zero_response() {
    let result = run(&scenarios::s3_srtf());
    assert_eq!(
        process_blocks(&result),
        vec![
            (1, None, 0, 1),
            (2, None, 1, 2),
            (3, None, 2, 3),
            (4, None, 3, 4),
            (3, None, 4, 5),
            (2, None, 5, 8),
            (1, None, 8, 15),
        ]
    );
    for p in &result.processes {
        assert_eq!(p.response_time, 0, "pid {} should respond instantly", p.pid);
    }
}

#[test]
fn s4_round_robin_matches_documented_schedule() {
    let result = run(&scenarios::s4_round_robin());
    assert_eq!(
        process_blocks(&result),
        vec![
            (1, None, 0, 4),
            (2, None, 4, 8),
            (3, None, 8, 12),
            (1, None, 12, 16),
            (3, None, 16, 19),
            (1, None, 19, 21),
        ]
    );
}

#[test]
fn s5a_priority_no_aging_runs_higher_priority_first() {
    let result = run(&scenarios::s5a_priority_no_aging());
    let blocks = process_blocks(&result);
    assert_eq!(blocks[0].0, 1, "pid 1 has the numerically lower (higher-precedence) priority");
}

#[test]
fn s5b_priority_with_aging_does_not_starve_the_low_priority_process() {
    let result = run(&scenarios::s5b_priority_with_aging());
    let p5 = result.processes.iter().find(|p| p.pid == 5).unwrap();
    assert!(p5.response_time <= 15, "P5 must not wait indefinitely once aging is enabled");
}

#[test]
fn s6_mlfq_demotes_across_levels_as_documented() {
    let result = run(&scenarios::s6_mlfq());
    let blocks = process_blocks(&result);
    assert_eq!(blocks[0], (1, Some(0), 0, 4));
    assert_eq!(blocks[1], (2, Some(0), 4, 7));
    assert_eq!(blocks[2], (1, Some(1), 7, 15));
    assert_eq!(blocks[3], (1, Some(2), 15, 23));
}

/// Invariants 1-7 (spec §8), checked generically over every scenario.
#[test]
fn universal_invariants_hold_across_every_scenario() {
    for scenario in scenarios::all() {
        let result = run(&scenario);
        let total_cpu: u64 = scenario.processes.iter().map(|p| p.cpu_burst).sum();
        let cpu_busy: u64 = result
            .timeline
            .iter()
            .filter(|b| matches!(b.kind, TickKind::Process { .. }))
            .map(|b| b.duration)
            .sum();
        assert_eq!(total_cpu, cpu_busy, "{}: invariant 2 (total CPU time == cpuBusyTicks)", scenario.name);

        let idle = result.metrics.idle_time;
        let context_switches = result
            .timeline
            .iter()
            .filter(|b| matches!(b.kind, TickKind::ContextSwitch))
            .map(|b| b.duration)
            .sum::<u64>();
        assert_eq!(
            cpu_busy + idle + context_switches,
            result.metrics.total_time,
            "{}: invariant 3 (busy + idle + context switches == total time)",
            scenario.name
        );

        for p in &result.processes {
            assert!(p.turnaround_time >= p.waiting_time, "{}: invariant 4 (turnaround >= waiting)", scenario.name);
            assert!(p.response_time <= p.waiting_time, "{}: invariant 4 (response <= waiting)", scenario.name);
        }
    }
}

/// Invariant 7: the workload itself is never mutated by a run.
#[test]
fn workload_input_is_unchanged_after_a_run() {
    let scenario = scenarios::s1_fcfs();
    let before = scenario.processes.clone();
    let _ = run_once(&scenario.processes, scenario.discipline, scenario.config.clone()).unwrap();
    let pids_before: Vec<u32> = before.iter().map(|p| p.pid).collect();
    let pids_after: Vec<u32> = scenario.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids_before, pids_after);
}

/// Invariant 6: determinism. Two runs of the same workload under the same
/// discipline must produce byte-identical transitions and metrics.
#[test]
fn identical_inputs_produce_identical_results() {
    let scenario = scenarios::s3_srtf();
    let a = run(&scenario);
    let b = run(&scenario);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

/// Invariant 10: no Round Robin process executes more than `q` consecutive
/// CPU ticks without terminating, blocking, or being preempted.
#[test]
fn round_robin_never_exceeds_its_quantum() {
    let result = run(&scenarios::s4_round_robin());
    for (_, _, start, end) in process_blocks(&result) {
        assert!(end - start <= 4);
    }
}

#[test]
fn fcfs_on_simultaneous_arrivals_runs_in_pid_order() {
    let mut scenario = scenarios::s2_sjf();
    scenario.discipline = schedsim::Discipline::Fcfs;
    let result = run(&scenario);
    let pids: Vec<u32> = process_blocks(&result).into_iter().map(|(pid, ..)| pid).collect();
    assert_eq!(pids, vec![1, 2, 3, 4]);
}
