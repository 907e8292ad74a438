use schedsim::{Discipline, IoBurstInput, ProcessInput, SimConfig};

fn demo_workload() -> Vec<ProcessInput> {
    vec![
        ProcessInput { pid: 1, arrival_time: 0, cpu_burst: 8, priority: 2, io_enabled: false, io_bursts: vec![] },
        ProcessInput { pid: 2, arrival_time: 1, cpu_burst: 4, priority: 1, io_enabled: false, io_bursts: vec![] },
        ProcessInput {
            pid: 3,
            arrival_time: 2,
            cpu_burst: 9,
            priority: 3,
            io_enabled: true,
            io_bursts: vec![IoBurstInput { after_cpu: 3, duration: 5 }],
        },
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let workload = demo_workload();
    let config = SimConfig::default();

    println!("schedsim demo: {} processes, context switch cost {}", workload.len(), config.context_switch_time);
    println!("{}", "=".repeat(60));

    let disciplines = [Discipline::Fcfs, Discipline::Sjf, Discipline::Srtf, Discipline::RoundRobin, Discipline::Mlfq];
    for discipline in disciplines {
        match schedsim::orchestrator::run_once(&workload, discipline, config.clone()) {
            Ok(result) => {
                println!(
                    "{:<12} total={:<5} avgWaiting={:<6.2} avgTurnaround={:<6.2} cpuUtil={:.1}% contextSwitches={}",
                    discipline.name(),
                    result.metrics.total_time,
                    result.metrics.avg_waiting,
                    result.metrics.avg_turnaround,
                    result.metrics.cpu_utilization,
                    result.metrics.context_switches,
                );
            }
            Err(e) => println!("{:<12} failed: {e}", discipline.name()),
        }
    }
}
