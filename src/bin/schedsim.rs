//! `schedsim` CLI: run one discipline, compare several, or replay the
//! bundled demo scenarios (spec §4.12). A thin text/JSON renderer around
//! already-computed `Result`s — it never touches scheduling logic itself.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use schedsim::{Discipline, ProcessInput, SimConfig, SimError};

#[derive(Parser)]
#[command(name = "schedsim")]
#[command(about = "Deterministic CPU scheduling simulation core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one discipline against a workload.
    Run {
        #[arg(long)]
        discipline: String,
        #[arg(long)]
        workload: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Run several disciplines against the same workload.
    Compare {
        /// Comma-separated discipline names.
        #[arg(long)]
        disciplines: String,
        #[arg(long)]
        workload: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Replay the bundled S1-S6 scenarios and report pass/fail.
    Demo,
}

fn load_workload(path: &PathBuf) -> Result<Vec<ProcessInput>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
}

fn load_config(path: &Option<PathBuf>) -> Result<SimConfig, String> {
    match path {
        Some(p) => SimConfig::from_toml_file(p),
        None => Ok(SimConfig::default()),
    }
}

fn parse_disciplines(csv: &str) -> Result<Vec<Discipline>, SimError> {
    csv.split(',')
        .map(str::trim)
        .map(|name| Discipline::parse(name).ok_or_else(|| SimError::UnknownDiscipline(name.to_string())))
        .collect()
}

fn print_text_result(discipline: Discipline, result: &schedsim::SimResult) {
    println!("--- {} ---", discipline.name());
    for block in &result.timeline {
        println!("  {:?} [{}, {})", block.kind, block.start_time, block.end_time);
    }
    println!(
        "avgTurnaround={:.2} avgWaiting={:.2} avgResponse={:.2} cpuUtil={:.1}% throughput={:.3} contextSwitches={} idleTime={}",
        result.metrics.avg_turnaround,
        result.metrics.avg_waiting,
        result.metrics.avg_response,
        result.metrics.cpu_utilization,
        result.metrics.throughput,
        result.metrics.context_switches,
        result.metrics.idle_time,
    );
}

fn run(discipline: &str, workload: &PathBuf, config: &Option<PathBuf>, format: &str) -> Result<(), String> {
    let discipline = Discipline::parse(discipline).ok_or_else(|| format!("unknown discipline: {discipline}"))?;
    let processes = load_workload(workload)?;
    let config = load_config(config)?;

    let result = schedsim::orchestrator::run_once(&processes, discipline, config).map_err(|e| e.to_string())?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?),
        _ => print_text_result(discipline, &result),
    }
    Ok(())
}

fn compare(disciplines: &str, workload: &PathBuf, config: &Option<PathBuf>) -> Result<(), String> {
    let disciplines = parse_disciplines(disciplines).map_err(|e| e.to_string())?;
    let processes = load_workload(workload)?;
    let config = load_config(config)?;

    let results = schedsim::orchestrator::compare_many(&processes, &disciplines, config).map_err(|e| e.to_string())?;
    for discipline in disciplines {
        if let Some(result) = results.get(&discipline) {
            print_text_result(discipline, result);
        }
    }
    Ok(())
}

fn demo() {
    let mut failures = 0;
    for scenario in schedsim::scenarios::all() {
        match schedsim::orchestrator::run_once(&scenario.processes, scenario.discipline, scenario.config.clone()) {
            Ok(result) => {
                println!(
                    "PASS {:<24} total={:<5} avgWaiting={:.2}",
                    scenario.name, result.metrics.total_time, result.metrics.avg_waiting
                );
            }
            Err(e) => {
                failures += 1;
                println!("FAIL {:<24} {e}", scenario.name);
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Run { discipline, workload, config, format } => run(discipline, workload, config, format),
        Commands::Compare { disciplines, workload, config } => compare(disciplines, workload, config),
        Commands::Demo => {
            demo();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
