//! Orchestration (spec §9 `runOnce`/`compareMany`): validates a workload
//! once up front, then runs it against one or more disciplines. Each run
//! gets its own fresh PCBs — disciplines must never observe each other's
//! mutated state.

use std::collections::HashMap;

use crate::config::SimConfig;
use crate::engine::Engine;
use crate::error::SimError;
use crate::metrics::{self, SimResult};
use crate::pcb::Pcb;
use crate::policy::Discipline;
use crate::workload::{self, ProcessInput};

fn build_pcbs(processes: &[ProcessInput], config: &SimConfig) -> Result<Vec<Pcb>, SimError> {
    config.validate().map_err(|messages| SimError::InvalidWorkload { messages })?;
    workload::validate_and_build(processes).map_err(|messages| SimError::InvalidWorkload { messages })
}

/// Runs one workload under one discipline and reduces the result.
pub fn run_once(processes: &[ProcessInput], discipline: Discipline, config: SimConfig) -> Result<SimResult, SimError> {
    let pcbs = build_pcbs(processes, &config)?;
    let output = Engine::new(pcbs, discipline, config).run()?;
    Ok(metrics::summarize(discipline, output))
}

/// Runs the same workload independently under each of `disciplines`,
/// validating the workload exactly once before cloning it per run.
pub fn compare_many(
    processes: &[ProcessInput],
    disciplines: &[Discipline],
    config: SimConfig,
) -> Result<HashMap<Discipline, SimResult>, SimError> {
    let pcbs = build_pcbs(processes, &config)?;

    let mut results = HashMap::with_capacity(disciplines.len());
    for &discipline in disciplines {
        let output = Engine::new(pcbs.clone(), discipline, config.clone()).run()?;
        results.insert(discipline, metrics::summarize(discipline, output));
    }
    Ok(results)
}
