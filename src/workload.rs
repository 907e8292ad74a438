//! Workload input (spec §6): the wire shape callers construct, and its
//! expansion into the alternating CPU/IO burst sequence the engine runs on.

use serde::{Deserialize, Serialize};

use crate::pcb::{Burst, BurstKind, Pcb};

/// One I/O burst, positioned by how much CPU time precedes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoBurstInput {
    /// CPU time consumed before this I/O burst begins. `0 <= after_cpu <= cpu_burst`.
    pub after_cpu: u64,
    pub duration: u64,
}

/// A process as supplied by a caller, before burst-sequence expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInput {
    pub pid: u32,
    pub arrival_time: u64,
    /// Total CPU time across the whole process.
    pub cpu_burst: u64,
    pub priority: u32,
    pub io_enabled: bool,
    #[serde(default)]
    pub io_bursts: Vec<IoBurstInput>,
}

impl ProcessInput {
    /// Expand into an alternating burst sequence: walk `io_bursts` in
    /// ascending `after_cpu` order, splitting CPU time at each point and
    /// inserting the I/O burst between the two resulting CPU segments. Any
    /// residual CPU time becomes a trailing CPU burst. The caller must have
    /// already validated `after_cpu`/`duration` constraints.
    fn expand_bursts(&self) -> Vec<Burst> {
        if !self.io_enabled || self.io_bursts.is_empty() {
            return vec![Burst { kind: BurstKind::Cpu, duration: self.cpu_burst }];
        }

        let mut sorted = self.io_bursts.clone();
        sorted.sort_by_key(|b| b.after_cpu);

        let mut bursts = Vec::with_capacity(sorted.len() * 2 + 1);
        let mut cursor = 0u64;
        for io in &sorted {
            let cpu_segment = io.after_cpu - cursor;
            if cpu_segment > 0 {
                bursts.push(Burst { kind: BurstKind::Cpu, duration: cpu_segment });
            }
            bursts.push(Burst { kind: BurstKind::Io, duration: io.duration });
            cursor = io.after_cpu;
        }
        let residual = self.cpu_burst - cursor;
        if residual > 0 {
            bursts.push(Burst { kind: BurstKind::Cpu, duration: residual });
        }
        bursts
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.cpu_burst == 0 {
            errors.push(format!("pid {}: cpuBurst must be >= 1", self.pid));
        }
        if self.io_enabled {
            let mut seen_after_cpu = std::collections::HashSet::new();
            for io in &self.io_bursts {
                if io.after_cpu > self.cpu_burst {
                    errors.push(format!(
                        "pid {}: ioBurst.afterCpu {} exceeds cpuBurst {}",
                        self.pid, io.after_cpu, self.cpu_burst
                    ));
                }
                if io.duration == 0 {
                    errors.push(format!("pid {}: ioBurst.duration must be >= 1", self.pid));
                }
                if !seen_after_cpu.insert(io.after_cpu) {
                    errors.push(format!(
                        "pid {}: duplicate ioBurst.afterCpu value {}",
                        self.pid, io.after_cpu
                    ));
                }
            }
        }
        errors
    }
}

/// Validates an entire workload and, on success, expands it into PCBs in
/// stable arrival/pid order (spec §4.5's arrival-admission order is this
/// same order). Returns every violation found, not just the first.
pub fn validate_and_build(processes: &[ProcessInput]) -> Result<Vec<Pcb>, Vec<String>> {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push("workload must contain at least one process".to_string());
    }

    let mut seen_pids = std::collections::HashSet::new();
    for p in processes {
        if p.pid == 0 {
            errors.push(format!("pid {} must be >= 1", p.pid));
        }
        if !seen_pids.insert(p.pid) {
            errors.push(format!("duplicate pid {}", p.pid));
        }
        errors.extend(p.validate());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut pcbs: Vec<Pcb> = processes
        .iter()
        .map(|p| Pcb::new(p.pid, p.arrival_time, p.priority, p.expand_bursts()))
        .collect();
    pcbs.sort_by(|a, b| a.arrival_time.cmp(&b.arrival_time).then(a.pid.cmp(&b.pid)));
    Ok(pcbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(pid: u32, arrival: u64, cpu: u64) -> ProcessInput {
        ProcessInput { pid, arrival_time: arrival, cpu_burst: cpu, priority: 0, io_enabled: false, io_bursts: vec![] }
    }

    #[test]
    fn process_without_io_is_a_single_cpu_burst() {
        let p = simple(1, 0, 5);
        let bursts = p.expand_bursts();
        assert_eq!(bursts, vec![Burst { kind: BurstKind::Cpu, duration: 5 }]);
    }

    #[test]
    fn io_burst_splits_cpu_time_around_it() {
        let mut p = simple(1, 0, 10);
        p.io_enabled = true;
        p.io_bursts = vec![IoBurstInput { after_cpu: 4, duration: 3 }];
        let bursts = p.expand_bursts();
        assert_eq!(
            bursts,
            vec![
                Burst { kind: BurstKind::Cpu, duration: 4 },
                Burst { kind: BurstKind::Io, duration: 3 },
                Burst { kind: BurstKind::Cpu, duration: 6 },
            ]
        );
    }

    #[test]
    fn io_burst_at_full_cpu_time_has_no_trailing_segment() {
        let mut p = simple(1, 0, 5);
        p.io_enabled = true;
        p.io_bursts = vec![IoBurstInput { after_cpu: 5, duration: 2 }];
        let bursts = p.expand_bursts();
        assert_eq!(bursts.last().unwrap().kind, BurstKind::Io);
    }

    #[test]
    fn multiple_io_bursts_are_ordered_by_after_cpu_regardless_of_input_order() {
        let mut p = simple(1, 0, 10);
        p.io_enabled = true;
        p.io_bursts = vec![
            IoBurstInput { after_cpu: 8, duration: 1 },
            IoBurstInput { after_cpu: 3, duration: 2 },
        ];
        let bursts = p.expand_bursts();
        let cpu_durations: Vec<u64> = bursts.iter().filter(|b| b.kind == BurstKind::Cpu).map(|b| b.duration).collect();
        assert_eq!(cpu_durations, vec![3, 5, 2]);
    }

    #[test]
    fn duplicate_after_cpu_is_rejected() {
        let mut p = simple(1, 0, 10);
        p.io_enabled = true;
        p.io_bursts = vec![
            IoBurstInput { after_cpu: 3, duration: 1 },
            IoBurstInput { after_cpu: 3, duration: 2 },
        ];
        assert!(!p.validate().is_empty());
    }

    #[test]
    fn after_cpu_beyond_cpu_burst_is_rejected() {
        let mut p = simple(1, 0, 5);
        p.io_enabled = true;
        p.io_bursts = vec![IoBurstInput { after_cpu: 6, duration: 1 }];
        assert!(!p.validate().is_empty());
    }

    #[test]
    fn empty_workload_is_rejected() {
        assert!(validate_and_build(&[]).is_err());
    }

    #[test]
    fn duplicate_pids_are_rejected() {
        let processes = vec![simple(1, 0, 1), simple(1, 1, 1)];
        assert!(validate_and_build(&processes).is_err());
    }

    #[test]
    fn valid_workload_builds_pcbs_sorted_by_arrival_then_pid() {
        let processes = vec![simple(3, 1, 1), simple(1, 1, 1), simple(2, 0, 1)];
        let pcbs = validate_and_build(&processes).unwrap();
        let pids: Vec<u32> = pcbs.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 1, 3]);
    }
}
