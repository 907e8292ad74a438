//! Simulation configuration (spec §6).

use serde::{Deserialize, Serialize};

fn default_context_switch_time() -> u64 {
    1
}
fn default_aging_boost() -> u32 {
    1
}
fn default_time_quantum() -> u64 {
    4
}
fn default_mlfq_quanta() -> (u64, u64) {
    (4, 8)
}
fn default_max_ticks() -> u64 {
    10_000
}

/// Recognized configuration options and their effects (spec §6). Every
/// field has a default so a partial TOML file (or an empty one) loads
/// cleanly — mirrors the `#[serde(default)]`-on-every-field pattern used
/// for on-disk configuration elsewhere in this codebase's lineage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks of CONTEXT_SWITCH debited after every dispatch change.
    pub context_switch_time: u64,
    /// Round-Robin quantum.
    pub time_quantum: u64,
    /// 0 disables aging entirely (both priority aging and MLFQ
    /// aging-promotion).
    pub aging_interval: u64,
    /// Amount of priority decrease per aging interval elapsed.
    pub aging_boost: u32,
    /// MLFQ per-level quantum for level 0.
    pub q1_time_quantum: u64,
    /// MLFQ per-level quantum for level 1. Level 2 has no quantum.
    pub q2_time_quantum: u64,
    /// Hard iteration cap (spec §4.5); exceeding it is `IterationCapExceeded`.
    pub max_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let (q1, q2) = default_mlfq_quanta();
        SimConfig {
            context_switch_time: default_context_switch_time(),
            time_quantum: default_time_quantum(),
            aging_interval: 0,
            aging_boost: default_aging_boost(),
            q1_time_quantum: q1,
            q2_time_quantum: q2,
            max_ticks: default_max_ticks(),
        }
    }
}

impl SimConfig {
    /// Validates ranges the orchestrator relies on. Does not validate the
    /// workload — that's a separate, independent check (spec §7).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.time_quantum == 0 {
            errors.push("timeQuantum must be >= 1".to_string());
        }
        if self.aging_boost == 0 {
            errors.push("agingBoost must be >= 1".to_string());
        }
        if self.q1_time_quantum == 0 {
            errors.push("q1TimeQuantum must be >= 1".to_string());
        }
        if self.q2_time_quantum == 0 {
            errors.push("q2TimeQuantum must be >= 1".to_string());
        }
        if self.max_ticks == 0 {
            errors.push("max_ticks must be >= 1".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Load a config from a TOML file, falling back to defaults for any
    /// field the file omits. CLI-only convenience; the core never touches
    /// the filesystem.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
    }
}
