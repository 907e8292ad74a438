//! Timeline and transition record types (spec §6, §4.7).

use serde::{Deserialize, Serialize};

use crate::pcb::ProcessState;

/// What the CPU was doing during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TickKind {
    Process { pid: u32, level: Option<usize> },
    Idle,
    ContextSwitch,
}

/// One raw, per-tick entry in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTick {
    pub tick: u64,
    pub kind: TickKind,
}

/// A run of adjacent raw ticks sharing `(type, pid, level)`, produced by
/// consolidation (spec §4.7). CONTEXT_SWITCH and IDLE blocks never merge
/// across a change of kind even if adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBlock {
    pub kind: TickKind,
    pub start_time: u64,
    pub end_time: u64,
    pub duration: u64,
}

/// One state-machine edge, in the order it was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub time: u64,
    pub pid: u32,
    pub from: ProcessState,
    pub to: ProcessState,
}

/// Walks the raw timeline and coalesces adjacent entries that share
/// `(type, pid, level)` into blocks.
pub fn consolidate(raw: &[RawTick]) -> Vec<TimelineBlock> {
    let mut blocks: Vec<TimelineBlock> = Vec::new();
    for entry in raw {
        match blocks.last_mut() {
            Some(last) if last.kind == entry.kind && last.end_time == entry.tick => {
                last.end_time += 1;
                last.duration += 1;
            }
            _ => blocks.push(TimelineBlock {
                kind: entry.kind,
                start_time: entry.tick,
                end_time: entry.tick + 1,
                duration: 1,
            }),
        }
    }
    blocks
}
