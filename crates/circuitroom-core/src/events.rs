use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::live::Phase;

/// Every state change of a live session produces an Event.
/// The driver renders them; `StateSnapshot` answers a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        secs: u32,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Entered an exercise or a rest. For a rest, `index` and
    /// `exercise_name` refer to the upcoming exercise.
    PhaseStarted {
        phase: Phase,
        index: usize,
        exercise_name: String,
        is_extreme: bool,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Emitted once per run, by the automatic finish or a manual one.
    SessionFinished {
        elapsed_secs: u64,
        completed_all: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        paused: bool,
        index: usize,
        exercise_name: String,
        is_extreme: bool,
        time_left_secs: u32,
        total_secs: u32,
        next_exercise: Option<String>,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::CountdownStarted { at, .. }
            | Event::CountdownTick { at, .. }
            | Event::PhaseStarted { at, .. }
            | Event::Paused { at, .. }
            | Event::Resumed { at, .. }
            | Event::SessionFinished { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
