use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Totals over completed sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub session_count: usize,
    pub total_exercises: usize,
    pub total_duration_sec: u64,
    pub total_meters: f64,
    #[serde(rename = "totalWorkKJ")]
    pub total_work_kj: f64,
}

impl HistorySummary {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        sessions
            .iter()
            .filter(|s| s.completed)
            .fold(Self::default(), |mut acc, s| {
                acc.session_count += 1;
                acc.total_exercises += s.exercises.len();
                acc.total_duration_sec += s.total_duration_sec;
                acc.total_meters += s.total_meters;
                acc.total_work_kj += s.total_work_kj;
                acc
            })
    }
}

/// Completed sessions, newest first, at most `limit`.
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<&Session> {
    let mut completed: Vec<&Session> = sessions.iter().filter(|s| s.completed).collect();
    completed.sort_by(|a, b| b.date.cmp(&a.date));
    completed.truncate(limit);
    completed
}
