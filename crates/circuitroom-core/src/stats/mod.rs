//! Statistics over completed sessions: per-person streaks and points, plus
//! history totals.

mod streaks;
mod summary;

pub use streaks::{PersonStats, StreakScorer};
pub use summary::{recent_sessions, HistorySummary};
