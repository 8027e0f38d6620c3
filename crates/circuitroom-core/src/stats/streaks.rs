//! Per-person streaks and points.
//!
//! A streak is a run of completed sessions where each gap to the previous one
//! is at most `max_gap_days`. Every session earns `points_per_session`; every
//! session that continues a streak adds `streak_bonus`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::Person;
use crate::session::Session;
use crate::storage::StreakRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStats {
    pub person_id: String,
    pub display_name: String,
    pub total_sessions: usize,
    /// Length of the latest streak, 0 once it has lapsed.
    pub current_streak: usize,
    pub longest_streak: usize,
    pub total_points: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_session_date: Option<DateTime<Utc>>,
}

/// Scores participation history against a set of [`StreakRules`].
#[derive(Debug, Clone, Default)]
pub struct StreakScorer {
    rules: StreakRules,
}

impl StreakScorer {
    pub fn new(rules: StreakRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &StreakRules {
        &self.rules
    }

    /// Stats for one person over the completed sessions they took part in.
    /// `now` decides whether the latest streak is still alive.
    pub fn person_stats(
        &self,
        person_id: &str,
        display_name: &str,
        sessions: &[Session],
        now: DateTime<Utc>,
    ) -> PersonStats {
        let mut dates: Vec<DateTime<Utc>> = sessions
            .iter()
            .filter(|s| s.completed && s.participants.iter().any(|p| p == person_id))
            .map(|s| s.date)
            .collect();
        dates.sort();

        // A gap too large for chrono never breaks a streak.
        let max_gap = Duration::try_days(self.rules.max_gap_days);
        let within_gap = |gap: Duration| max_gap.map_or(true, |max| gap <= max);
        let mut run = 0;
        let mut longest_streak = 0;
        let mut total_points = 0;
        let mut previous: Option<DateTime<Utc>> = None;

        for &date in &dates {
            total_points += self.rules.points_per_session;
            match previous {
                Some(prev) if within_gap(date - prev) => {
                    run += 1;
                    total_points += self.rules.streak_bonus;
                }
                _ => run = 1,
            }
            longest_streak = longest_streak.max(run);
            previous = Some(date);
        }

        let current_streak = match previous {
            Some(last) if within_gap(now - last) => run,
            _ => 0,
        };

        PersonStats {
            person_id: person_id.to_string(),
            display_name: display_name.to_string(),
            total_sessions: dates.len(),
            current_streak,
            longest_streak,
            total_points,
            last_session_date: previous,
        }
    }

    /// Stats for everyone on the roster, highest points first. Ties keep
    /// roster order.
    pub fn leaderboard(
        &self,
        people: &[Person],
        sessions: &[Session],
        now: DateTime<Utc>,
    ) -> Vec<PersonStats> {
        let mut board: Vec<PersonStats> = people
            .iter()
            .map(|p| self.person_stats(&p.id, &p.display_name, sessions, now))
            .collect();
        board.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        board
    }
}
