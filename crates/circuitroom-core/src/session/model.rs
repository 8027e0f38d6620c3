use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::library::Exercise;

/// Phase durations and the number of extreme rounds.
///
/// Persisted verbatim inside every [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    #[serde(default = "default_exercise_duration")]
    pub exercise_duration_sec: u32,
    #[serde(default = "default_rest_duration")]
    pub rest_duration_sec: u32,
    #[serde(default = "default_extreme_duration")]
    pub extreme_duration_sec: u32,
    #[serde(default = "default_extreme_count")]
    pub extreme_count: u32,
}

fn default_exercise_duration() -> u32 {
    40
}
fn default_rest_duration() -> u32 {
    5
}
fn default_extreme_duration() -> u32 {
    60
}
fn default_extreme_count() -> u32 {
    2
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            exercise_duration_sec: default_exercise_duration(),
            rest_duration_sec: default_rest_duration(),
            extreme_duration_sec: default_extreme_duration(),
            extreme_count: default_extreme_count(),
        }
    }
}

impl SessionSettings {
    pub const EXERCISE_DURATION_RANGE: (u32, u32) = (10, 120);
    pub const REST_DURATION_RANGE: (u32, u32) = (3, 30);
    pub const EXTREME_DURATION_RANGE: (u32, u32) = (10, 180);
    pub const EXTREME_COUNT_RANGE: (u32, u32) = (0, 10);

    /// Check every field against the ranges the setup screen offers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (
                "exerciseDurationSec",
                self.exercise_duration_sec,
                Self::EXERCISE_DURATION_RANGE,
            ),
            (
                "restDurationSec",
                self.rest_duration_sec,
                Self::REST_DURATION_RANGE,
            ),
            (
                "extremeDurationSec",
                self.extreme_duration_sec,
                Self::EXTREME_DURATION_RANGE,
            ),
            ("extremeCount", self.extreme_count, Self::EXTREME_COUNT_RANGE),
        ];
        for (field, value, (min, max)) in checks {
            if !(min..=max).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: field.into(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Snapshot of an [`Exercise`] plus its timing in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExercise {
    pub exercise_id: String,
    pub name: String,
    pub duration_sec: u32,
    pub is_extreme: bool,
    pub order: usize,
    pub rom_cm: f64,
    pub reps_per_40s: f64,
    pub dumbbells_used: u8,
    pub vertical_factor: f64,
}

impl SessionExercise {
    pub fn snapshot(exercise: &Exercise, order: usize, duration_sec: u32, is_extreme: bool) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            duration_sec,
            is_extreme,
            order,
            rom_cm: exercise.rom_cm,
            reps_per_40s: exercise.reps_per_40s,
            dumbbells_used: exercise.dumbbells_used,
            vertical_factor: exercise.vertical_factor,
        }
    }
}

/// A built workout. Drafts become immutable history once `completed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub participants: Vec<String>,
    pub participant_names: Vec<String>,
    pub exercises: Vec<SessionExercise>,
    pub settings: SessionSettings,
    pub completed: bool,
    pub total_duration_sec: u64,
    pub total_meters: f64,
    #[serde(rename = "totalWorkKJ")]
    pub total_work_kj: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(SessionSettings::default().validate().is_ok());
    }

    #[test]
    fn validate_reports_field() {
        let settings = SessionSettings {
            extreme_count: 11,
            ..SessionSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ValidationError::OutOfRange {
                field: "extremeCount".into(),
                value: 11,
                min: 0,
                max: 10,
            })
        );
    }

    #[test]
    fn session_json_shape() {
        let session = Session {
            id: "s1".into(),
            date: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            participants: vec!["p1".into()],
            participant_names: vec!["Ana".into()],
            exercises: vec![],
            settings: SessionSettings::default(),
            completed: true,
            total_duration_sec: 300,
            total_meters: 9.6,
            total_work_kj: 0.942,
        };
        let json = serde_json::to_value(&session).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "completed",
                "date",
                "exercises",
                "id",
                "participantNames",
                "participants",
                "settings",
                "totalDurationSec",
                "totalMeters",
                "totalWorkKJ",
            ]
        );
        assert_eq!(json["date"], 1_700_000_000_000_i64);
        assert_eq!(json["settings"]["restDurationSec"], 5);
    }
}
