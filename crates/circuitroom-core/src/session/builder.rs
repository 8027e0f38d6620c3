//! Session lifecycle: build a draft, finalize it once, keep the history.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use super::{Session, SessionExercise, SessionSettings};
use crate::compose::pick_extreme_indices;
use crate::error::{Result, ValidationError};
use crate::library::Exercise;
use crate::physics;
use crate::storage::Store;

/// Store collection holding session documents.
pub const SESSIONS_COLLECTION: &str = "sessions";

/// Builds sessions and owns the active draft plus completed history.
///
/// `complete_session` is latched: only the first call after `create_session`
/// finalizes and persists. Later calls (a manual "end" racing the automatic
/// finish) return `None` and do nothing.
pub struct SessionBuilder<S: Store> {
    store: S,
    owner_id: String,
    settings: SessionSettings,
    current: Option<Session>,
    completion_latched: bool,
    history: Vec<Session>,
}

impl<S: Store> SessionBuilder<S> {
    pub fn new(store: S, owner_id: impl Into<String>, settings: SessionSettings) -> Self {
        Self {
            store,
            owner_id: owner_id.into(),
            settings,
            current: None,
            completion_latched: false,
            history: Vec::new(),
        }
    }

    /// Replace the in-memory history with the owner's stored sessions, oldest first.
    pub fn load_history(&mut self) -> Result<&[Session]> {
        let docs = self
            .store
            .fetch_all(&self.owner_id, SESSIONS_COLLECTION, Some("date"))?;
        self.history = docs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Session>, _>>()?;
        Ok(&self.history)
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: SessionSettings) -> Result<(), ValidationError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[Session] {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build a draft from an ordered exercise list and make it the active session.
    pub fn create_session<R: Rng + ?Sized>(
        &mut self,
        participant_ids: Vec<String>,
        participant_names: Vec<String>,
        exercises: &[Exercise],
        rng: &mut R,
    ) -> Result<Session, ValidationError> {
        self.create_session_at(participant_ids, participant_names, exercises, Utc::now(), rng)
    }

    /// [`create_session`](Self::create_session) with an explicit session date.
    pub fn create_session_at<R: Rng + ?Sized>(
        &mut self,
        participant_ids: Vec<String>,
        participant_names: Vec<String>,
        exercises: &[Exercise],
        date: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Session, ValidationError> {
        if exercises.is_empty() {
            return Err(ValidationError::EmptyCollection("session exercises".into()));
        }
        self.settings.validate()?;
        if participant_ids.len() != participant_names.len() {
            return Err(ValidationError::InvalidValue {
                field: "participantNames".into(),
                message: format!(
                    "{} names for {} participants",
                    participant_names.len(),
                    participant_ids.len()
                ),
            });
        }

        let settings = self.settings;
        let extremes =
            pick_extreme_indices(exercises.len(), settings.extreme_count as usize, rng);

        let session_exercises: Vec<SessionExercise> = exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| {
                let is_extreme = extremes.contains(&i);
                let duration = if is_extreme {
                    settings.extreme_duration_sec
                } else {
                    settings.exercise_duration_sec
                };
                SessionExercise::snapshot(ex, i, duration, is_extreme)
            })
            .collect();

        let totals = physics::calculate(&session_exercises);

        let session = Session {
            id: Uuid::new_v4().to_string(),
            date,
            participants: participant_ids,
            participant_names,
            exercises: session_exercises,
            settings,
            completed: false,
            total_duration_sec: 0,
            total_meters: totals.total_meters,
            total_work_kj: totals.total_work_kj,
        };

        tracing::debug!(
            id = %session.id,
            exercises = session.exercises.len(),
            extremes = extremes.len(),
            "created session draft"
        );
        self.current = Some(session.clone());
        self.completion_latched = false;
        Ok(session)
    }

    /// Finalize the active draft. Returns the completed record on the first
    /// call only.
    ///
    /// The record is saved once; a failed save is logged and the completion
    /// and history append still happen.
    pub fn complete_session(&mut self, total_duration_sec: u64) -> Option<Session> {
        if self.completion_latched {
            return None;
        }
        let draft = self.current.as_ref()?;
        self.completion_latched = true;

        let completed = Session {
            completed: true,
            total_duration_sec,
            ..draft.clone()
        };

        match serde_json::to_value(&completed) {
            Ok(doc) => {
                if let Err(e) =
                    self.store
                        .save(&self.owner_id, SESSIONS_COLLECTION, &completed.id, &doc)
                {
                    tracing::warn!(id = %completed.id, "session not persisted: {e}");
                }
            }
            Err(e) => tracing::warn!(id = %completed.id, "session not serializable: {e}"),
        }

        tracing::info!(
            id = %completed.id,
            total_duration_sec,
            total_meters = completed.total_meters,
            "session completed"
        );
        self.current = Some(completed.clone());
        self.history.push(completed.clone());
        Some(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn exercises(n: usize) -> Vec<Exercise> {
        (0..n)
            .map(|i| Exercise {
                id: format!("ex-{i}"),
                name: format!("Exercise {i}"),
                rom_cm: 40.0,
                reps_per_40s: 12.0,
                dumbbells_used: 2,
                vertical_factor: 0.5,
                is_floor: false,
            })
            .collect()
    }

    fn builder(settings: SessionSettings) -> SessionBuilder<MemoryStore> {
        SessionBuilder::new(MemoryStore::new(), "owner", settings)
    }

    #[test]
    fn one_extreme_of_three() {
        let settings = SessionSettings {
            exercise_duration_sec: 40,
            rest_duration_sec: 5,
            extreme_duration_sec: 60,
            extreme_count: 1,
        };
        let mut b = builder(settings);
        let mut rng = Mcg128Xsl64::seed_from_u64(10);
        let session = b
            .create_session(vec![], vec![], &exercises(3), &mut rng)
            .unwrap();

        let extremes: Vec<_> = session.exercises.iter().filter(|e| e.is_extreme).collect();
        assert_eq!(extremes.len(), 1);
        assert_eq!(extremes[0].duration_sec, 60);
        assert!(session
            .exercises
            .iter()
            .filter(|e| !e.is_extreme)
            .all(|e| e.duration_sec == 40));
        assert!(session.exercises.iter().enumerate().all(|(i, e)| e.order == i));
        assert!(!session.completed);
        assert_eq!(session.total_duration_sec, 0);
    }

    #[test]
    fn totals_match_physics() {
        let mut b = builder(SessionSettings::default());
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let session = b
            .create_session(vec![], vec![], &exercises(6), &mut rng)
            .unwrap();
        let totals = physics::calculate(&session.exercises);
        assert_eq!(session.total_meters, totals.total_meters);
        assert_eq!(session.total_work_kj, totals.total_work_kj);
    }

    #[test]
    fn snapshot_is_detached_from_library() {
        let mut lib = exercises(2);
        let mut b = builder(SessionSettings::default());
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let session = b.create_session(vec![], vec![], &lib, &mut rng).unwrap();
        lib[0].name = "Changed".into();
        assert_eq!(b.current().unwrap().exercises[0].name, "Exercise 0");
        assert_eq!(session.exercises[0].name, "Exercise 0");
    }

    #[test]
    fn complete_is_latched() {
        let mut b = builder(SessionSettings::default());
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        b.create_session(vec!["p1".into()], vec!["Ana".into()], &exercises(4), &mut rng)
            .unwrap();

        let done = b.complete_session(321).unwrap();
        assert!(done.completed);
        assert_eq!(done.total_duration_sec, 321);
        assert!(b.complete_session(999).is_none());

        assert_eq!(b.history().len(), 1);
        assert_eq!(b.store().save_calls(), 1);
        assert_eq!(b.current().unwrap().total_duration_sec, 321);
    }

    #[test]
    fn complete_without_draft_is_noop() {
        let mut b = builder(SessionSettings::default());
        assert!(b.complete_session(10).is_none());
        assert!(b.history().is_empty());
    }

    #[test]
    fn persistence_failure_is_swallowed() {
        let mut b = builder(SessionSettings::default());
        b.store().set_fail_writes(true);
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        b.create_session(vec![], vec![], &exercises(2), &mut rng)
            .unwrap();

        let done = b.complete_session(60).unwrap();
        assert!(done.completed);
        assert_eq!(b.history().len(), 1);
        assert_eq!(b.store().save_calls(), 1);
    }

    #[test]
    fn history_round_trips_through_store() {
        let mut b = builder(SessionSettings::default());
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let date = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        b.create_session_at(
            vec!["p1".into()],
            vec!["Ana".into()],
            &exercises(3),
            date,
            &mut rng,
        )
        .unwrap();
        let done = b.complete_session(200).unwrap();

        b.load_history().unwrap();
        assert_eq!(b.history(), &[done]);
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        let mut b = builder(SessionSettings::default());
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(b.create_session(vec![], vec![], &[], &mut rng).is_err());
        assert!(b
            .create_session(vec!["p1".into()], vec![], &exercises(2), &mut rng)
            .is_err());
        assert!(b
            .set_settings(SessionSettings {
                rest_duration_sec: 1,
                ..SessionSettings::default()
            })
            .is_err());
    }

    #[test]
    fn settings_from_the_constructor_are_checked_on_create() {
        let mut b = builder(SessionSettings {
            exercise_duration_sec: 0,
            ..SessionSettings::default()
        });
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let result = b.create_session(vec![], vec![], &exercises(3), &mut rng);
        assert!(matches!(
            result,
            Err(ValidationError::OutOfRange { ref field, value: 0, .. }) if field == "exerciseDurationSec"
        ));
        assert!(b.current().is_none());
    }
}
