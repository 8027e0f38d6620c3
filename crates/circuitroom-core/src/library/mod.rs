//! Exercise library.
//!
//! The library is the owner's catalogue of exercises. Sessions never hold a
//! reference into it: [`SessionBuilder`](crate::session::SessionBuilder)
//! snapshots every field it needs at build time.

mod defaults;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::{Outbox, Store};

pub use defaults::default_exercises;

/// Store collection holding exercise documents.
pub const EXERCISES_COLLECTION: &str = "exercises";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Range of motion per rep, in centimeters.
    pub rom_cm: f64,
    /// Reps performed in the 40 second reference window.
    pub reps_per_40s: f64,
    /// 1 or 2.
    pub dumbbells_used: u8,
    /// Fraction (0..1) of the rep distance that is vertical.
    pub vertical_factor: f64,
    #[serde(default)]
    pub is_floor: bool,
}

/// An exercise that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDraft {
    pub name: String,
    pub rom_cm: f64,
    pub reps_per_40s: f64,
    pub dumbbells_used: u8,
    pub vertical_factor: f64,
    #[serde(default)]
    pub is_floor: bool,
}

impl ExerciseDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "must not be empty".into(),
            });
        }
        if !(1..=2).contains(&self.dumbbells_used) {
            return Err(ValidationError::OutOfRange {
                field: "dumbbellsUsed".into(),
                value: self.dumbbells_used as u32,
                min: 1,
                max: 2,
            });
        }
        if !(0.0..=1.0).contains(&self.vertical_factor) {
            return Err(ValidationError::InvalidValue {
                field: "verticalFactor".into(),
                message: format!("{} is not within 0..1", self.vertical_factor),
            });
        }
        if self.rom_cm < 0.0 || self.reps_per_40s < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "romCm/repsPer40s".into(),
                message: "must not be negative".into(),
            });
        }
        Ok(())
    }

    fn into_exercise(self, id: String) -> Exercise {
        Exercise {
            id,
            name: self.name,
            rom_cm: self.rom_cm,
            reps_per_40s: self.reps_per_40s,
            dumbbells_used: self.dumbbells_used,
            vertical_factor: self.vertical_factor,
            is_floor: self.is_floor,
        }
    }
}

/// The owner's exercise catalogue.
///
/// Mutations update the in-memory list immediately and enqueue the matching
/// store write on the outbox; a failed write never rolls the list back.
#[derive(Debug)]
pub struct ExerciseLibrary {
    owner_id: String,
    exercises: Vec<Exercise>,
    outbox: Outbox,
}

impl ExerciseLibrary {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            exercises: Vec::new(),
            outbox: Outbox::default(),
        }
    }

    /// Load the owner's exercises, seeding the built-in set when there are none.
    pub fn load(owner_id: impl Into<String>, store: &dyn Store) -> Result<Self> {
        let mut library = Self::new(owner_id);
        let docs = store.fetch_all(&library.owner_id, EXERCISES_COLLECTION, None)?;
        library.exercises = docs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Exercise>, _>>()?;

        if library.exercises.is_empty() {
            tracing::info!(owner = %library.owner_id, "seeding default exercise library");
            for draft in default_exercises() {
                library.add(draft)?;
            }
            library.flush(store);
        }
        Ok(library)
    }

    pub fn list(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn add(&mut self, draft: ExerciseDraft) -> Result<Exercise> {
        draft.validate()?;
        let exercise = draft.into_exercise(Uuid::new_v4().to_string());
        self.outbox.enqueue_save(
            &self.owner_id,
            EXERCISES_COLLECTION,
            &exercise.id,
            serde_json::to_value(&exercise)?,
        );
        self.exercises.push(exercise.clone());
        Ok(exercise)
    }

    pub fn update(&mut self, exercise: Exercise) -> Result<()> {
        let slot = self
            .exercises
            .iter_mut()
            .find(|e| e.id == exercise.id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "exercise".into(),
                id: exercise.id.clone(),
            })?;
        self.outbox.enqueue_save(
            &self.owner_id,
            EXERCISES_COLLECTION,
            &exercise.id,
            serde_json::to_value(&exercise)?,
        );
        *slot = exercise;
        Ok(())
    }

    /// Remove an exercise. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != id);
        let removed = self.exercises.len() != before;
        if removed {
            self.outbox
                .enqueue_remove(&self.owner_id, EXERCISES_COLLECTION, id);
        }
        removed
    }

    /// Push pending writes to the store. Returns how many were written.
    pub fn flush(&mut self, store: &dyn Store) -> usize {
        self.outbox.flush(store)
    }

    pub fn pending_writes(&self) -> usize {
        self.outbox.len()
    }
}
