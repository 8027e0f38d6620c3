//! Distance and mechanical work estimates for a session.
//!
//! Rounding happens per exercise (meters to 2 decimals, kJ to 3), and the
//! totals are sums of those rounded values, rounded again to the same
//! precision. Totals therefore carry per-item rounding error deterministically.

use serde::{Deserialize, Serialize};

use crate::session::SessionExercise;

pub const GRAVITY: f64 = 9.81;
pub const DUMBBELL_MASS_KG: f64 = 10.0;
/// Duration the `reps_per_40s` figure refers to.
pub const REFERENCE_WINDOW_SECS: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePhysics {
    pub name: String,
    pub meters: f64,
    #[serde(rename = "workKJ")]
    pub work_kj: f64,
    pub is_extreme: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsResult {
    pub total_meters: f64,
    #[serde(rename = "totalWorkKJ")]
    pub total_work_kj: f64,
    pub per_exercise: Vec<ExercisePhysics>,
}

/// Estimate meters moved and work done for one exercise, unrounded.
pub fn estimate(exercise: &SessionExercise) -> (f64, f64) {
    let scale_factor = exercise.duration_sec as f64 / REFERENCE_WINDOW_SECS;
    let estimated_reps = exercise.reps_per_40s * scale_factor;
    let dumbbells = exercise.dumbbells_used as f64;
    let meters = (exercise.rom_cm / 100.0) * estimated_reps * dumbbells;
    let mass_kg = DUMBBELL_MASS_KG * dumbbells;
    let work_j = mass_kg * GRAVITY * meters * exercise.vertical_factor;
    (meters, work_j / 1000.0)
}

pub fn calculate(exercises: &[SessionExercise]) -> PhysicsResult {
    let per_exercise: Vec<ExercisePhysics> = exercises
        .iter()
        .map(|ex| {
            let (meters, work_kj) = estimate(ex);
            ExercisePhysics {
                name: ex.name.clone(),
                meters: round_to(meters, 2),
                work_kj: round_to(work_kj, 3),
                is_extreme: ex.is_extreme,
            }
        })
        .collect();

    let total_meters = round_to(per_exercise.iter().map(|e| e.meters).sum(), 2);
    let total_work_kj = round_to(per_exercise.iter().map(|e| e.work_kj).sum(), 3);

    PhysicsResult {
        total_meters,
        total_work_kj,
        per_exercise,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
