//! Session composition: which exercises, how often, in what order, and which
//! positions are extreme rounds.
//!
//! Every function that makes a random choice takes the generator as an
//! argument, so a seeded `rand_pcg::Mcg128Xsl64` reproduces an arrangement
//! exactly.

mod arrange;
mod composer;
mod extreme;

pub use arrange::{arrange_slots, floor_offset_bounds, prevent_consecutive_same};
pub use composer::{build_smart_session, repetition_plan, unique_count, SessionDraft};
pub use extreme::{pick_extreme_indices, MAX_ATTEMPTS};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::library::Exercise;

/// One picked instance of an exercise in a draft.
///
/// Repeated picks of the same exercise get distinct `slot_id`s so each can be
/// moved or removed on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSlot {
    pub slot_id: String,
    pub exercise: Exercise,
}

impl SessionSlot {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            slot_id: Uuid::new_v4().to_string(),
            exercise,
        }
    }
}
