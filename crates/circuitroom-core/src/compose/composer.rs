use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{arrange_slots, SessionSlot};
use crate::error::ValidationError;
use crate::library::Exercise;

/// Distinct exercises for a target size: roughly a third of the target,
/// at least 3, never more than the library holds.
pub fn unique_count(target_total: usize, library_len: usize) -> usize {
    let rounded = (target_total as f64 / 3.0).round() as usize;
    rounded.max(3).min(library_len)
}

/// Repetitions (2 or 3) for each of `unique` picks, summing to `target_total`
/// whenever `2 * unique <= target_total <= 3 * unique`.
///
/// A pick gets 3 while the average still needed per remaining pick is above
/// 2.5, 2 below it, and a coin flip exactly at 2.5. That keeps the average in
/// `[2, 3]`, so the last pick can absorb the remainder.
pub fn repetition_plan<R: Rng + ?Sized>(
    unique: usize,
    target_total: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut plan = Vec::with_capacity(unique);
    let mut remaining = target_total;

    for i in 0..unique {
        let left = unique - i;
        let reps = if left == 1 {
            remaining.clamp(2, 3)
        } else {
            // Compare remaining / left against 2.5 without floats.
            match (2 * remaining).cmp(&(5 * left)) {
                std::cmp::Ordering::Greater => 3,
                std::cmp::Ordering::Equal if rng.gen_bool(0.5) => 3,
                _ => 2,
            }
        };
        plan.push(reps);
        remaining = remaining.saturating_sub(reps);
    }

    plan
}

/// Build a slot list of about `target_total` entries from the library.
///
/// Picks `unique_count` distinct exercises, repeats each two or three times
/// and arranges the result with [`arrange_slots`].
pub fn build_smart_session<R: Rng + ?Sized>(
    library: &[Exercise],
    target_total: usize,
    rng: &mut R,
) -> Vec<SessionSlot> {
    if library.is_empty() {
        return Vec::new();
    }

    let unique = unique_count(target_total, library.len());
    let picks: Vec<Exercise> = library.choose_multiple(rng, unique).cloned().collect();
    let plan = repetition_plan(unique, target_total, rng);

    let slots: Vec<SessionSlot> = picks
        .into_iter()
        .zip(plan)
        .flat_map(|(exercise, reps)| (0..reps).map(move |_| SessionSlot::new(exercise.clone())))
        .collect();

    tracing::debug!(unique, target_total, slots = slots.len(), "composed session");
    arrange_slots(slots, rng)
}

/// The slot list being edited before a session is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    slots: Vec<SessionSlot>,
}

impl SessionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<SessionSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[SessionSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replace the draft with a freshly composed one.
    pub fn smart_fill<R: Rng + ?Sized>(&mut self, library: &[Exercise], target_total: usize, rng: &mut R) {
        self.slots = build_smart_session(library, target_total, rng);
    }

    /// Append one instance of `exercise`, returning its slot id.
    pub fn add(&mut self, exercise: Exercise) -> String {
        let slot = SessionSlot::new(exercise);
        let id = slot.slot_id.clone();
        self.slots.push(slot);
        id
    }

    pub fn remove(&mut self, slot_id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.slot_id != slot_id);
        self.slots.len() != before
    }

    /// One slot per library exercise, in library order.
    pub fn add_all(&mut self, library: &[Exercise]) {
        self.slots = library.iter().cloned().map(SessionSlot::new).collect();
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.slots = arrange_slots(std::mem::take(&mut self.slots), rng);
    }

    /// Move the slot at `from` to position `to`, shifting the ones between.
    pub fn move_slot(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.slots.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::InvalidValue {
                    field: "slot index".into(),
                    message: format!("{index} is out of bounds for {len} slots"),
                });
            }
        }
        let slot = self.slots.remove(from);
        self.slots.insert(to, slot);
        Ok(())
    }

    /// Pick up library edits: refresh changed exercises, drop deleted ones.
    pub fn sync_with_library(&mut self, library: &[Exercise]) {
        self.slots.retain_mut(|slot| {
            match library.iter().find(|e| e.id == slot.exercise.id) {
                Some(current) => {
                    slot.exercise = current.clone();
                    true
                }
                None => false,
            }
        });
    }

    /// Ordered exercise list for [`SessionBuilder::create_session`](crate::session::SessionBuilder::create_session).
    pub fn exercises(&self) -> Vec<Exercise> {
        self.slots.iter().map(|s| s.exercise.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;
    use std::collections::HashMap;

    fn library(n: usize, floor_every: usize) -> Vec<Exercise> {
        (0..n)
            .map(|i| Exercise {
                id: format!("ex-{i}"),
                name: format!("Exercise {i}"),
                rom_cm: 40.0,
                reps_per_40s: 12.0,
                dumbbells_used: 2,
                vertical_factor: 0.5,
                is_floor: floor_every > 0 && i % floor_every == 0,
            })
            .collect()
    }

    #[test]
    fn unique_count_clamps() {
        assert_eq!(unique_count(25, 20), 8);
        assert_eq!(unique_count(3, 20), 3);
        assert_eq!(unique_count(25, 5), 5);
        assert_eq!(unique_count(25, 2), 2);
    }

    #[test]
    fn plan_hits_reachable_targets() {
        let mut rng = Mcg128Xsl64::seed_from_u64(2);
        for unique in 3..12 {
            for target in 2 * unique..=3 * unique {
                let plan = repetition_plan(unique, target, &mut rng);
                assert_eq!(plan.len(), unique);
                assert!(plan.iter().all(|&r| r == 2 || r == 3));
                assert_eq!(plan.iter().sum::<usize>(), target, "unique {unique} target {target}");
            }
        }
    }

    #[test]
    fn plan_saturates_unreachable_targets() {
        let mut rng = Mcg128Xsl64::seed_from_u64(2);
        assert_eq!(repetition_plan(3, 30, &mut rng), vec![3, 3, 3]);
        assert_eq!(repetition_plan(3, 2, &mut rng), vec![2, 2, 2]);
    }

    #[test]
    fn smart_session_of_25() {
        let lib = library(12, 4);
        let mut rng = Mcg128Xsl64::seed_from_u64(42);
        let slots = build_smart_session(&lib, 25, &mut rng);

        // round(25 / 3) = 8 uniques; 25 > 24 so every pick gets 3.
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for slot in &slots {
            *counts.entry(slot.exercise.id.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert_eq!(slots.len(), 24);
        assert!(counts.values().all(|&c| c == 2 || c == 3));
    }

    #[test]
    fn smart_session_reachable_total_is_exact() {
        let lib = library(12, 0);
        let mut rng = Mcg128Xsl64::seed_from_u64(8);
        let slots = build_smart_session(&lib, 20, &mut rng);
        // round(20 / 3) = 7 uniques, 14 <= 20 <= 21.
        assert_eq!(slots.len(), 20);
    }

    #[test]
    fn empty_library_gives_empty_session() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(build_smart_session(&[], 25, &mut rng).is_empty());
    }

    #[test]
    fn draft_editing() {
        let lib = library(4, 0);
        let mut draft = SessionDraft::new();
        draft.add_all(&lib);
        assert_eq!(draft.len(), 4);

        let extra = draft.add(lib[0].clone());
        assert_eq!(draft.len(), 5);
        assert!(draft.remove(&extra));
        assert!(!draft.remove(&extra));

        draft.move_slot(0, 3).unwrap();
        assert_eq!(draft.slots()[3].exercise.id, "ex-0");
        assert_eq!(draft.slots()[0].exercise.id, "ex-1");
        assert!(draft.move_slot(0, 9).is_err());

        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        draft.shuffle(&mut rng);
        assert_eq!(draft.len(), 4);

        draft.clear();
        assert!(draft.is_empty());
    }

    #[test]
    fn draft_follows_library_edits() {
        let mut lib = library(3, 0);
        let mut draft = SessionDraft::new();
        draft.add_all(&lib);
        draft.add(lib[1].clone());

        lib[1].name = "Renamed".into();
        lib.remove(0);
        draft.sync_with_library(&lib);

        assert_eq!(draft.len(), 3);
        assert!(draft.exercises().iter().all(|e| e.id != "ex-0"));
        assert_eq!(
            draft.exercises().iter().filter(|e| e.name == "Renamed").count(),
            2
        );
    }
}
