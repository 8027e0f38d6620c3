//! Slot arrangement.
//!
//! Two rules shape a session's order: the same exercise should not run twice
//! in a row, and floor exercises run as one block somewhere in the middle so
//! nobody gets down on the mat at the very start or end.

use rand::seq::SliceRandom;
use rand::Rng;

use super::SessionSlot;

/// Shuffle, then make one repair pass over back-to-back repeats.
///
/// For every adjacent pair with the same exercise a swap partner is searched
/// forward, then backward; a partner qualifies only if the swap introduces no
/// new repeat at either end. Inputs dominated by one exercise can keep some
/// repeats.
pub fn prevent_consecutive_same<R: Rng + ?Sized>(
    mut slots: Vec<SessionSlot>,
    rng: &mut R,
) -> Vec<SessionSlot> {
    slots.shuffle(rng);

    for i in 1..slots.len() {
        if !same_exercise(&slots, i - 1, i) {
            continue;
        }
        let forward = (i + 1..slots.len()).find(|&j| swap_is_clean(&mut slots, i, j));
        let partner = forward.or_else(|| (0..i - 1).rev().find(|&j| swap_is_clean(&mut slots, i, j)));
        if let Some(j) = partner {
            slots.swap(i, j);
        }
    }

    slots
}

/// Order slots for a session: repeats spread out, floor work grouped.
///
/// The floor block goes in at a standing offset drawn uniformly from
/// `[max(ceil(n/4), 1), floor(3n/4)]`, so it never opens or closes the
/// session when there is standing work on both sides.
pub fn arrange_slots<R: Rng + ?Sized>(slots: Vec<SessionSlot>, rng: &mut R) -> Vec<SessionSlot> {
    let (floor, standing): (Vec<_>, Vec<_>) =
        slots.into_iter().partition(|slot| slot.exercise.is_floor);

    if floor.is_empty() {
        return prevent_consecutive_same(standing, rng);
    }
    if standing.is_empty() {
        return prevent_consecutive_same(floor, rng);
    }

    let floor = prevent_consecutive_same(floor, rng);
    let mut standing = prevent_consecutive_same(standing, rng);

    let (lo, hi) = floor_offset_bounds(standing.len());
    let offset = rng.gen_range(lo..=hi);
    let tail = standing.split_off(offset);
    standing.extend(floor);
    standing.extend(tail);
    standing
}

/// Inclusive insertion offsets for the floor block.
pub fn floor_offset_bounds(standing_len: usize) -> (usize, usize) {
    let lo = standing_len.div_ceil(4).max(1).min(standing_len);
    let hi = (standing_len * 3 / 4).max(lo);
    (lo, hi)
}

fn same_exercise(slots: &[SessionSlot], a: usize, b: usize) -> bool {
    slots[a].exercise.id == slots[b].exercise.id
}

fn repeats_around(slots: &[SessionSlot], pos: usize) -> bool {
    (pos > 0 && same_exercise(slots, pos - 1, pos))
        || (pos + 1 < slots.len() && same_exercise(slots, pos, pos + 1))
}

/// Whether swapping `i` and `j` leaves both positions free of repeats.
/// The slice is restored before returning.
fn swap_is_clean(slots: &mut [SessionSlot], i: usize, j: usize) -> bool {
    if same_exercise(slots, i, j) {
        return false;
    }
    slots.swap(i, j);
    let clean = !repeats_around(slots, i) && !repeats_around(slots, j);
    slots.swap(i, j);
    clean
}
