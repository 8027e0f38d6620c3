use std::collections::BTreeSet;

use rand::Rng;

/// Random trials before falling back to the lowest free indices.
pub const MAX_ATTEMPTS: usize = 100;

/// Choose which positions of a sequence become extreme rounds.
///
/// Tries to keep extremes non-adjacent. When the random trials run out
/// (too many extremes for the sequence length), the remaining picks are the
/// lowest unused indices in ascending order and adjacency is no longer
/// respected. The result always holds `min(extreme_count, exercise_count)`
/// indices, or none when `exercise_count <= 1`.
pub fn pick_extreme_indices<R: Rng + ?Sized>(
    exercise_count: usize,
    extreme_count: usize,
    rng: &mut R,
) -> BTreeSet<usize> {
    let mut indices: BTreeSet<usize> = BTreeSet::new();
    if exercise_count <= 1 {
        return indices;
    }
    let target = extreme_count.min(exercise_count);

    let mut attempts = 0;
    while indices.len() < target && attempts < MAX_ATTEMPTS {
        let idx = rng.gen_range(0..exercise_count);
        if indices.iter().all(|&existing| existing.abs_diff(idx) > 1) {
            indices.insert(idx);
        }
        attempts += 1;
    }

    if indices.len() < target {
        tracing::debug!(
            exercise_count,
            extreme_count,
            placed = indices.len(),
            "extreme placement relaxed adjacency"
        );
        for i in 0..exercise_count {
            if indices.len() >= target {
                break;
            }
            indices.insert(i);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn tiny_sequences_get_no_extremes() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(pick_extreme_indices(0, 3, &mut rng).is_empty());
        assert!(pick_extreme_indices(1, 3, &mut rng).is_empty());
    }

    #[test]
    fn spaced_when_feasible() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        for _ in 0..50 {
            let picked: Vec<usize> = pick_extreme_indices(25, 2, &mut rng).into_iter().collect();
            assert_eq!(picked.len(), 2);
            assert!(picked[1] - picked[0] > 1);
            assert!(picked.iter().all(|&i| i < 25));
        }
    }

    #[test]
    fn infeasible_request_still_fills_count() {
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        let picked = pick_extreme_indices(6, 5, &mut rng);
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|&i| i < 6));
    }

    #[test]
    fn count_capped_by_length() {
        let mut rng = Mcg128Xsl64::seed_from_u64(9);
        let picked = pick_extreme_indices(4, 10, &mut rng);
        assert_eq!(picked, (0..4).collect());
    }

    #[test]
    fn zero_extremes() {
        let mut rng = Mcg128Xsl64::seed_from_u64(9);
        assert!(pick_extreme_indices(10, 0, &mut rng).is_empty());
    }
}
