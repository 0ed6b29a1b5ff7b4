//! Per-norm weight tables for single-shot answer sampling.
//!
//! Rows are indexed by `norm - 1`; columns are the weights of Likert values 1..=5.

use rand::Rng;

use crate::catalog::QuestionCatalog;
use crate::sampling::weighted_likert;
use crate::types::AnswerSet;

/// Healthy-Truthful: peaked at the norm.
pub const HEALTHY_TRUTHFUL_WEIGHTS: [[u32; 5]; 5] = [
    [50, 25, 15, 7, 3],
    [25, 40, 20, 10, 5],
    [5, 25, 40, 25, 5],
    [5, 10, 20, 40, 25],
    [3, 7, 15, 25, 50],
];

/// Infected-Truthful: mirror image, peaked at the extreme opposite the norm.
/// A neutral norm splits toward both extremes.
pub const INFECTED_TRUTHFUL_WEIGHTS: [[u32; 5]; 5] = [
    [3, 7, 15, 25, 50],
    [5, 10, 20, 40, 25],
    [30, 17, 6, 17, 30],
    [25, 40, 20, 10, 5],
    [50, 25, 15, 7, 3],
];

/// Flat liar weights, independent of the norm.
pub const UNIFORM_WEIGHTS: [u32; 5] = [20, 20, 20, 20, 20];

#[inline]
fn row(table: &[[u32; 5]; 5], norm: i64) -> &[u32; 5] {
    &table[(norm.clamp(1, 5) - 1) as usize]
}

/// Draw every catalog question from `table[norm - 1]`.
pub fn sample_from_table<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    table: &[[u32; 5]; 5],
    rng: &mut R,
) -> AnswerSet {
    catalog
        .questions()
        .iter()
        .map(|q| (q.id.as_str(), weighted_likert(row(table, q.norm), rng)))
        .collect()
}

/// Draw every catalog question from flat weights.
pub fn sample_uniform<R: Rng + ?Sized>(catalog: &QuestionCatalog, rng: &mut R) -> AnswerSet {
    catalog
        .all_ids()
        .map(|qid| (qid, weighted_likert(&UNIFORM_WEIGHTS, rng)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_mirrors() {
        for n in 0..5 {
            let mut mirrored = HEALTHY_TRUTHFUL_WEIGHTS[n];
            mirrored.reverse();
            if n != 2 {
                assert_eq!(INFECTED_TRUTHFUL_WEIGHTS[n], mirrored);
            }
        }
    }

    #[test]
    fn test_healthy_peak_is_norm() {
        for (n, weights) in HEALTHY_TRUTHFUL_WEIGHTS.iter().enumerate() {
            let peak = weights.iter().enumerate().max_by_key(|(_, w)| **w).unwrap().0;
            assert_eq!(peak, n);
        }
    }
}
