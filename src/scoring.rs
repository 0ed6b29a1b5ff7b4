//! Scoring of one [`AnswerSet`] against the catalog into a [`ScoreVector`].
//!
//! A value counts only if its question is in the catalog and it lies in 1..=5.
//! Every metric averages over whichever valid values its question subset has;
//! an empty subset makes that metric NaN.
//!
//! | Metric | Per-answer contribution | Subset |
//! |--------|-------------------------|--------|
//! | `health_score` | `|v − norm|` | all |
//! | `extreme_score` | see [`extreme_deviation`] | all |
//! | `dev_contradictory` | `|v − norm|` | contradictory |
//! | `dev_noncontradictory` | `|v − norm|` | non-contradictory |
//! | `lie_score` | `dev_contradictory − dev_noncontradictory` | both subsets |
//! | `entropy` | Shannon entropy (bits) of the value histogram | all |

use rayon::prelude::*;

use crate::catalog::{QuestionCatalog, QuestionSpec};
use crate::constants::{is_valid_likert, LIKERT_LEVELS, LIKERT_NEUTRAL};
use crate::flagging::FlagThresholds;
use crate::types::{AnswerSet, ParticipantRecord, ScoreVector, ScoredRecord};

/// Absolute deviation from the norm, in 0..=4 for on-scale inputs.
#[inline(always)]
pub fn abs_deviation(value: i64, norm: i64) -> i64 {
    (value - norm).abs()
}

/// Deviation past the norm toward the sick extreme.
///
/// High norms count only under-shooting, low norms only over-shooting, and a
/// neutral norm counts distance from 3 in either direction.
#[inline(always)]
pub fn extreme_deviation(value: i64, norm: i64) -> i64 {
    if norm >= 4 {
        (norm - value).max(0)
    } else if norm <= 2 {
        (value - norm).max(0)
    } else {
        (value - LIKERT_NEUTRAL).abs()
    }
}

/// Running mean that reports NaN when empty.
#[derive(Clone, Copy, Default)]
struct MeanAcc {
    sum: i64,
    n: usize,
}

impl MeanAcc {
    #[inline]
    fn push(&mut self, v: i64) {
        self.sum += v;
        self.n += 1;
    }

    fn mean(&self) -> f64 {
        if self.n == 0 {
            f64::NAN
        } else {
            self.sum as f64 / self.n as f64
        }
    }
}

/// (question, value) pairs that count toward scoring, in catalog order.
fn valid_answers<'a>(
    catalog: &'a QuestionCatalog,
    answers: &'a AnswerSet,
) -> impl Iterator<Item = (&'a QuestionSpec, i64)> + 'a {
    catalog
        .questions()
        .iter()
        .filter_map(move |q| answers.get(&q.id).filter(|&v| is_valid_likert(v)).map(|v| (q, v)))
}

/// Shannon entropy in bits of a histogram over Likert values. NaN when empty.
pub fn histogram_entropy(counts: &[usize; LIKERT_LEVELS]) -> f64 {
    let n: usize = counts.iter().sum();
    if n == 0 {
        return f64::NAN;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n as f64;
            -p * p.log2()
        })
        .sum()
}

/// Score one answer set. Pure: same input, same output.
pub fn score_answers(catalog: &QuestionCatalog, answers: &AnswerSet) -> ScoreVector {
    let mut all = MeanAcc::default();
    let mut contradictory = MeanAcc::default();
    let mut plain = MeanAcc::default();
    let mut extreme = MeanAcc::default();
    let mut counts = [0usize; LIKERT_LEVELS];

    for (q, v) in valid_answers(catalog, answers) {
        let dev = abs_deviation(v, q.norm);
        all.push(dev);
        if q.contradictory {
            contradictory.push(dev);
        } else {
            plain.push(dev);
        }
        extreme.push(extreme_deviation(v, q.norm));
        counts[(v - 1) as usize] += 1;
    }

    let dev_contradictory = contradictory.mean();
    let dev_noncontradictory = plain.mean();
    ScoreVector {
        health_score: all.mean(),
        extreme_score: extreme.mean(),
        // NaN on either side propagates
        lie_score: dev_contradictory - dev_noncontradictory,
        entropy: histogram_entropy(&counts),
        dev_contradictory,
        dev_noncontradictory,
    }
}

/// Score and flag every record in parallel, preserving input order.
pub fn score_records(
    catalog: &QuestionCatalog,
    records: &[ParticipantRecord],
    thresholds: &FlagThresholds,
) -> Vec<ScoredRecord> {
    records
        .par_iter()
        .map(|r| {
            let scores = score_answers(catalog, &r.answers);
            ScoredRecord {
                id: r.id,
                name: r.name.clone(),
                questionnaire_version: r.questionnaire_version,
                flags: thresholds.flags(&scores),
                scores,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionSpec;

    fn at_norm(catalog: &QuestionCatalog) -> AnswerSet {
        catalog.questions().iter().map(|q| (q.id.clone(), q.norm)).collect()
    }

    #[test]
    fn test_scenario_low_norm_at_norm() {
        assert_eq!(abs_deviation(2, 2), 0);
        assert_eq!(extreme_deviation(2, 2), 0);
    }

    #[test]
    fn test_scenario_high_norm_bottomed_out() {
        assert_eq!(abs_deviation(1, 5), 4);
        assert_eq!(extreme_deviation(1, 5), 4);
    }

    #[test]
    fn test_extreme_ignores_healthy_direction() {
        // Norm 4 answered 5 is not a symptom
        assert_eq!(extreme_deviation(5, 4), 0);
        // Norm 2 answered 1 is not a symptom
        assert_eq!(extreme_deviation(1, 2), 0);
        // Neutral norm counts both directions
        assert_eq!(extreme_deviation(1, 3), 2);
        assert_eq!(extreme_deviation(5, 3), 2);
    }

    #[test]
    fn test_all_at_norm_scores_zero() {
        let cat = QuestionCatalog::builtin();
        let s = score_answers(&cat, &at_norm(&cat));
        assert_eq!(s.health_score, 0.0);
        assert_eq!(s.extreme_score, 0.0);
        assert_eq!(s.lie_score, 0.0);
        assert_eq!(s.dev_contradictory, 0.0);
        assert_eq!(s.dev_noncontradictory, 0.0);
        // Norms use only 1, 2, 3, 4, 5 in uneven proportions, well under 2.05 bits
        assert!(s.entropy < 2.05, "entropy={}", s.entropy);
    }

    #[test]
    fn test_empty_answers_are_nan() {
        let cat = QuestionCatalog::builtin();
        let s = score_answers(&cat, &AnswerSet::new());
        assert!(s.health_score.is_nan());
        assert!(s.extreme_score.is_nan());
        assert!(s.lie_score.is_nan());
        assert!(s.entropy.is_nan());
    }

    #[test]
    fn test_invalid_and_unknown_values_ignored() {
        let cat = QuestionCatalog::builtin();
        let answers: AnswerSet = [("q1", 0), ("q2", 6), ("zz", 3), ("q99", 1)].into_iter().collect();
        let s = score_answers(&cat, &answers);
        assert!(s.health_score.is_nan());
        assert!(s.entropy.is_nan());

        let answers: AnswerSet = [("q1", 4), ("q2", 9)].into_iter().collect();
        let s = score_answers(&cat, &answers);
        assert_eq!(s.health_score, 2.0);
        assert_eq!(s.entropy, 0.0);
        // No contradictory question answered
        assert!(s.dev_contradictory.is_nan());
        assert!(s.lie_score.is_nan());
    }

    #[test]
    fn test_uniform_entropy_is_log2_5() {
        let cat = QuestionCatalog::new(
            (1..=5)
                .map(|i| QuestionSpec {
                    id: format!("x{i}"),
                    norm: 3,
                    contradictory: false,
                })
                .collect(),
        )
        .unwrap();
        let answers: AnswerSet = (1..=5).map(|i| (format!("x{i}"), i)).collect();
        let s = score_answers(&cat, &answers);
        assert!((s.entropy - 5f64.log2()).abs() < 1e-12);
        assert!((s.entropy - 2.3219).abs() < 1e-3);
    }

    #[test]
    fn test_lie_score_contradictory_offset() {
        let cat = QuestionCatalog::builtin();
        let answers: AnswerSet = cat
            .questions()
            .iter()
            .map(|q| {
                let v = if q.contradictory {
                    // Every contradictory norm is 1, 4 or 5: two units toward the middle
                    if q.norm >= 4 { q.norm - 2 } else { q.norm + 2 }
                } else {
                    q.norm
                };
                (q.id.clone(), v)
            })
            .collect();
        let s = score_answers(&cat, &answers);
        assert_eq!(s.dev_contradictory, 2.0);
        assert_eq!(s.dev_noncontradictory, 0.0);
        assert_eq!(s.lie_score, 2.0);
        assert!(FlagThresholds::default().flags(&s).lying);
    }

    #[test]
    fn test_score_is_idempotent() {
        let cat = QuestionCatalog::builtin();
        let answers: AnswerSet = [("q1", 5), ("q3", 1), ("q18", 4)].into_iter().collect();
        let a = score_answers(&cat, &answers);
        let b = score_answers(&cat, &answers);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn test_score_records_keeps_order() {
        let cat = QuestionCatalog::builtin();
        let records: Vec<ParticipantRecord> = (0..10)
            .map(|i| ParticipantRecord {
                id: i,
                name: "Healthy-Truthful".into(),
                answers: at_norm(&cat),
                questionnaire_version: (i % 3) as u32 + 1,
            })
            .collect();
        let scored = score_records(&cat, &records, &FlagThresholds::default());
        let ids: Vec<u64> = scored.iter().map(|s| s.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert!(scored.iter().all(|s| !s.flags.sick && !s.flags.lying));
    }
}
