//! Mixture-of-strategies liar model.
//!
//! Each synthetic liar draws one latent [`LyingStrategy`] and one style bias
//! in {−1, 0, +1} up front, then answers every question with the strategy's
//! rule around the biased norm `clamp(norm + bias)`. Infected liars conceal
//! imperfectly: each answer has an independent chance of one extra unit
//! toward the sick extreme of the true norm.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{QuestionCatalog, QuestionSpec};
use crate::constants::{clamp_likert, healthy_pole, LIKERT_NEUTRAL};
use crate::sampling::{chance, random_sign, weighted_choice};
use crate::types::AnswerSet;

/// Relative weights of social, defensive, overcompensate_contradict, plausible_random.
pub const STRATEGY_WEIGHTS: [u32; 4] = [45, 25, 20, 10];

/// Relative weights of style bias −1, 0, +1.
pub const STYLE_BIAS_WEIGHTS: [u32; 3] = [15, 70, 15];

/// Chance that an infected liar's answer slips one unit toward the sick extreme.
pub const CONCEALMENT_SLIP: f64 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LyingStrategy {
    /// Fake-good: at or past the healthy pole.
    Social,
    /// Non-committal: gravitates to the neutral midpoint.
    Defensive,
    /// Consistent on plain items, deliberately off on contradictory ones.
    OvercompensateContradict,
    /// Anything within two units of the biased norm.
    PlausibleRandom,
}

impl LyingStrategy {
    pub const ALL: [LyingStrategy; 4] = [
        LyingStrategy::Social,
        LyingStrategy::Defensive,
        LyingStrategy::OvercompensateContradict,
        LyingStrategy::PlausibleRandom,
    ];
}

/// Latent per-participant traits, fixed across the whole answer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LiarTraits {
    pub strategy: LyingStrategy,
    pub style_bias: i64,
    pub infected: bool,
}

impl LiarTraits {
    /// Draw strategy then style bias.
    pub fn sample<R: Rng + ?Sized>(infected: bool, rng: &mut R) -> Self {
        let strategy = weighted_choice(&LyingStrategy::ALL, &STRATEGY_WEIGHTS, rng);
        let style_bias = weighted_choice(&[-1, 0, 1], &STYLE_BIAS_WEIGHTS, rng);
        Self {
            strategy,
            style_bias,
            infected,
        }
    }
}

/// One unit from `value` toward `toward`; no movement when already there.
#[inline]
fn step_toward(value: i64, toward: i64) -> i64 {
    value + (toward - value).signum()
}

/// Direction away from the healthy pole of `norm`. Neutral norms pick a side at random.
fn away_from_pole<R: Rng + ?Sized>(norm: i64, rng: &mut R) -> i64 {
    match healthy_pole(norm) {
        5 => -1,
        1 => 1,
        _ => random_sign(rng),
    }
}

/// Answer one question under `traits`.
pub fn strategic_answer<R: Rng + ?Sized>(question: &QuestionSpec, traits: &LiarTraits, rng: &mut R) -> i64 {
    let biased = clamp_likert(question.norm + traits.style_bias);
    let pole = healthy_pole(biased);

    let answer = match traits.strategy {
        LyingStrategy::Social => {
            let toward_pole = step_toward(biased, pole);
            let away = if biased == pole {
                step_toward(biased, LIKERT_NEUTRAL)
            } else {
                biased - (pole - biased).signum()
            };
            weighted_choice(&[biased, toward_pole, away], &[55, 35, 10], rng)
        }
        LyingStrategy::Defensive => {
            let hedged = step_toward(biased, LIKERT_NEUTRAL);
            weighted_choice(&[LIKERT_NEUTRAL, biased, hedged], &[50, 35, 15], rng)
        }
        LyingStrategy::OvercompensateContradict => {
            if question.contradictory {
                let dir = away_from_pole(biased, rng);
                let magnitude = weighted_choice(&[1, 2, 3], &[30, 60, 10], rng);
                biased + dir * magnitude
            } else {
                biased + weighted_choice(&[-1, 0, 1], &[15, 70, 15], rng)
            }
        }
        LyingStrategy::PlausibleRandom => {
            let lo = clamp_likert(biased - 2);
            let hi = clamp_likert(biased + 2);
            rng.random_range(lo..=hi)
        }
    };
    let answer = clamp_likert(answer);

    if traits.infected && chance(CONCEALMENT_SLIP, rng) {
        return clamp_likert(answer + sick_direction(question.norm, answer, rng));
    }
    answer
}

/// Unit direction toward the sick extreme of the true norm.
fn sick_direction<R: Rng + ?Sized>(norm: i64, answer: i64, rng: &mut R) -> i64 {
    match healthy_pole(norm) {
        5 => -1,
        1 => 1,
        _ if answer == LIKERT_NEUTRAL => random_sign(rng),
        _ => (answer - LIKERT_NEUTRAL).signum(),
    }
}

/// Draw traits, then answer every catalog question.
pub fn sample_strategic<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    infected: bool,
    rng: &mut R,
) -> (LiarTraits, AnswerSet) {
    let traits = LiarTraits::sample(infected, rng);
    let answers = catalog
        .questions()
        .iter()
        .map(|q| (q.id.as_str(), strategic_answer(q, &traits, rng)))
        .collect();
    (traits, answers)
}
