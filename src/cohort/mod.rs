//! Cross-sectional synthetic cohorts: one independent answer set per participant.
//!
//! - [`weighted`]: per-norm weight tables for truthful profiles and the flat liar
//! - [`strategies`]: mixture-of-strategies liar model
//!
//! Truthful profiles always sample from their weight table. Lying profiles
//! use the [`LyingModel`] selected by configuration; `Strategies` is the
//! default and `Uniform` is retained for comparison runs.

pub mod strategies;
pub mod weighted;

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::constants::{PARTICIPANT_ID_MAX, PARTICIPANT_ID_MIN};
use crate::error::Error;
use crate::types::{AnswerSet, ParticipantRecord, Profile};

pub use strategies::{sample_strategic, strategic_answer, LiarTraits, LyingStrategy};
pub use weighted::{sample_from_table, sample_uniform, HEALTHY_TRUTHFUL_WEIGHTS, INFECTED_TRUTHFUL_WEIGHTS};

/// How lying profiles answer in a single-shot cohort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyingModel {
    /// Flat weights on every question, independent of the norm.
    Uniform,
    /// Per-participant strategy and style bias.
    #[default]
    Strategies,
}

impl fmt::Display for LyingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LyingModel::Uniform => "uniform",
            LyingModel::Strategies => "strategies",
        })
    }
}

impl FromStr for LyingModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(LyingModel::Uniform),
            "strategies" => Ok(LyingModel::Strategies),
            other => Err(Error::Config(format!(
                "unknown lying model {other:?} (expected uniform or strategies)"
            ))),
        }
    }
}

/// One fresh answer set for `profile`.
pub fn generate_answers<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    profile: Profile,
    model: LyingModel,
    rng: &mut R,
) -> AnswerSet {
    match (profile, model) {
        (Profile::HealthyTruthful, _) => sample_from_table(catalog, &HEALTHY_TRUTHFUL_WEIGHTS, rng),
        (Profile::InfectedTruthful, _) => sample_from_table(catalog, &INFECTED_TRUTHFUL_WEIGHTS, rng),
        (Profile::HealthyLying | Profile::InfectedLying, LyingModel::Uniform) => {
            sample_uniform(catalog, rng)
        }
        (Profile::HealthyLying | Profile::InfectedLying, LyingModel::Strategies) => {
            sample_strategic(catalog, profile.is_infected(), rng).1
        }
    }
}

/// Profile of cohort participant `index`: HT, HL, IT, IL, repeating.
#[inline]
pub fn cycled_profile(index: usize) -> Profile {
    Profile::ALL[index % Profile::ALL.len()]
}

/// One baseline record: draws the 8-digit id first, then the answers.
pub fn generate_record<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    profile: Profile,
    model: LyingModel,
    rng: &mut R,
) -> ParticipantRecord {
    let id = rng.random_range(PARTICIPANT_ID_MIN..=PARTICIPANT_ID_MAX);
    let answers = generate_answers(catalog, profile, model, rng);
    ParticipantRecord::new(id, profile, answers, 1)
}

/// Generate `num_participants` baseline records in parallel.
///
/// Participant `i` has profile [`cycled_profile`]`(i)` and draws from
/// `SmallRng::seed_from_u64(seed.wrapping_add(i))`.
pub fn generate_cohort(
    catalog: &QuestionCatalog,
    num_participants: usize,
    seed: u64,
    model: LyingModel,
) -> Vec<ParticipantRecord> {
    (0..num_participants)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            generate_record(catalog, cycled_profile(i), model, &mut rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_answers;

    #[test]
    fn test_cohort_shape() {
        let cat = QuestionCatalog::builtin();
        let cohort = generate_cohort(&cat, 12, 42, LyingModel::Strategies);
        assert_eq!(cohort.len(), 12);
        for (i, rec) in cohort.iter().enumerate() {
            assert_eq!(rec.profile().unwrap(), cycled_profile(i));
            assert_eq!(rec.questionnaire_version, 1);
            assert!((PARTICIPANT_ID_MIN..=PARTICIPANT_ID_MAX).contains(&rec.id));
            assert_eq!(rec.answers.len(), cat.len());
            assert!(rec.answers.iter().all(|(_, v)| (1..=5).contains(&v)));
        }
    }

    #[test]
    fn test_cohort_deterministic() {
        let cat = QuestionCatalog::builtin();
        for model in [LyingModel::Uniform, LyingModel::Strategies] {
            let a = generate_cohort(&cat, 50, 7, model);
            let b = generate_cohort(&cat, 50, 7, model);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_infected_truthful_scores_sicker_than_healthy() {
        let cat = QuestionCatalog::builtin();
        let mut rng = SmallRng::seed_from_u64(5);
        let n = 500;
        let mean_health = |profile: Profile, rng: &mut SmallRng| {
            (0..n)
                .map(|_| {
                    let answers = generate_answers(&cat, profile, LyingModel::default(), rng);
                    score_answers(&cat, &answers).health_score
                })
                .sum::<f64>()
                / n as f64
        };
        let healthy = mean_health(Profile::HealthyTruthful, &mut rng);
        let infected = mean_health(Profile::InfectedTruthful, &mut rng);
        assert!(infected > healthy + 1.0, "healthy={healthy} infected={infected}");
    }

    #[test]
    fn test_lying_model_parse() {
        assert_eq!("uniform".parse::<LyingModel>().unwrap(), LyingModel::Uniform);
        assert_eq!("strategies".parse::<LyingModel>().unwrap(), LyingModel::Strategies);
        assert!("flat".parse::<LyingModel>().is_err());
        assert_eq!(LyingModel::default().to_string(), "strategies");
    }
}
