//! Longitudinal evolution: one baseline answer set becomes N weekly answer sets.
//!
//! Week 1 is the baseline as given. Each later week applies the participant's
//! [`ProfileRule`] to every catalog question independently, reading the
//! previous week's value (or the norm when the question was never answered).
//!
//! Draw order for one participant is fixed: Infected-Truthful targets in
//! catalog order first, then week-major, question-major transitions.
//!
//! ## Batch mode
//!
//! [`evolve_cohort`] runs participants in parallel. Participant `i` draws from
//! its own `SmallRng` seeded with `seed.wrapping_add(i)`, so the output is
//! identical for a given seed regardless of the thread count.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::QuestionCatalog;
use crate::types::{AnswerSet, ParticipantRecord, Profile};

use super::rules::{infected_target, ProfileRule, StepContext, TransitionParams, TransitionRule};

/// Rolling state of one participant during generation.
///
/// Owned by exactly one generation task and dropped when the trajectory is
/// emitted. `current` and `targets` are indexed in catalog order.
pub struct ParticipantState<'a> {
    catalog: &'a QuestionCatalog,
    rule: ProfileRule,
    targets: Option<Vec<i64>>,
    current: Vec<i64>,
}

impl<'a> ParticipantState<'a> {
    /// Seed state from a baseline. Draws Infected-Truthful targets immediately.
    pub fn new<R: Rng + ?Sized>(
        catalog: &'a QuestionCatalog,
        profile: Profile,
        baseline: &AnswerSet,
        params: &TransitionParams,
        rng: &mut R,
    ) -> Self {
        let targets = (profile == Profile::InfectedTruthful).then(|| {
            catalog
                .questions()
                .iter()
                .map(|q| infected_target(q.norm, rng))
                .collect()
        });
        Self {
            catalog,
            rule: ProfileRule::new(profile, params),
            targets,
            current: starting_values(catalog, baseline),
        }
    }

    /// Fixed target of question `index`, if this participant has targets.
    pub fn target(&self, index: usize) -> Option<i64> {
        self.targets.as_ref().map(|t| t[index])
    }

    /// Advance one week and return the new answer set.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> AnswerSet {
        for (i, q) in self.catalog.questions().iter().enumerate() {
            let ctx = StepContext {
                norm: q.norm,
                target: self.target(i),
            };
            self.current[i] = self.rule.next(self.current[i], &ctx, rng);
        }
        self.snapshot()
    }

    fn snapshot(&self) -> AnswerSet {
        self.catalog
            .all_ids()
            .zip(self.current.iter().copied())
            .collect()
    }
}

/// Previous values for the first transition: baseline answer, else the norm.
fn starting_values(catalog: &QuestionCatalog, baseline: &AnswerSet) -> Vec<i64> {
    catalog
        .questions()
        .iter()
        .map(|q| baseline.get(&q.id).unwrap_or(q.norm))
        .collect()
}

/// Produce `weeks` answer sets (baseline included as week 1).
///
/// `weeks == 0` yields an empty trajectory.
pub fn evolve_answers<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    profile: Profile,
    baseline: &AnswerSet,
    weeks: u32,
    params: &TransitionParams,
    rng: &mut R,
) -> Vec<AnswerSet> {
    if weeks == 0 {
        return Vec::new();
    }
    let mut state = ParticipantState::new(catalog, profile, baseline, params, rng);
    let mut attempts = Vec::with_capacity(weeks as usize);
    attempts.push(baseline.clone());
    for _ in 2..=weeks {
        attempts.push(state.step(rng));
    }
    attempts
}

/// Fallback trajectory for an unrecognized profile: every week repeats the
/// previous values unchanged (missing questions start at the norm).
pub fn carry_forward(catalog: &QuestionCatalog, baseline: &AnswerSet, weeks: u32) -> Vec<AnswerSet> {
    if weeks == 0 {
        return Vec::new();
    }
    let held: AnswerSet = catalog
        .all_ids()
        .zip(starting_values(catalog, baseline))
        .collect();
    let mut attempts = Vec::with_capacity(weeks as usize);
    attempts.push(baseline.clone());
    for _ in 2..=weeks {
        attempts.push(held.clone());
    }
    attempts
}

/// A baseline whose profile label did not resolve to a known [`Profile`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileAnomaly {
    pub id: u64,
    pub label: String,
}

/// Output of a batch evolution run.
pub struct EvolutionBatch {
    /// One record per (id, week), participant-major then week-major.
    pub records: Vec<ParticipantRecord>,
    /// Participants that fell back to carry-forward.
    pub anomalies: Vec<ProfileAnomaly>,
}

/// Evolve one participant with its own generator.
pub fn evolve_participant<R: Rng + ?Sized>(
    catalog: &QuestionCatalog,
    baseline: &ParticipantRecord,
    weeks: u32,
    params: &TransitionParams,
    rng: &mut R,
) -> (Vec<ParticipantRecord>, Option<ProfileAnomaly>) {
    let (attempts, anomaly) = match baseline.profile() {
        Ok(profile) => (
            evolve_answers(catalog, profile, &baseline.answers, weeks, params, rng),
            None,
        ),
        Err(_) => {
            tracing::warn!(
                id = baseline.id,
                label = %baseline.name,
                "unknown profile label; carrying baseline forward unchanged"
            );
            (
                carry_forward(catalog, &baseline.answers, weeks),
                Some(ProfileAnomaly {
                    id: baseline.id,
                    label: baseline.name.clone(),
                }),
            )
        }
    };

    let records = attempts
        .into_iter()
        .enumerate()
        .map(|(week_idx, answers)| ParticipantRecord {
            id: baseline.id,
            name: baseline.name.clone(),
            answers,
            questionnaire_version: week_idx as u32 + 1,
        })
        .collect();
    (records, anomaly)
}

/// Evolve every baseline in parallel, preserving input order.
pub fn evolve_cohort(
    catalog: &QuestionCatalog,
    baselines: &[ParticipantRecord],
    weeks: u32,
    seed: u64,
    params: &TransitionParams,
) -> EvolutionBatch {
    let per_participant: Vec<(Vec<ParticipantRecord>, Option<ProfileAnomaly>)> = baselines
        .par_iter()
        .enumerate()
        .map(|(i, baseline)| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            evolve_participant(catalog, baseline, weeks, params, &mut rng)
        })
        .collect();

    let mut records = Vec::with_capacity(baselines.len() * weeks as usize);
    let mut anomalies = Vec::new();
    for (rows, anomaly) in per_participant {
        records.extend(rows);
        anomalies.extend(anomaly);
    }
    EvolutionBatch { records, anomalies }
}
