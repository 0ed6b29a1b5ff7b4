//! Per-profile transition rules: previous answer → next answer for one question.
//!
//! Each profile has its own handler type implementing [`TransitionRule`].
//! [`ProfileRule`] is the closed dispatch over them, built from a [`Profile`]
//! and the tunable [`TransitionParams`]. All outputs are clamped to 1..=5.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::clamp_likert;
use crate::sampling::{chance, random_sign, uniform_likert, weighted_choice, weighted_likert};
use crate::types::Profile;

/// Per-question inputs to a transition beyond the previous value.
#[derive(Clone, Copy, Debug)]
pub struct StepContext {
    pub norm: i64,
    /// Fixed per-participant target; only set for Infected-Truthful.
    pub target: Option<i64>,
}

/// Tunable probabilities of the four transition rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionParams {
    /// Healthy-Truthful: weights of steps −1, 0, +1.
    pub healthy_step_weights: [u32; 3],
    /// Healthy-Truthful: chance of a one-unit pull toward the norm.
    pub healthy_pull: f64,
    /// Healthy-Lying: chance of a weighted jump instead of a fresh uniform answer.
    pub lying_jump: f64,
    /// Healthy-Lying: weights of jumps −2..=+2.
    pub lying_jump_weights: [u32; 5],
    /// Infected-Truthful at target: chance of a one-unit wobble.
    pub infected_wobble: f64,
    /// Infected-Truthful off target: chance of no movement.
    pub infected_stall: f64,
    /// Infected-Truthful off target: chance of a two-unit step.
    pub infected_overshoot: f64,
    /// Infected-Lying: chance of a uniform answer instead of the extreme-heavy draw.
    pub infected_lying_uniform: f64,
    /// Infected-Lying: weights of values 1..=5 for the extreme-heavy draw.
    pub infected_lying_weights: [u32; 5],
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            healthy_step_weights: [10, 80, 10],
            healthy_pull: 0.15,
            lying_jump: 0.60,
            lying_jump_weights: [15, 20, 30, 20, 15],
            infected_wobble: 0.05,
            infected_stall: 0.10,
            infected_overshoot: 0.05,
            infected_lying_uniform: 0.70,
            infected_lying_weights: [35, 10, 10, 10, 35],
        }
    }
}

/// `next(prev, ctx, rng) -> next` for one question and one week.
pub trait TransitionRule {
    fn next<R: Rng + ?Sized>(&self, prev: i64, ctx: &StepContext, rng: &mut R) -> i64;
}

/// Low-amplitude random walk with a weak pull back to the norm.
pub struct HealthyTruthful {
    pub step_weights: [u32; 3],
    pub pull: f64,
}

impl TransitionRule for HealthyTruthful {
    fn next<R: Rng + ?Sized>(&self, prev: i64, ctx: &StepContext, rng: &mut R) -> i64 {
        let delta = weighted_choice(&[-1, 0, 1], &self.step_weights, rng);
        let mut candidate = clamp_likert(prev + delta);
        if candidate != ctx.norm && chance(self.pull, rng) {
            candidate += if candidate > ctx.norm { -1 } else { 1 };
        }
        clamp_likert(candidate)
    }
}

/// Erratic jumps, or history discarded entirely.
pub struct HealthyLying {
    pub jump: f64,
    pub jump_weights: [u32; 5],
}

impl TransitionRule for HealthyLying {
    fn next<R: Rng + ?Sized>(&self, prev: i64, _ctx: &StepContext, rng: &mut R) -> i64 {
        if chance(self.jump, rng) {
            let delta = weighted_choice(&[-2, -1, 0, 1, 2], &self.jump_weights, rng);
            return clamp_likert(prev + delta);
        }
        uniform_likert(rng)
    }
}

/// Drift toward the participant's fixed sick extreme, then settle there.
pub struct InfectedTruthful {
    pub wobble: f64,
    pub stall: f64,
    pub overshoot: f64,
}

impl TransitionRule for InfectedTruthful {
    fn next<R: Rng + ?Sized>(&self, prev: i64, ctx: &StepContext, rng: &mut R) -> i64 {
        // Without a target there is nothing to drift toward.
        let Some(target) = ctx.target else {
            return clamp_likert(prev);
        };

        if prev == target {
            if chance(self.wobble, rng) {
                return clamp_likert(prev + random_sign(rng));
            }
            return prev;
        }

        let step = if prev > target { -1 } else { 1 };
        let u: f64 = rng.random();
        let candidate = if u < self.stall {
            prev
        } else if u > 1.0 - self.overshoot {
            prev + 2 * step
        } else {
            prev + step
        };
        clamp_likert(candidate)
    }
}

/// Mostly uniform, otherwise biased to the scale extremes.
pub struct InfectedLying {
    pub uniform: f64,
    pub weights: [u32; 5],
}

impl TransitionRule for InfectedLying {
    fn next<R: Rng + ?Sized>(&self, _prev: i64, _ctx: &StepContext, rng: &mut R) -> i64 {
        if chance(self.uniform, rng) {
            return uniform_likert(rng);
        }
        weighted_likert(&self.weights, rng)
    }
}

/// Closed dispatch over the four handlers.
pub enum ProfileRule {
    HealthyTruthful(HealthyTruthful),
    HealthyLying(HealthyLying),
    InfectedTruthful(InfectedTruthful),
    InfectedLying(InfectedLying),
}

impl ProfileRule {
    pub fn new(profile: Profile, params: &TransitionParams) -> Self {
        match profile {
            Profile::HealthyTruthful => ProfileRule::HealthyTruthful(HealthyTruthful {
                step_weights: params.healthy_step_weights,
                pull: params.healthy_pull,
            }),
            Profile::HealthyLying => ProfileRule::HealthyLying(HealthyLying {
                jump: params.lying_jump,
                jump_weights: params.lying_jump_weights,
            }),
            Profile::InfectedTruthful => ProfileRule::InfectedTruthful(InfectedTruthful {
                wobble: params.infected_wobble,
                stall: params.infected_stall,
                overshoot: params.infected_overshoot,
            }),
            Profile::InfectedLying => ProfileRule::InfectedLying(InfectedLying {
                uniform: params.infected_lying_uniform,
                weights: params.infected_lying_weights,
            }),
        }
    }
}

impl TransitionRule for ProfileRule {
    #[inline]
    fn next<R: Rng + ?Sized>(&self, prev: i64, ctx: &StepContext, rng: &mut R) -> i64 {
        match self {
            ProfileRule::HealthyTruthful(r) => r.next(prev, ctx, rng),
            ProfileRule::HealthyLying(r) => r.next(prev, ctx, rng),
            ProfileRule::InfectedTruthful(r) => r.next(prev, ctx, rng),
            ProfileRule::InfectedLying(r) => r.next(prev, ctx, rng),
        }
    }
}

/// Sick extreme for a norm: 1 for high norms, 5 for low norms, either for a neutral norm.
pub fn infected_target<R: Rng + ?Sized>(norm: i64, rng: &mut R) -> i64 {
    if norm >= 4 {
        1
    } else if norm <= 2 {
        5
    } else if rng.random::<bool>() {
        5
    } else {
        1
    }
}
