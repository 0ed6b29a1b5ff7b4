//! Longitudinal answer evolution.
//!
//! - [`rules`]: per-profile transition rules and their tunable probabilities
//! - [`engine`]: trajectories, per-participant state, and batch evolution

pub mod engine;
pub mod rules;

pub use engine::{
    carry_forward, evolve_answers, evolve_cohort, evolve_participant, EvolutionBatch,
    ParticipantState, ProfileAnomaly,
};
pub use rules::{infected_target, ProfileRule, StepContext, TransitionParams, TransitionRule};
