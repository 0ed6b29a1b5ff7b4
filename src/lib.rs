//! # Survey Sim: Synthetic Survey Cohorts and Response Scoring
//!
//! Generates synthetic questionnaire answers for four respondent archetypes,
//! evolves them across repeated weekly administrations, and scores every
//! answer set for symptom severity and answer inconsistency.
//!
//! ## Pipeline
//!
//! | Stage | Rust module | Description |
//! |-------|-------------|-------------|
//! | 0 | [`catalog`] | Question ids, healthy norms and contradictory markers |
//! | 1 | [`cohort`] | One week-1 answer set per participant (weighted tables, strategic liars) |
//! | 2 | [`evolution`] | Weeks 2..N from per-profile transition rules |
//! | 3 | [`scoring`] + [`flagging`] | Six metrics per answer set, then sick/lying flags |
//! | 4 | [`analysis`] | Mean ± std per (profile, week), per-question distributions |
//!
//! Records move between stages as JSONL ([`storage`]).
//!
//! ## Profiles
//!
//! {healthy, infected} × {truthful, lying}. Each variant of
//! [`types::Profile`] owns one transition handler in [`evolution::rules`].
//!
//! ## Determinism
//!
//! Every draw comes from an explicit `SmallRng`. Batch runs seed participant
//! `i` with `seed.wrapping_add(i)` and collect in input order, so the output
//! does not depend on the rayon thread count.

pub mod analysis;
pub mod catalog;
pub mod cohort;
pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod evolution;
pub mod flagging;
pub mod sampling;
pub mod scoring;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
