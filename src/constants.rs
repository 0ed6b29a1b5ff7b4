//! Questionnaire constants and Likert-scale helpers.
//!
//! - Likert scale: [`LIKERT_MIN`]..=[`LIKERT_MAX`] (1 = strongly disagree, 5 = strongly agree)
//! - Built-in catalog: [`QUESTION_COUNT`] = 24 questions, see [`QUESTIONS`]
//! - Batch defaults: [`DEFAULT_WEEKS`], [`DEFAULT_EVOLVE_SEED`], [`DEFAULT_COHORT_SEED`]

/// Lowest Likert response.
pub const LIKERT_MIN: i64 = 1;

/// Highest Likert response.
pub const LIKERT_MAX: i64 = 5;

/// Neutral midpoint of the scale.
pub const LIKERT_NEUTRAL: i64 = 3;

/// Number of distinct Likert values.
pub const LIKERT_LEVELS: usize = 5;

/// Human-readable labels, indexed by `value - 1`.
pub const LIKERT_LABELS: [&str; LIKERT_LEVELS] = [
    "Strongly disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly agree",
];

/// Number of questions in the built-in catalog.
pub const QUESTION_COUNT: usize = 24;

/// Built-in catalog: (id, healthy norm, contradictory).
pub const QUESTIONS: [(&str, i64, bool); QUESTION_COUNT] = [
    ("q1", 2, false),
    ("q2", 1, false),
    ("q3", 5, true),
    ("q4", 1, false),
    ("q5", 5, true),
    ("q6", 2, false),
    ("q7", 2, false),
    ("q8", 1, false),
    ("q9", 2, false),
    ("q10", 4, true),
    ("q11", 4, false),
    ("q12", 1, false),
    ("q13", 1, false),
    ("q14", 5, true),
    ("q15", 1, false),
    ("q16", 1, false),
    ("q17", 1, false),
    ("q18", 3, false),
    ("q19", 2, false),
    ("q20", 1, false),
    ("q21", 1, false),
    ("q22", 1, false),
    ("q23", 1, true),
    ("q24", 2, false),
];

/// Total administrations per participant in a longitudinal run (week 1..=5).
pub const DEFAULT_WEEKS: u32 = 5;

/// Master seed for longitudinal evolution.
pub const DEFAULT_EVOLVE_SEED: u64 = 12345;

/// Master seed for cross-sectional cohort generation.
pub const DEFAULT_COHORT_SEED: u64 = 42;

/// Synthetic participant ids are drawn from this 8-digit range.
pub const PARTICIPANT_ID_MIN: u64 = 10_000_000;
pub const PARTICIPANT_ID_MAX: u64 = 99_999_999;

/// Clamp any integer onto the Likert scale.
#[inline(always)]
pub fn clamp_likert(v: i64) -> i64 {
    v.clamp(LIKERT_MIN, LIKERT_MAX)
}

/// True if `v` is a valid Likert response.
#[inline(always)]
pub fn is_valid_likert(v: i64) -> bool {
    (LIKERT_MIN..=LIKERT_MAX).contains(&v)
}

/// The extreme a norm leans toward: 5 for norms 4–5, 1 for norms 1–2, 3 for a neutral norm.
#[inline]
pub fn healthy_pole(norm: i64) -> i64 {
    if norm >= 4 {
        LIKERT_MAX
    } else if norm <= 2 {
        LIKERT_MIN
    } else {
        LIKERT_NEUTRAL
    }
}
