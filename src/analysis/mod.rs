//! Corpus-level reductions for reporting.
//!
//! - [`statistics`]: (profile, week) groups of scores and flag rates
//! - [`questions`]: per-question response distributions

pub mod questions;
pub mod statistics;

pub use questions::{question_statistics, QuestionStatistics};
pub use statistics::{aggregate_scores, mean_std, save_report, AggregateReport, GroupStatistics, MeanStd};
