//! Per-question response distributions across a corpus.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{is_valid_likert, LIKERT_LABELS, LIKERT_LEVELS};
use crate::types::ParticipantRecord;

#[derive(Clone, Debug, Serialize)]
pub struct QuestionStatistics {
    pub id: String,
    pub n: usize,
    /// Counts of values 1..=5.
    pub counts: [usize; LIKERT_LEVELS],
    pub mean: f64,
    pub median: f64,
    /// Sample std; 0.0 with fewer than two answers.
    pub std_dev: f64,
}

impl QuestionStatistics {
    fn from_values(id: &str, mut values: Vec<i64>) -> Self {
        let n = values.len();
        let mut counts = [0usize; LIKERT_LEVELS];
        for &v in &values {
            counts[(v - 1) as usize] += 1;
        }

        let (mean, median) = if n == 0 {
            (f64::NAN, f64::NAN)
        } else {
            values.sort_unstable();
            let mean = values.iter().sum::<i64>() as f64 / n as f64;
            let median = if n % 2 == 1 {
                values[n / 2] as f64
            } else {
                (values[n / 2 - 1] + values[n / 2]) as f64 / 2.0
            };
            (mean, median)
        };

        let std_dev = if n < 2 {
            0.0
        } else {
            let var = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        };

        Self {
            id: id.to_string(),
            n,
            counts,
            mean,
            median,
            std_dev,
        }
    }

    /// Label of the most frequent value; ties go to the lower value.
    pub fn mode_label(&self) -> Option<&'static str> {
        if self.n == 0 {
            return None;
        }
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        Some(LIKERT_LABELS[best])
    }

    /// Compact `1:a, 2:b, ...` rendering of the counts.
    pub fn distribution_string(&self) -> String {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}:{}", i + 1, c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collect every valid (1..=5) answer per question id, sorted by id.
///
/// Not restricted to a catalog: any id present in the records is reported.
pub fn question_statistics(records: &[ParticipantRecord]) -> Vec<QuestionStatistics> {
    let mut by_question: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for r in records {
        for (qid, v) in r.answers.iter() {
            if is_valid_likert(v) {
                by_question.entry(qid).or_default().push(v);
            }
        }
    }
    by_question
        .into_iter()
        .map(|(qid, values)| QuestionStatistics::from_values(qid, values))
        .collect()
}
