//! Question catalog: id → (norm, contradictory).
//!
//! The same catalog instance must back both generation and scoring. Lookups on
//! an unknown id return `None` ("no signal") rather than failing.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{is_valid_likert, QUESTIONS};
use crate::error::{Error, Result};

/// One questionnaire item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: String,
    /// Response expected from a healthy, truthful respondent (1..=5).
    pub norm: i64,
    /// Item phrased against the naive reading of the scale.
    #[serde(default)]
    pub contradictory: bool,
}

/// Ordered, immutable set of questions with O(1) id lookup.
#[derive(Clone, Debug)]
pub struct QuestionCatalog {
    questions: Vec<QuestionSpec>,
    index: HashMap<String, usize>,
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestionCatalog {
    /// The 24-item questionnaire.
    pub fn builtin() -> Self {
        let questions = QUESTIONS
            .iter()
            .map(|&(id, norm, contradictory)| QuestionSpec {
                id: id.to_string(),
                norm,
                contradictory,
            })
            .collect();
        Self::from_specs_unchecked(questions)
    }

    /// Build a catalog, validating ids and norms.
    pub fn new(questions: Vec<QuestionSpec>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::InvalidCatalog("catalog has no questions".into()));
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if q.id.is_empty() {
                return Err(Error::InvalidCatalog("empty question id".into()));
            }
            if !seen.insert(q.id.as_str()) {
                return Err(Error::InvalidCatalog(format!("duplicate question id {}", q.id)));
            }
            if !is_valid_likert(q.norm) {
                return Err(Error::InvalidCatalog(format!(
                    "question {} has norm {} outside 1..=5",
                    q.id, q.norm
                )));
            }
        }
        Ok(Self::from_specs_unchecked(questions))
    }

    /// Load a JSON array of [`QuestionSpec`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let questions: Vec<QuestionSpec> = serde_json::from_str(&raw)?;
        Self::new(questions)
    }

    fn from_specs_unchecked(questions: Vec<QuestionSpec>) -> Self {
        let index = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();
        Self { questions, index }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, qid: &str) -> Option<&QuestionSpec> {
        self.index.get(qid).map(|&i| &self.questions[i])
    }

    pub fn norm(&self, qid: &str) -> Option<i64> {
        self.get(qid).map(|q| q.norm)
    }

    pub fn is_contradictory(&self, qid: &str) -> Option<bool> {
        self.get(qid).map(|q| q.contradictory)
    }

    /// Question ids in catalog order.
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }

    /// Questions in catalog order. All stochastic passes walk this order.
    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }
}
