//! Core data structures: profiles, answer sets, participant records, and score vectors.
//!
//! [`ParticipantRecord`] is the persisted JSONL row. Its profile travels as the
//! raw `name` string so unrecognized labels survive a read/write cycle; the
//! typed [`Profile`] is obtained through [`ParticipantRecord::profile`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// One of the four latent respondent archetypes: {healthy, infected} × {truthful, lying}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "Healthy-Truthful")]
    HealthyTruthful,
    #[serde(rename = "Healthy-Lying")]
    HealthyLying,
    #[serde(rename = "Infected-Truthful")]
    InfectedTruthful,
    #[serde(rename = "Infected-Lying")]
    InfectedLying,
}

impl Profile {
    /// Fixed cycling order used by cohort generation.
    pub const ALL: [Profile; 4] = [
        Profile::HealthyTruthful,
        Profile::HealthyLying,
        Profile::InfectedTruthful,
        Profile::InfectedLying,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::HealthyTruthful => "Healthy-Truthful",
            Profile::HealthyLying => "Healthy-Lying",
            Profile::InfectedTruthful => "Infected-Truthful",
            Profile::InfectedLying => "Infected-Lying",
        }
    }

    pub fn is_infected(&self) -> bool {
        matches!(self, Profile::InfectedTruthful | Profile::InfectedLying)
    }

    pub fn is_lying(&self) -> bool {
        matches!(self, Profile::HealthyLying | Profile::InfectedLying)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownProfile(s.to_string()))
    }
}

/// Question id → integer response.
///
/// Values are not range-checked here: scoring skips anything outside 1..=5 and
/// evolution clamps on the first transition. On deserialization, non-integer
/// JSON values (strings, floats, null) are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerSet(BTreeMap<String, i64>);

impl AnswerSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, qid: &str) -> Option<i64> {
        self.0.get(qid).copied()
    }

    pub fn insert(&mut self, qid: impl Into<String>, value: i64) {
        self.0.insert(qid.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(qid, v)| v.as_i64().map(|n| (qid, n)))
            .collect())
    }
}

fn default_questionnaire_version() -> u32 {
    1
}

fn unknown_profile_label() -> String {
    "Unknown".to_string()
}

/// One administration of the questionnaire to one participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: u64,
    /// Raw profile label, e.g. `"Infected-Truthful"`.
    #[serde(default = "unknown_profile_label")]
    pub name: String,
    /// A missing key reads as no answers; evolution then starts from the norms.
    #[serde(default)]
    pub answers: AnswerSet,
    /// Week index; 1 is the baseline.
    #[serde(default = "default_questionnaire_version")]
    pub questionnaire_version: u32,
}

impl ParticipantRecord {
    pub fn new(id: u64, profile: Profile, answers: AnswerSet, questionnaire_version: u32) -> Self {
        Self {
            id,
            name: profile.as_str().to_string(),
            answers,
            questionnaire_version,
        }
    }

    pub fn profile(&self) -> Result<Profile, Error> {
        self.name.parse()
    }

    /// Interpret an already-parsed JSON row. Extra fields are ignored.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        ParticipantRecord::deserialize(value)
    }
}

/// Continuous signals for one answer set. NaN marks an undefined metric and
/// serializes as JSON `null`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ScoreVector {
    pub health_score: f64,
    pub extreme_score: f64,
    pub lie_score: f64,
    pub entropy: f64,
    pub dev_contradictory: f64,
    pub dev_noncontradictory: f64,
}

impl ScoreVector {
    pub const UNDEFINED: ScoreVector = ScoreVector {
        health_score: f64::NAN,
        extreme_score: f64::NAN,
        lie_score: f64::NAN,
        entropy: f64::NAN,
        dev_contradictory: f64::NAN,
        dev_noncontradictory: f64::NAN,
    };
}

/// Boolean decisions derived from a [`ScoreVector`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub sick: bool,
    pub lying: bool,
}

/// Per-record output of the scoring pass.
#[derive(Clone, Debug, Serialize)]
pub struct ScoredRecord {
    pub id: u64,
    pub name: String,
    pub questionnaire_version: u32,
    pub scores: ScoreVector,
    pub flags: Flags,
}
