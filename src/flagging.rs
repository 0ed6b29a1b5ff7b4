//! Threshold rules turning a [`ScoreVector`] into [`Flags`].
//!
//! - sick: `health_score ≥ sick_health` OR `extreme_score ≥ sick_extreme`
//! - lying: `lie_score ≥ lying_lie` OR `entropy ≥ lying_entropy`
//!
//! A predicate whose inputs include a NaN is false. The defaults are
//! conservative starting points and can be overridden from the simulation
//! config file.

use serde::{Deserialize, Serialize};

use crate::types::{Flags, ScoreVector};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlagThresholds {
    pub sick_health: f64,
    pub sick_extreme: f64,
    pub lying_lie: f64,
    pub lying_entropy: f64,
}

impl Default for FlagThresholds {
    fn default() -> Self {
        Self {
            sick_health: 1.25,
            sick_extreme: 1.0,
            lying_lie: 0.60,
            lying_entropy: 2.05,
        }
    }
}

impl FlagThresholds {
    pub fn flag_sick(&self, s: &ScoreVector) -> bool {
        if s.health_score.is_nan() || s.extreme_score.is_nan() {
            return false;
        }
        s.health_score >= self.sick_health || s.extreme_score >= self.sick_extreme
    }

    pub fn flag_lying(&self, s: &ScoreVector) -> bool {
        if s.lie_score.is_nan() || s.entropy.is_nan() {
            return false;
        }
        s.lie_score >= self.lying_lie || s.entropy >= self.lying_entropy
    }

    pub fn flags(&self, s: &ScoreVector) -> Flags {
        Flags {
            sick: self.flag_sick(s),
            lying: self.flag_lying(s),
        }
    }
}
