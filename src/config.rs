//! JSON simulation config shared by every binary (`--config PATH`).
//!
//! Every field is optional; anything left out keeps its built-in default, so
//! `{}` and a missing file argument are equivalent.
//!
//! ```json
//! {
//!   "catalog": "questions.json",
//!   "lying_model": "uniform",
//!   "thresholds": { "lying_entropy": 2.1 },
//!   "transitions": { "healthy_pull": 0.2 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::cohort::LyingModel;
use crate::error::{Error, Result};
use crate::evolution::TransitionParams;
use crate::flagging::FlagThresholds;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub transitions: TransitionParams,
    pub thresholds: FlagThresholds,
    pub lying_model: LyingModel,
    /// Question catalog file; the built-in 24-question catalog when absent.
    /// Relative paths resolve against the config file's directory.
    pub catalog: Option<PathBuf>,
}

impl SimulationConfig {
    /// Parse a config file, or return the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded simulation config");
        Ok(config)
    }

    /// Reject probabilities outside [0, 1] and weight tables that sum to zero
    /// or past `u32::MAX`.
    pub fn validate(&self) -> Result<()> {
        let t = &self.transitions;
        let probabilities = [
            ("healthy_pull", t.healthy_pull),
            ("lying_jump", t.lying_jump),
            ("infected_wobble", t.infected_wobble),
            ("infected_stall", t.infected_stall),
            ("infected_overshoot", t.infected_overshoot),
            ("infected_lying_uniform", t.infected_lying_uniform),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Config(format!(
                    "transitions.{name} must be in [0, 1], got {p}"
                )));
            }
        }
        if t.infected_stall + t.infected_overshoot > 1.0 {
            return Err(Error::Config(
                "transitions.infected_stall + infected_overshoot exceeds 1".into(),
            ));
        }
        let weights: [(&str, &[u32]); 3] = [
            ("healthy_step_weights", &t.healthy_step_weights),
            ("lying_jump_weights", &t.lying_jump_weights),
            ("infected_lying_weights", &t.infected_lying_weights),
        ];
        for (name, w) in weights {
            match w.iter().try_fold(0u32, |acc, &x| acc.checked_add(x)) {
                Some(0) => {
                    return Err(Error::Config(format!("transitions.{name} sums to zero")));
                }
                None => {
                    return Err(Error::Config(format!("transitions.{name} overflows u32")));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<QuestionCatalog> {
        match &self.catalog {
            Some(path) => QuestionCatalog::from_json_file(path),
            None => Ok(QuestionCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_default() {
        let config = SimulationConfig::load(None).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.lying_model, LyingModel::Strategies);
        assert_eq!(config.catalog().unwrap().len(), 24);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(
            &path,
            r#"{"lying_model": "uniform", "thresholds": {"sick_health": 1.5}}"#,
        )
        .unwrap();
        let config = SimulationConfig::load(Some(&path)).unwrap();
        assert_eq!(config.lying_model, LyingModel::Uniform);
        assert_eq!(config.thresholds.sick_health, 1.5);
        assert_eq!(config.thresholds.lying_lie, 0.60);
        assert_eq!(config.transitions, TransitionParams::default());
    }

    #[test]
    fn test_relative_catalog_resolves_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("q.json"),
            r#"[{"id": "a", "norm": 2}, {"id": "b", "norm": 4, "contradictory": true}]"#,
        )
        .unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(&path, r#"{"catalog": "q.json"}"#).unwrap();
        let catalog = SimulationConfig::load(Some(&path)).unwrap().catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.is_contradictory("b"), Some(true));
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");

        std::fs::write(&path, r#"{"transitions": {"healthy_pull": 1.5}}"#).unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"transitions": {"lying_jump_weights": [0, 0, 0, 0, 0]}}"#)
            .unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"lying_model": "flat"}"#).unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"threshold": {}}"#).unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_overflowing_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(
            &path,
            r#"{"transitions": {"healthy_step_weights": [4294967295, 1, 0]}}"#,
        )
        .unwrap();
        match SimulationConfig::load(Some(&path)) {
            Err(Error::Config(msg)) => assert!(msg.contains("healthy_step_weights"), "{msg}"),
            other => panic!("expected Config error, got {other:?}"),
        }

        std::fs::write(
            &path,
            r#"{"transitions": {"healthy_step_weights": [4294967295, 0, 0]}}"#,
        )
        .unwrap();
        assert!(SimulationConfig::load(Some(&path)).is_ok());
    }

    #[test]
    fn test_rejects_unknown_nested_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");

        std::fs::write(&path, r#"{"thresholds": {"sick_helth": 2.0}}"#).unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"transitions": {"healthy_pul": 0.2}}"#).unwrap();
        assert!(matches!(SimulationConfig::load(Some(&path)), Err(Error::Config(_))));
    }
}
