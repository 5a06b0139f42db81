//! Simulation configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{EngineError, Result};
use crate::rules::{EvaluationSettings, DEFAULT_SHORT_CIRCUIT_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Clock time of the first frame, as HHMM.
    pub start_time: u32,
    /// Minutes added to the clock per tick.
    pub timestep: u32,
    pub frames: u32,
    /// Random seed. The current UNIX time when absent.
    pub seed: Option<u64>,
    pub short_circuit_threshold: f64,
    pub allow_duplicate_bindings: bool,
    pub rules: PathBuf,
    pub initial_conditions: PathBuf,
    pub lexicon: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_time: 1700,
            timestep: 10,
            frames: 30,
            seed: None,
            short_circuit_threshold: DEFAULT_SHORT_CIRCUIT_THRESHOLD,
            allow_duplicate_bindings: true,
            rules: PathBuf::from("content/rules.txt"),
            initial_conditions: PathBuf::from("content/initial_conditions.txt"),
            lexicon: PathBuf::from("content/lexicon.txt"),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Load a config file. Relative content paths are resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            for content in [&mut config.rules, &mut config.initial_conditions, &mut config.lexicon] {
                if content.is_relative() {
                    *content = base.join(&*content);
                }
            }
        }
        Ok(config)
    }

    /// Reject a zero timestep, a bad start time or a non-positive threshold.
    pub fn validate(&self) -> Result<()> {
        if self.timestep == 0 {
            return Err(EngineError::Config("timestep must be at least one minute".to_string()));
        }
        if self.start_time % 100 >= 60 || self.start_time > 2400 {
            return Err(EngineError::Config(format!(
                "start_time {} is not a valid HHMM clock time",
                self.start_time
            )));
        }
        if self.short_circuit_threshold.is_nan() || self.short_circuit_threshold <= 0.0 {
            return Err(EngineError::Config(
                "short_circuit_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Evaluation settings for rule tests.
    pub fn settings(&self) -> EvaluationSettings {
        EvaluationSettings {
            short_circuit_threshold: self.short_circuit_threshold,
            allow_duplicate_bindings: self.allow_duplicate_bindings,
        }
    }

    /// The configured seed, or the current Unix time in seconds.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = SimulationConfig::from_toml_str("frames = 5\nseed = 42\n").unwrap();
        assert_eq!(config.frames, 5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.start_time, 1700);
        assert_eq!(config.timestep, 10);
        assert_eq!(config.settings(), EvaluationSettings::default());
        assert_eq!(config.resolve_seed(), 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimulationConfig {
            timestep: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        config.timestep = 10;
        config.start_time = 1775;
        assert!(config.validate().is_err());

        config.start_time = 1700;
        config.short_circuit_threshold = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mistyped_field_is_an_error() {
        assert!(SimulationConfig::from_toml_str("frames = \"many\"").is_err());
    }
}
