//! Process-wide classifier configuration.
//!
//! A [`FamConfig`] bundles the threshold tunables, the recovery likelihood
//! table and the hysteresis window capacity. It is loaded once (usually from a
//! JSON file), validated, and then shared immutably between machines.

use crate::core::{LikelihoodTable, StateLabel, Thresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;
use tracing::{debug, warn};

/// Default hysteresis window capacity.
pub const DEFAULT_WINDOW_CAPACITY: usize = 3;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("threshold '{name}' must be finite and positive, got {value}")]
    NonPositiveThreshold { name: &'static str, value: f64 },

    #[error("gazing angle must lie in (0, 90] degrees, got {0}")]
    GazingAngleOutOfRange(f64),

    #[error("likelihood of {candidate} after {previous} must lie in [0, 1], got {value}")]
    LikelihoodOutOfRange {
        previous: StateLabel,
        candidate: StateLabel,
        value: f64,
    },

    #[error("hysteresis window capacity must be at least 1")]
    ZeroWindowCapacity,
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in config: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {}", format_violations(.violations))]
    Invalid { violations: Vec<ConfigViolation> },
}

fn format_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tunables, likelihood table and window capacity for a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamConfig {
    pub thresholds: Thresholds,
    pub likelihood: LikelihoodTable,
    pub window_capacity: usize,
}

impl Default for FamConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            likelihood: LikelihoodTable::default(),
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl FamConfig {
    /// Parse and validate a configuration from JSON. Missing sections take
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FamConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.check()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json_str(&contents)?;
        debug!(
            target: "fam.config",
            path = %path.display(),
            window_capacity = config.window_capacity,
            walk_stay_threshold = config.thresholds.walk_stay_threshold,
            distance_scale = config.thresholds.distance_scale,
            "loaded configuration"
        );
        Ok(config)
    }

    /// Check every tunable, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = self
            .thresholds
            .named_values()
            .into_iter()
            .map(|(name, value)| {
                if value.is_finite() && value > 0.0 {
                    Validation::success(())
                } else {
                    Validation::fail(ConfigViolation::NonPositiveThreshold { name, value })
                }
            })
            .collect();

        let angle = self.thresholds.gazing_angle_deg;
        if angle > 90.0 {
            checks.push(Validation::fail(ConfigViolation::GazingAngleOutOfRange(
                angle,
            )));
        }

        for previous in StateLabel::COLUMNS {
            for candidate in StateLabel::COLUMNS {
                let value = self
                    .likelihood
                    .likelihood(previous, candidate)
                    .unwrap_or_default();
                if !(0.0..=1.0).contains(&value) {
                    checks.push(Validation::fail(ConfigViolation::LikelihoodOutOfRange {
                        previous,
                        candidate,
                        value,
                    }));
                }
            }
        }

        if self.window_capacity == 0 {
            checks.push(Validation::fail(ConfigViolation::ZeroWindowCapacity));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`FamConfig::validate`] as a `Result`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => {
                let violations: Vec<ConfigViolation> = errors.iter().cloned().collect();
                warn!(
                    target: "fam.config",
                    count = violations.len(),
                    "configuration rejected"
                );
                Err(ConfigError::Invalid { violations })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FamConfig::default();
        assert!(config.validate().is_success());
        assert_eq!(config.window_capacity, 3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = FamConfig::from_json_str(
            r#"{ "thresholds": { "distance_scale": 100.0 }, "window_capacity": 5 }"#,
        )
        .unwrap();

        assert_eq!(config.thresholds.distance_scale, 100.0);
        assert_eq!(config.thresholds.walk_stay_threshold, 0.3);
        assert_eq!(config.window_capacity, 5);
        assert_eq!(config.likelihood, LikelihoodTable::default());
    }

    #[test]
    fn validation_accumulates_every_violation() {
        let config = FamConfig {
            thresholds: Thresholds {
                walk_stay_threshold: -1.0,
                distance_scale: f64::NAN,
                gazing_angle_deg: 120.0,
                ..Thresholds::default()
            },
            likelihood: LikelihoodTable::default().with_entry(
                StateLabel::Waiting,
                StateLabel::Crossing,
                1.5,
            ),
            window_capacity: 0,
        };

        let Err(ConfigError::Invalid { violations }) = config.check() else {
            panic!("expected semantic validation failure");
        };

        assert_eq!(violations.len(), 5);
        assert!(violations.contains(&ConfigViolation::NonPositiveThreshold {
            name: "walk_stay_threshold",
            value: -1.0,
        }));
        assert!(violations.contains(&ConfigViolation::GazingAngleOutOfRange(120.0)));
        assert!(violations.contains(&ConfigViolation::LikelihoodOutOfRange {
            previous: StateLabel::Waiting,
            candidate: StateLabel::Crossing,
            value: 1.5,
        }));
        assert!(violations.contains(&ConfigViolation::ZeroWindowCapacity));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = FamConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FamConfig::load("/definitely/not/here/fam.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn round_trips_through_json() {
        let config = FamConfig {
            window_capacity: 4,
            ..FamConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FamConfig::from_json_str(&json).unwrap(), config);
    }
}
