//! Build errors for machines and transition rules.

use crate::core::UnknownStateLabel;
use thiserror::Error;

/// Structural misuse detected while building a machine or a rule.
///
/// These indicate programming or configuration mistakes, never data
/// conditions, and are not recoverable by feeding different records.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Unknown state label '{0}'")]
    UnknownState(String),

    #[error("Hysteresis window capacity must be at least 1")]
    ZeroWindowCapacity,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Rule source state not specified. Call .from(label)")]
    MissingFromState,

    #[error("Rule target state not specified. Call .to(label)")]
    MissingToState,

    #[error("Rule guard not specified. Call .when(predicate) or .guard(guard)")]
    MissingGuard,

    #[error("Rules cannot leave or enter Error; Error is governed by recovery")]
    ErrorStateRule,

    #[error("Rule confidence must lie in [0, 1], got {0}")]
    InvalidConfidence(f64),
}

impl From<UnknownStateLabel> for BuildError {
    fn from(err: UnknownStateLabel) -> Self {
        BuildError::UnknownState(err.0)
    }
}
