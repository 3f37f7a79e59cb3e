//! Builder for constructing transition rules.

use crate::builder::error::BuildError;
use crate::core::{FeatureRecord, Guard, StateLabel, Thresholds};
use crate::rules::TransitionRule;

/// Builder for constructing transition rules with a fluent API.
pub struct RuleBuilder {
    name: &'static str,
    from: Option<StateLabel>,
    to: Option<StateLabel>,
    guard: Option<Guard>,
    confidence: f64,
}

impl RuleBuilder {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            name: "custom",
            from: None,
            to: None,
            guard: None,
            confidence: 1.0,
        }
    }

    /// Name shown in logs when the rule fires.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Set the source state (required).
    pub fn from(mut self, state: StateLabel) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: StateLabel) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the guard (required).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FeatureRecord, &Thresholds) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Confidence reported when the rule fires. Defaults to 1.0.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<TransitionRule, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let guard = self.guard.ok_or(BuildError::MissingGuard)?;

        if from.is_error() || to.is_error() {
            return Err(BuildError::ErrorStateRule);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(BuildError::InvalidConfidence(self.confidence));
        }

        Ok(TransitionRule {
            name: self.name,
            from,
            to,
            guard,
            confidence: self.confidence,
        })
    }
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
