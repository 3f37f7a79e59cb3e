//! Builder for constructing classifier machines.

use crate::builder::error::BuildError;
use crate::config::FamConfig;
use crate::core::{HysteresisWindow, LikelihoodTable, PedestrianState, StateLabel, Thresholds};
use crate::machine::FiniteAutomationMachine;
use crate::rules::RuleSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

/// Builder for constructing machines with a fluent API.
///
/// Every setting is optional: an unconfigured builder yields a cold-started
/// machine with the default configuration and the standard rule table.
#[derive(Default)]
pub struct MachineBuilder {
    initial: Option<PedestrianState>,
    initial_label: Option<String>,
    config: Option<Arc<FamConfig>>,
    thresholds: Option<Thresholds>,
    likelihood: Option<LikelihoodTable>,
    window_capacity: Option<usize>,
    rules: Option<Arc<RuleSet>>,
    id: Option<Uuid>,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state.
    pub fn initial(mut self, state: PedestrianState) -> Self {
        self.initial = Some(state);
        self.initial_label = None;
        self
    }

    /// Set the initial state by label. The label is parsed in `build`.
    pub fn initial_label(mut self, label: impl Into<String>) -> Self {
        self.initial_label = Some(label.into());
        self.initial = None;
        self
    }

    /// Share an existing configuration.
    pub fn config(mut self, config: Arc<FamConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the thresholds of the configuration.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Override the recovery likelihood table of the configuration.
    pub fn likelihood(mut self, table: LikelihoodTable) -> Self {
        self.likelihood = Some(table);
        self
    }

    /// Override the hysteresis window capacity of the configuration.
    pub fn window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = Some(capacity);
        self
    }

    /// Use a custom rule set instead of the standard table.
    pub fn rules(mut self, rules: Arc<RuleSet>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Build the machine.
    pub fn build(self) -> Result<FiniteAutomationMachine, BuildError> {
        let initial = match (self.initial, self.initial_label) {
            (_, Some(label)) => PedestrianState::from_label(label.parse::<StateLabel>()?),
            (Some(state), None) => state,
            (None, None) => PedestrianState::cold_start(),
        };

        let mut config = self.config.unwrap_or_default();
        if self.thresholds.is_some() || self.likelihood.is_some() || self.window_capacity.is_some()
        {
            let overridden = Arc::make_mut(&mut config);
            if let Some(thresholds) = self.thresholds {
                overridden.thresholds = thresholds;
            }
            if let Some(table) = self.likelihood {
                overridden.likelihood = table;
            }
            if let Some(capacity) = self.window_capacity {
                overridden.window_capacity = capacity;
            }
        }

        let capacity =
            NonZeroUsize::new(config.window_capacity).ok_or(BuildError::ZeroWindowCapacity)?;
        config
            .check()
            .map_err(|err| BuildError::InvalidConfig(err.to_string()))?;

        Ok(FiniteAutomationMachine::from_parts(
            self.id.unwrap_or_else(Uuid::new_v4),
            initial,
            HysteresisWindow::new(capacity),
            config,
            self.rules
                .unwrap_or_else(|| Arc::new(RuleSet::standard())),
            1.0,
            0,
        ))
    }
}
