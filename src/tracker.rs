//! One independent machine per tracked pedestrian.

use crate::core::{FeatureRecord, StateLabel};
use crate::machine::FiniteAutomationMachine;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use uuid::Uuid;

/// Keyed collection of machines.
///
/// New entities get a copy of the prototype machine, so every machine shares
/// the prototype's configuration and rules (behind `Arc`) but owns its own
/// state and window. Machines never observe each other.
#[derive(Debug)]
pub struct Tracker<K> {
    prototype: FiniteAutomationMachine,
    machines: HashMap<K, FiniteAutomationMachine>,
}

impl<K: Eq + Hash + Clone> Tracker<K> {
    /// Tracker whose new entities start as copies of `prototype`.
    pub fn new(prototype: FiniteAutomationMachine) -> Self {
        Self {
            prototype,
            machines: HashMap::new(),
        }
    }

    /// Feed `record` to the machine for `key`, creating it on first sight.
    pub fn update(&mut self, key: &K, record: &FeatureRecord) -> StateLabel {
        let prototype = &self.prototype;
        let machine = self.machines.entry(key.clone()).or_insert_with(|| {
            let mut machine = prototype.clone();
            machine.set_id(Uuid::new_v4());
            debug!(target: "fam.machine", machine = %machine.id(), "tracking new entity");
            machine
        });
        machine.update(record)
    }

    pub fn get(&self, key: &K) -> Option<&FiniteAutomationMachine> {
        self.machines.get(key)
    }

    /// Stop tracking `key`, returning its machine.
    pub fn remove(&mut self, key: &K) -> Option<FiniteAutomationMachine> {
        self.machines.remove(key)
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Current label of every tracked entity.
    pub fn labels(&self) -> impl Iterator<Item = (&K, StateLabel)> + '_ {
        self.machines
            .iter()
            .map(|(key, machine)| (key, machine.label()))
    }
}

impl<K: Eq + Hash + Clone> Default for Tracker<K> {
    fn default() -> Self {
        Self::new(FiniteAutomationMachine::cold_start())
    }
}
