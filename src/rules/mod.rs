//! Transition rules for the non-error states.
//!
//! Each non-error state owns an ordered list of guarded rules. Evaluation is
//! first-match-wins; when nothing matches the state stays put with full
//! confidence. Rules are data, so individual guards can be tested in isolation
//! and alternative tables can be injected into a machine.

mod standard;

use crate::core::{FeatureRecord, Guard, StateLabel, Thresholds};

/// A single guarded transition from one non-error state to another.
///
/// Construct rules with [`crate::builder::RuleBuilder`]; it rejects rules that
/// would touch `Error`, so every rule's `from` has a table column.
#[derive(Clone, Debug)]
pub struct TransitionRule {
    pub(crate) name: &'static str,
    pub(crate) from: StateLabel,
    pub(crate) to: StateLabel,
    pub(crate) guard: Guard,
    pub(crate) confidence: f64,
}

impl TransitionRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn source(&self) -> StateLabel {
        self.from
    }

    pub fn target(&self) -> StateLabel {
        self.to
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Whether the guard holds for `record`.
    pub fn matches(&self, record: &FeatureRecord, thresholds: &Thresholds) -> bool {
        self.guard.check(record, thresholds)
    }
}

/// Ordered rule lists, one per non-error state.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    tables: [Vec<TransitionRule>; 6],
}

impl RuleSet {
    /// A rule set with no rules; every state stays put.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard pedestrian transition table.
    pub fn standard() -> Self {
        standard::table()
    }

    /// Append `rule` after the existing rules for its source state.
    pub fn push(&mut self, rule: TransitionRule) {
        if let Some(column) = rule.from.column() {
            self.tables[column].push(rule);
        }
    }

    /// Builder-style [`RuleSet::push`].
    pub fn with_rule(mut self, rule: TransitionRule) -> Self {
        self.push(rule);
        self
    }

    /// Rules for `from`, in evaluation order. Empty for `Error`.
    pub fn rules_for(&self, from: StateLabel) -> &[TransitionRule] {
        match from.column() {
            Some(column) => &self.tables[column],
            None => &[],
        }
    }

    /// First rule for `from` whose guard holds.
    pub fn first_match(
        &self,
        from: StateLabel,
        record: &FeatureRecord,
        thresholds: &Thresholds,
    ) -> Option<&TransitionRule> {
        self.rules_for(from)
            .iter()
            .find(|rule| rule.matches(record, thresholds))
    }

    /// Candidate successor of `from` and its confidence.
    pub fn evaluate(
        &self,
        from: StateLabel,
        record: &FeatureRecord,
        thresholds: &Thresholds,
    ) -> (StateLabel, f64) {
        self.first_match(from, record, thresholds)
            .map_or((from, 1.0), |rule| (rule.to, rule.confidence))
    }

    /// Total number of rules across all states.
    pub fn len(&self) -> usize {
        self.tables.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RuleBuilder;

    #[test]
    fn empty_rule_set_stays_put() {
        let rules = RuleSet::empty();
        assert!(rules.is_empty());
        assert_eq!(
            rules.evaluate(
                StateLabel::Crossing,
                &FeatureRecord::default(),
                &Thresholds::default()
            ),
            (StateLabel::Crossing, 1.0)
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RuleSet::empty()
            .with_rule(
                RuleBuilder::new()
                    .named("first")
                    .from(StateLabel::Waiting)
                    .to(StateLabel::Crossing)
                    .when(|r: &FeatureRecord, _: &Thresholds| r.on_road)
                    .build()
                    .unwrap(),
            )
            .with_rule(
                RuleBuilder::new()
                    .named("second")
                    .from(StateLabel::Waiting)
                    .to(StateLabel::AtStation)
                    .guard(Guard::always())
                    .build()
                    .unwrap(),
            );

        let t = Thresholds::default();
        let on_road = FeatureRecord {
            on_road: true,
            ..FeatureRecord::default()
        };
        assert_eq!(rules.first_match(StateLabel::Waiting, &on_road, &t).unwrap().name(), "first");
        assert_eq!(
            rules.evaluate(StateLabel::Waiting, &FeatureRecord::default(), &t),
            (StateLabel::AtStation, 1.0)
        );
        assert_eq!(rules.rules_for(StateLabel::Waiting).len(), 2);
        assert!(rules.rules_for(StateLabel::Error).is_empty());
    }
}
