//! The per-tick classifier driver.

use crate::builder::{BuildError, MachineBuilder};
use crate::config::{FamConfig, DEFAULT_WINDOW_CAPACITY};
use crate::core::{FeatureRecord, HysteresisWindow, PedestrianState, StateLabel, Thresholds};
use crate::recovery::recover;
use crate::rules::RuleSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// A candidate is adopted only when its confidence is strictly above this.
pub const ADOPTION_CONFIDENCE: f64 = 0.8;

const DEFAULT_WINDOW: NonZeroUsize =
    NonZeroUsize::MIN.saturating_add(DEFAULT_WINDOW_CAPACITY - 1);

/// What happened during a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// State held before the tick.
    pub from: PedestrianState,
    /// Candidate proposed by the transition rule or by recovery.
    pub candidate: StateLabel,
    pub confidence: f64,
    /// Whether the candidate replaced `from`.
    pub adopted: bool,
    /// Whether the post-adoption state's predicate held.
    pub satisfied: bool,
    /// Whether the hysteresis window tripped and forced `Error`.
    pub demoted: bool,
    /// State held after the tick.
    pub state: PedestrianState,
}

/// Deterministic pedestrian state classifier.
///
/// Owns exactly one live state and one hysteresis window. Each call to
/// [`FiniteAutomationMachine::update`] consumes one record; records must be
/// fed in temporal order. Configuration and rules are shared read-only, so
/// many machines can be built from the same `Arc`s.
///
/// # Example
///
/// ```rust
/// use pedestrian_fam::{FeatureRecord, FiniteAutomationMachine, StateLabel};
///
/// let mut machine = FiniteAutomationMachine::cold_start();
/// let record = FeatureRecord {
///     user_speed: 0.1,
///     distance_to_closest_station: 1.0,
///     distance_to_closest_station_x: 1.0,
///     distance_to_closest_station_y: 1.0,
///     ..FeatureRecord::default()
/// };
///
/// assert_eq!(machine.update(&record), StateLabel::AtStation);
/// ```
#[derive(Clone, Debug)]
pub struct FiniteAutomationMachine {
    id: Uuid,
    current: PedestrianState,
    window: HysteresisWindow,
    config: Arc<FamConfig>,
    rules: Arc<RuleSet>,
    last_confidence: f64,
    ticks: u64,
}

impl FiniteAutomationMachine {
    /// Machine in `initial` with default configuration and standard rules.
    pub fn new(initial: PedestrianState) -> Self {
        Self {
            id: Uuid::new_v4(),
            current: initial,
            window: HysteresisWindow::new(DEFAULT_WINDOW),
            config: Arc::new(FamConfig::default()),
            rules: Arc::new(RuleSet::standard()),
            last_confidence: 1.0,
            ticks: 0,
        }
    }

    /// Machine in `Error` with no prior hypothesis.
    pub fn cold_start() -> Self {
        Self::new(PedestrianState::cold_start())
    }

    pub fn builder() -> MachineBuilder {
        MachineBuilder::new()
    }

    /// Machine whose current state is named by `label`.
    ///
    /// Accepts the trace names ("Wait") and the identifiers ("Waiting").
    /// `"Error"` yields a cold start.
    pub fn with_label(label: &str) -> Result<Self, BuildError> {
        let label: StateLabel = label.parse()?;
        Ok(Self::new(PedestrianState::from_label(label)))
    }

    pub(crate) fn from_parts(
        id: Uuid,
        current: PedestrianState,
        window: HysteresisWindow,
        config: Arc<FamConfig>,
        rules: Arc<RuleSet>,
        last_confidence: f64,
        ticks: u64,
    ) -> Self {
        Self {
            id,
            current,
            window,
            config,
            rules,
            last_confidence,
            ticks,
        }
    }

    /// Replace the current state by label, keeping the hysteresis window.
    ///
    /// Unknown labels are rejected and leave the machine untouched.
    pub fn force_label(&mut self, label: &str) -> Result<(), BuildError> {
        let label: StateLabel = label.parse()?;
        self.current = PedestrianState::from_label(label);
        debug!(target: "fam.machine", machine = %self.id, state = %label, "state forced");
        Ok(())
    }

    /// Candidate successor of the current state for `record`, and its
    /// confidence. Does not mutate the machine.
    pub fn transition(&self, record: &FeatureRecord) -> (StateLabel, f64) {
        match self.current {
            PedestrianState::Error { previous } => recover(
                previous,
                record,
                &self.config.thresholds,
                &self.config.likelihood,
            ),
            state => self
                .rules
                .evaluate(state.label(), record, &self.config.thresholds),
        }
    }

    /// Consume one record and report what happened.
    pub fn step(&mut self, record: &FeatureRecord) -> Tick {
        let from = self.current;
        let (candidate, confidence) = self.transition(record);

        let adopted = confidence > ADOPTION_CONFIDENCE && candidate != from.label();
        if adopted {
            self.current = PedestrianState::from_label(candidate);
            if from.is_error() {
                info!(
                    target: "fam.machine",
                    machine = %self.id,
                    previous = %from,
                    state = %candidate,
                    confidence,
                    "recovered from Error"
                );
            } else {
                debug!(
                    target: "fam.machine",
                    machine = %self.id,
                    from = %from,
                    to = %candidate,
                    confidence,
                    "transition adopted"
                );
            }
        }

        let satisfied = self.current.check(record, &self.config.thresholds);
        self.window.push(satisfied);

        let demoted = self.window.is_exhausted();
        if demoted {
            let abandoned = self.current.label();
            self.current = PedestrianState::Error {
                previous: abandoned,
            };
            self.window.reset();
            warn!(
                target: "fam.machine",
                machine = %self.id,
                abandoned = %abandoned,
                "hysteresis window exhausted"
            );
        }

        self.last_confidence = confidence;
        self.ticks += 1;

        trace!(
            target: "fam.machine",
            machine = %self.id,
            tick = self.ticks,
            state = %self.current,
            candidate = %candidate,
            confidence,
            satisfied,
            "tick"
        );

        Tick {
            from,
            candidate,
            confidence,
            adopted,
            satisfied,
            demoted,
            state: self.current,
        }
    }

    /// Consume one record and return the resulting label.
    pub fn update(&mut self, record: &FeatureRecord) -> StateLabel {
        self.step(record).state.label()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    pub fn state(&self) -> PedestrianState {
        self.current
    }

    pub fn label(&self) -> StateLabel {
        self.current.label()
    }

    /// Confidence reported by the most recent tick.
    pub fn last_confidence(&self) -> f64 {
        self.last_confidence
    }

    pub fn window(&self) -> &HysteresisWindow {
        &self.window
    }

    pub fn config(&self) -> &FamConfig {
        &self.config
    }

    /// Shared handle to the configuration, for building sibling machines.
    pub fn shared_config(&self) -> Arc<FamConfig> {
        Arc::clone(&self.config)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.config.thresholds
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Number of records consumed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for FiniteAutomationMachine {
    fn default() -> Self {
        Self::cold_start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far() -> FeatureRecord {
        FeatureRecord {
            closest_station: 1,
            gazing_station: 2,
            distance_to_closest_station: 50.0,
            distance_to_closest_station_x: 50.0,
            distance_to_closest_station_y: 50.0,
            distance_from_start_station_x: 50.0,
            distance_from_start_station_y: 50.0,
            distance_from_end_station_x: 50.0,
            distance_from_end_station_y: 50.0,
            ..FeatureRecord::default()
        }
    }

    fn at_station() -> FeatureRecord {
        FeatureRecord {
            user_speed: 0.1,
            distance_to_closest_station: 1.0,
            distance_to_closest_station_x: 1.0,
            distance_to_closest_station_y: 1.0,
            ..far()
        }
    }

    #[test]
    fn new_machine_starts_cold_with_seeded_window() {
        let machine = FiniteAutomationMachine::cold_start();
        assert_eq!(machine.state(), PedestrianState::cold_start());
        assert_eq!(machine.window().to_vec(), vec![true, true, false]);
        assert_eq!(machine.ticks(), 0);
        assert_eq!(machine.last_confidence(), 1.0);
    }

    #[test]
    fn cold_start_adopts_admissible_state() {
        let mut machine = FiniteAutomationMachine::cold_start();
        let tick = machine.step(&at_station());

        assert_eq!(tick.candidate, StateLabel::AtStation);
        assert_eq!(tick.confidence, 1.0);
        assert!(tick.adopted);
        assert!(tick.satisfied);
        assert!(!tick.demoted);
        assert_eq!(machine.label(), StateLabel::AtStation);
        assert_eq!(machine.ticks(), 1);
    }

    #[test]
    fn error_never_demotes_itself() {
        let mut machine = FiniteAutomationMachine::cold_start();
        let nothing = FeatureRecord {
            user_speed: 2.0,
            ..far()
        };

        for _ in 0..10 {
            let tick = machine.step(&nothing);
            assert!(tick.satisfied);
            assert!(!tick.demoted);
        }
        assert_eq!(machine.state(), PedestrianState::cold_start());
    }

    #[test]
    fn exhausted_window_demotes_with_previous_label() {
        let mut machine = FiniteAutomationMachine::with_label("Cross").unwrap();
        let standing_far_away = far();

        assert!(!machine.step(&standing_far_away).demoted);
        assert!(!machine.step(&standing_far_away).demoted);
        let tick = machine.step(&standing_far_away);

        assert!(tick.demoted);
        assert_eq!(
            tick.state,
            PedestrianState::Error {
                previous: StateLabel::Crossing
            }
        );
        assert_eq!(machine.window().to_vec(), vec![true, true, false]);
    }

    #[test]
    fn force_label_rejects_unknown_labels() {
        let mut machine = FiniteAutomationMachine::with_label("Wait").unwrap();
        let result = machine.force_label("Jogging");

        assert_eq!(result, Err(BuildError::UnknownState("Jogging".to_string())));
        assert_eq!(machine.label(), StateLabel::Waiting);

        machine.force_label("MovingAlongSidewalk").unwrap();
        assert_eq!(machine.label(), StateLabel::MovingAlongSidewalk);
    }

    #[test]
    fn force_label_keeps_window() {
        let mut machine = FiniteAutomationMachine::with_label("Cross").unwrap();
        machine.step(&far());
        let before = machine.window().to_vec();

        machine.force_label("At Station").unwrap();
        assert_eq!(machine.window().to_vec(), before);
    }

    #[test]
    fn transition_is_pure() {
        let machine = FiniteAutomationMachine::cold_start();
        assert_eq!(machine.transition(&at_station()), (StateLabel::AtStation, 1.0));
        assert_eq!(machine.state(), PedestrianState::cold_start());
        assert_eq!(machine.ticks(), 0);
    }
}
