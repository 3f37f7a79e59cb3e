//! Pedestrian FAM: a finite automation machine for pedestrians near AGVs
//!
//! The machine classifies, tick by tick, what a pedestrian near an automated
//! guided vehicle station is doing, from a stream of precomputed feature
//! records. The classifier core is pure: predicates and transition rules are
//! plain functions of the record and the configured thresholds, and the only
//! mutable state is the current hypothesis plus a short hysteresis window.
//!
//! # Core Concepts
//!
//! - **State**: one of six behaviours or `Error`, via `PedestrianState`
//! - **Predicates**: per-state admissibility checks driving hysteresis and recovery
//! - **Rules**: ordered, first-match-wins transition guards per state
//! - **Recovery**: likelihood-ranked re-grounding out of `Error`
//!
//! # Example
//!
//! ```rust
//! use pedestrian_fam::{FeatureRecord, FiniteAutomationMachine, PedestrianState, StateLabel};
//!
//! let mut machine = FiniteAutomationMachine::cold_start();
//!
//! // Standing still close to a station.
//! let idle = FeatureRecord {
//!     user_speed: 0.05,
//!     distance_to_closest_station: 0.5,
//!     distance_to_closest_station_x: 0.5,
//!     distance_to_closest_station_y: 0.5,
//!     ..FeatureRecord::default()
//! };
//! assert_eq!(machine.update(&idle), StateLabel::AtStation);
//!
//! // Labels parse from ground-truth trace names.
//! let forced = FiniteAutomationMachine::with_label("Wait").unwrap();
//! assert_eq!(forced.state(), PedestrianState::Waiting);
//! assert!(FiniteAutomationMachine::with_label("Sprint").is_err());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod machine;
pub mod recovery;
pub mod replay;
pub mod rules;
pub mod tracker;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, RuleBuilder};
pub use checkpoint::{CheckpointError, MachineCheckpoint};
pub use config::{ConfigError, ConfigViolation, FamConfig};
pub use crate::core::{
    FeatureRecord, Guard, LikelihoodTable, PedestrianState, StateLabel, Thresholds,
};
pub use machine::{FiniteAutomationMachine, Tick, ADOPTION_CONFIDENCE};
pub use replay::{replay, ReplaySummary};
pub use rules::{RuleSet, TransitionRule};
pub use tracker::Tracker;
