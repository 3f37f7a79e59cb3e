//! Core classifier types and logic.
//!
//! This module contains the pure functional core of the machine:
//! - State labels and the live state via `StateLabel` / `PedestrianState`
//! - The per-tick `FeatureRecord` and its boundary validation
//! - Admissibility predicates and transition guards
//! - The recovery likelihood table and the hysteresis window
//!
//! Nothing in this module performs I/O or holds mutable global state.

pub mod admissibility;
mod guard;
mod hysteresis;
mod likelihood;
mod record;
mod state;
mod thresholds;

pub use admissibility::{admissible, admissible_labels};
pub use guard::Guard;
pub use hysteresis::HysteresisWindow;
pub use likelihood::LikelihoodTable;
pub use record::{FeatureRecord, RecordError};
pub use state::{PedestrianState, StateLabel, UnknownStateLabel};
pub use thresholds::Thresholds;
