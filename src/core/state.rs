//! State labels and the live classifier state.
//!
//! `StateLabel` names one of the seven behavioural states a pedestrian can be
//! in. `PedestrianState` is the value a machine actually holds: it mirrors the
//! label one-to-one, except that `Error` also remembers which state was
//! abandoned when the machine lost confidence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the seven mutually exclusive behavioural states.
///
/// Labels serialize as the strings used by labelled traces ("At Station",
/// "Wait", ...). Deserialization and [`FromStr`] also accept the Rust
/// identifiers (`AtStation`, `Waiting`, ...).
///
/// Declaration order is the cold-start priority order, with `Error` last.
///
/// # Example
///
/// ```rust
/// use pedestrian_fam::core::StateLabel;
///
/// let label: StateLabel = "Cross".parse().unwrap();
/// assert_eq!(label, StateLabel::Crossing);
/// assert_eq!(label.name(), "Cross");
/// assert_eq!("Crossing".parse::<StateLabel>().unwrap(), label);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum StateLabel {
    #[serde(rename = "At Station", alias = "AtStation")]
    AtStation,
    #[serde(rename = "Wait", alias = "Waiting")]
    Waiting,
    #[serde(rename = "Cross", alias = "Crossing")]
    Crossing,
    #[serde(rename = "Approach Sidewalk", alias = "ApproachingSidewalk")]
    ApproachingSidewalk,
    #[serde(rename = "Move Along Sidewalk", alias = "MovingAlongSidewalk")]
    MovingAlongSidewalk,
    #[serde(rename = "Approach Target Station", alias = "ApproachingStation")]
    ApproachingStation,
    Error,
}

impl StateLabel {
    /// Every label, `Error` included.
    pub const ALL: [StateLabel; 7] = [
        StateLabel::AtStation,
        StateLabel::Waiting,
        StateLabel::Crossing,
        StateLabel::ApproachingSidewalk,
        StateLabel::MovingAlongSidewalk,
        StateLabel::ApproachingStation,
        StateLabel::Error,
    ];

    /// Order in which predicates are tried when recovering without history.
    pub const PRIORITY: [StateLabel; 6] = [
        StateLabel::AtStation,
        StateLabel::Waiting,
        StateLabel::Crossing,
        StateLabel::ApproachingSidewalk,
        StateLabel::MovingAlongSidewalk,
        StateLabel::ApproachingStation,
    ];

    /// Column order of the likelihood table. Also the tie-break order when
    /// ranking recovery candidates.
    pub const COLUMNS: [StateLabel; 6] = [
        StateLabel::AtStation,
        StateLabel::Waiting,
        StateLabel::ApproachingSidewalk,
        StateLabel::Crossing,
        StateLabel::ApproachingStation,
        StateLabel::MovingAlongSidewalk,
    ];

    /// Label string as it appears in traces and machine output.
    pub fn name(self) -> &'static str {
        match self {
            Self::AtStation => "At Station",
            Self::Waiting => "Wait",
            Self::Crossing => "Cross",
            Self::ApproachingSidewalk => "Approach Sidewalk",
            Self::MovingAlongSidewalk => "Move Along Sidewalk",
            Self::ApproachingStation => "Approach Target Station",
            Self::Error => "Error",
        }
    }

    /// Rust-style identifier, accepted as an alternative spelling when parsing.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::AtStation => "AtStation",
            Self::Waiting => "Waiting",
            Self::Crossing => "Crossing",
            Self::ApproachingSidewalk => "ApproachingSidewalk",
            Self::MovingAlongSidewalk => "MovingAlongSidewalk",
            Self::ApproachingStation => "ApproachingStation",
            Self::Error => "Error",
        }
    }

    /// Position of this label in [`StateLabel::COLUMNS`]; `None` for `Error`.
    pub fn column(self) -> Option<usize> {
        match self {
            Self::AtStation => Some(0),
            Self::Waiting => Some(1),
            Self::ApproachingSidewalk => Some(2),
            Self::Crossing => Some(3),
            Self::ApproachingStation => Some(4),
            Self::MovingAlongSidewalk => Some(5),
            Self::Error => None,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names none of the seven states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown state label '{0}'")]
pub struct UnknownStateLabel(pub String);

impl FromStr for StateLabel {
    type Err = UnknownStateLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.name() == s || label.identifier() == s)
            .ok_or_else(|| UnknownStateLabel(s.to_string()))
    }
}

/// The state a machine currently holds.
///
/// `Error` carries `previous`, the label of the state abandoned when the
/// machine entered `Error`. It is `StateLabel::Error` only at cold start,
/// before the machine has ever committed to a hypothesis.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PedestrianState {
    AtStation,
    Waiting,
    Crossing,
    ApproachingSidewalk,
    MovingAlongSidewalk,
    ApproachingStation,
    Error { previous: StateLabel },
}

impl PedestrianState {
    /// `Error` with no prior hypothesis.
    pub fn cold_start() -> Self {
        Self::Error {
            previous: StateLabel::Error,
        }
    }

    /// Build the state for `label`. `Error` maps to a cold start.
    pub fn from_label(label: StateLabel) -> Self {
        match label {
            StateLabel::AtStation => Self::AtStation,
            StateLabel::Waiting => Self::Waiting,
            StateLabel::Crossing => Self::Crossing,
            StateLabel::ApproachingSidewalk => Self::ApproachingSidewalk,
            StateLabel::MovingAlongSidewalk => Self::MovingAlongSidewalk,
            StateLabel::ApproachingStation => Self::ApproachingStation,
            StateLabel::Error => Self::cold_start(),
        }
    }

    pub fn label(&self) -> StateLabel {
        match self {
            Self::AtStation => StateLabel::AtStation,
            Self::Waiting => StateLabel::Waiting,
            Self::Crossing => StateLabel::Crossing,
            Self::ApproachingSidewalk => StateLabel::ApproachingSidewalk,
            Self::MovingAlongSidewalk => StateLabel::MovingAlongSidewalk,
            Self::ApproachingStation => StateLabel::ApproachingStation,
            Self::Error { .. } => StateLabel::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.label().name()
    }

    /// Label abandoned on the way into `Error`, if this is `Error`.
    pub fn previous(&self) -> Option<StateLabel> {
        match self {
            Self::Error { previous } => Some(*previous),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<StateLabel> for PedestrianState {
    fn from(label: StateLabel) -> Self {
        Self::from_label(label)
    }
}

impl fmt::Display for PedestrianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { previous } if !previous.is_error() => {
                write!(f, "Error (after {})", previous)
            }
            other => f.write_str(other.name()),
        }
    }
}
