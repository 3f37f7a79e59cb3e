//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over a feature record and the active
//! thresholds. A transition rule fires only when its guard holds.

use crate::core::record::FeatureRecord;
use crate::core::thresholds::Thresholds;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&FeatureRecord, &Thresholds) -> bool + Send + Sync;

/// Pure predicate that determines if a transition can fire.
///
/// Guards are cheap to clone; the predicate itself is shared.
///
/// # Example
///
/// ```rust
/// use pedestrian_fam::core::{FeatureRecord, Guard, Thresholds};
///
/// let moving = Guard::new(|r: &FeatureRecord, t: &Thresholds| r.user_speed.abs() > t.walk(1.0));
///
/// let record = FeatureRecord { user_speed: 1.2, ..FeatureRecord::default() };
/// assert!(moving.check(&record, &Thresholds::default()));
/// assert!(!moving.check(&FeatureRecord::default(), &Thresholds::default()));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<Predicate>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&FeatureRecord, &Thresholds) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that always holds.
    pub fn always() -> Self {
        Guard::new(|_, _| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self, record: &FeatureRecord, thresholds: &Thresholds) -> bool {
        (self.predicate)(record, thresholds)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
