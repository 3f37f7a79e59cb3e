//! Rolling window of predicate outcomes.
//!
//! The machine pushes one "current state's predicate held" flag per tick. When
//! the whole window reads `false` the machine abandons its hypothesis.
//!
//! Slots are kept newest first, so the seed template's trailing `false` slots
//! are the oldest and are evicted before the seeded `true` slots.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Fixed-capacity FIFO of booleans with an asymmetric seed.
///
/// A fresh or reset window is seeded `[true, true, false, ...]` (or all
/// `true` when the capacity is 1), so a machine that has just committed to a
/// state survives a couple of bad frames before giving up on it.
///
/// # Example
///
/// ```rust
/// use pedestrian_fam::core::HysteresisWindow;
/// use std::num::NonZeroUsize;
///
/// let mut window = HysteresisWindow::new(NonZeroUsize::new(3).unwrap());
/// window.push(false);
/// window.push(false);
/// assert!(!window.is_exhausted());
/// window.push(false);
/// assert!(window.is_exhausted());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HysteresisWindow {
    capacity: NonZeroUsize,
    slots: VecDeque<bool>,
}

impl HysteresisWindow {
    /// Create a seeded window.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            slots: Self::seed(capacity),
        }
    }

    /// Restore a window from its slots, newest first. Returns `None` when the
    /// slot count does not match `capacity`.
    pub fn from_slots(capacity: NonZeroUsize, slots: &[bool]) -> Option<Self> {
        (slots.len() == capacity.get()).then(|| Self {
            capacity,
            slots: slots.iter().copied().collect(),
        })
    }

    /// The seed template for `capacity`, newest first.
    pub fn seed(capacity: NonZeroUsize) -> VecDeque<bool> {
        let n = capacity.get();
        if n < 2 {
            return VecDeque::from(vec![true; n]);
        }
        (0..n).map(|i| i < 2).collect()
    }

    /// Record the newest outcome, evicting the oldest.
    pub fn push(&mut self, satisfied: bool) {
        if self.slots.len() == self.capacity.get() {
            self.slots.pop_back();
        }
        self.slots.push_front(satisfied);
    }

    /// True when no slot records a satisfied predicate.
    pub fn is_exhausted(&self) -> bool {
        !self.slots.is_empty() && !self.slots.iter().any(|&slot| slot)
    }

    /// Return to the seed template.
    pub fn reset(&mut self) {
        self.slots = Self::seed(self.capacity);
    }

    pub fn newest(&self) -> Option<bool> {
        self.slots.front().copied()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Slots, newest first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.slots.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.iter().collect()
    }
}
